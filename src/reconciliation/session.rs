use std::fmt::Display;

use log::{debug, trace, warn};

use crate::{
    diffs::{diff_op::DiffOp, primitive::DiffPrimitive},
    reconciliation::{
        document::{Document, NodeId, NodeKind},
        document_error::DocumentError,
        reconcile_error::ReconcileError,
    },
};

/// Identifies a session within a `Reconciler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Streaming,
    Accepted,
    Rejected,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Accepted | SessionState::Rejected)
    }
}

/// Document nodes owned by a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spans {
    placeholder: NodeId,
    inline_edit: NodeId,
    unprocessed: NodeId,
}

/// Merges a streamed rewrite of a selection into a document.
///
/// Once started, the selection is replaced by a placeholder holding an
/// inline-edit span and an unprocessed span. Every increment of the rewrite
/// is diffed against the original selection: inserted and unchanged text is
/// shown in the inline-edit span, deleted text is left out, and the part of
/// the original the rewrite hasn't reached yet stays in the unprocessed span.
///
/// Accepting keeps the inline-edit text, rejecting restores the original.
/// Both are final: any later call is silently ignored so that increments
/// still in flight can't touch the document again.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationSession {
    state: SessionState,
    original_text: String,
    accumulated_text: String,
    diff_against_original: Vec<DiffOp>,
    unprocessed_tail: String,
    spans: Option<Spans>,
    finished: bool,
}

impl ReconciliationSession {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Takes over the plain node `selection`, replacing it with the session's
    /// placeholder. Sessions are never reused, so starting again is a no-op.
    pub fn start(&mut self, document: &mut Document, selection: NodeId) -> Result<(), DocumentError> {
        if self.state != SessionState::Idle {
            return Ok(());
        }

        let original_text = document.text_content(selection)?;
        let placeholder = document.replace_with(selection, NodeKind::Placeholder, "")?;
        let inline_edit = document.append_child(placeholder, NodeKind::InlineEdit, "")?;
        let unprocessed =
            document.append_child(placeholder, NodeKind::Unprocessed, original_text.clone())?;

        debug!(
            "Started reconciling {} characters",
            original_text.chars().count()
        );

        self.unprocessed_tail.clone_from(&original_text);
        self.original_text = original_text;
        self.accumulated_text.clear();
        self.spans = Some(Spans {
            placeholder,
            inline_edit,
            unprocessed,
        });
        self.state = SessionState::Streaming;

        Ok(())
    }

    /// Applies the rewrite received so far.
    ///
    /// If the diff fails, the session is rejected before the error is
    /// returned so the document never stays half-updated. The diff error is
    /// returned even if restoring the original text fails too.
    pub fn on_increment<P>(
        &mut self,
        document: &mut Document,
        primitive: &P,
        completion_so_far: &str,
    ) -> Result<(), ReconcileError>
    where
        P: DiffPrimitive + ?Sized,
    {
        let Some(spans) = self.live_spans() else {
            return Ok(());
        };

        let diff = match primitive.diff(&self.original_text, completion_so_far) {
            Ok(diff) => diff,
            Err(error) => {
                warn!("Rejecting reconciliation because the diff failed: {error}");
                if let Err(reject_error) = self.reject(document) {
                    warn!("Failed to restore the original text: {reject_error}");
                }
                return Err(error.into());
            }
        };

        let additions: usize = diff
            .iter()
            .filter(|operation| operation.is_insert())
            .map(DiffOp::char_count)
            .sum();
        let superseded = completion_so_far.chars().count().saturating_sub(additions);
        let unprocessed_tail: String = self.original_text.chars().skip(superseded).collect();

        document.clear_children(spans.inline_edit)?;
        for operation in &diff {
            match operation {
                DiffOp::Insert(text) => {
                    document.append_child(spans.inline_edit, NodeKind::Addition, text.as_str())?;
                }
                DiffOp::Equal(text) => {
                    document.append_child(spans.inline_edit, NodeKind::Unchanged, text.as_str())?;
                }
                DiffOp::Delete(..) => {}
            }
        }
        document.set_text(spans.unprocessed, unprocessed_tail.as_str())?;

        trace!(
            "Reconciled {} characters with {additions} added, {} left unprocessed",
            completion_so_far.chars().count(),
            unprocessed_tail.chars().count()
        );

        completion_so_far.clone_into(&mut self.accumulated_text);
        self.diff_against_original = diff;
        self.unprocessed_tail = unprocessed_tail;

        Ok(())
    }

    /// Marks the stream as complete. The session stays open for further
    /// increments until it's accepted or rejected.
    pub fn finish(&mut self) {
        if self.state == SessionState::Streaming {
            self.finished = true;
        }
    }

    /// Collapses the session's spans into a plain node holding the added and
    /// unchanged text.
    pub fn accept(&mut self, document: &mut Document) -> Result<(), DocumentError> {
        let Some(spans) = self.live_spans() else {
            return Ok(());
        };

        let text = Self::inline_edit_text(document, spans)?;
        document.replace_with_text(spans.placeholder, text)?;
        debug!("Accepted reconciliation");

        self.close(SessionState::Accepted);

        Ok(())
    }

    /// Restores the original selection.
    pub fn reject(&mut self, document: &mut Document) -> Result<(), DocumentError> {
        let Some(spans) = self.live_spans() else {
            return Ok(());
        };

        document.replace_with_text(spans.placeholder, self.original_text.as_str())?;
        debug!("Rejected reconciliation");

        self.close(SessionState::Rejected);

        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> SessionState { self.state }

    #[must_use]
    pub fn is_finished(&self) -> bool { self.finished }

    #[must_use]
    pub fn original_text(&self) -> &str { &self.original_text }

    #[must_use]
    pub fn accumulated_text(&self) -> &str { &self.accumulated_text }

    #[must_use]
    pub fn diff_against_original(&self) -> &[DiffOp] { &self.diff_against_original }

    #[must_use]
    pub fn unprocessed_tail(&self) -> &str { &self.unprocessed_tail }

    /// The session's placeholder node while it's streaming.
    #[must_use]
    pub fn placeholder(&self) -> Option<NodeId> { self.live_spans().map(|spans| spans.placeholder) }

    /// Text of the added and unchanged spans, i.e. what accepting would keep.
    /// Empty unless the session is streaming.
    pub fn rendered_text(&self, document: &Document) -> Result<String, DocumentError> {
        match self.live_spans() {
            Some(spans) => Self::inline_edit_text(document, spans),
            None => Ok(String::new()),
        }
    }

    fn live_spans(&self) -> Option<Spans> {
        match self.state {
            SessionState::Streaming => self.spans,
            _ => None,
        }
    }

    fn inline_edit_text(document: &Document, spans: Spans) -> Result<String, DocumentError> {
        let mut text = String::new();
        for span in document.children_of_kind(
            spans.inline_edit,
            &[NodeKind::Addition, NodeKind::Unchanged],
        )? {
            text.push_str(&document.text_content(span)?);
        }

        Ok(text)
    }

    fn close(&mut self, state: SessionState) {
        self.state = state;
        self.spans = None;
        self.diff_against_original.clear();
        self.unprocessed_tail.clear();
    }
}
