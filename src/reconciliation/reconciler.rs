use std::{collections::BTreeMap, ops::Range};

use log::{debug, warn};
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::{
    diffs::primitive::{DiffPrimitive, SemanticDiff},
    reconciliation::{
        document::Document,
        reconcile_error::ReconcileError,
        registry::{CancellationToken, StreamId, StreamRegistry},
        session::{ReconciliationSession, SessionId, SessionState},
    },
};

/// Refers to one session started by a `Reconciler` and the stream feeding
/// it.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle {
    session: SessionId,
    stream: StreamId,
}

impl SessionHandle {
    #[must_use]
    pub fn session(&self) -> SessionId { self.session }

    #[must_use]
    pub fn stream(&self) -> StreamId { self.stream }
}

/// Streams rewrites of selections into a document.
///
/// Every call to `start_reconciliation` creates an independent session over
/// its own part of the document. Sessions can't overlap and are driven one
/// increment at a time, in arrival order.
///
/// ```
/// use redline::Reconciler;
///
/// let mut reconciler = Reconciler::new("Launch day is here");
/// let handle = reconciler.start_reconciliation(7..10).unwrap();
///
/// reconciler.feed_increment(handle, "Demo day").unwrap();
/// reconciler.finish_session(handle).unwrap();
/// reconciler.accept_session(handle).unwrap();
///
/// assert_eq!(reconciler.text(), "Launch Demo day is here");
/// ```
#[derive(Debug)]
pub struct Reconciler<P: DiffPrimitive = SemanticDiff> {
    document: Document,
    primitive: P,
    /// Sessions that are still streaming or waiting for a decision.
    sessions: BTreeMap<SessionId, ReconciliationSession>,
    /// Final state of every accepted or rejected session.
    closed: BTreeMap<SessionId, SessionState>,
    streams: StreamRegistry,
    next_session: u64,
}

impl Reconciler {
    #[must_use]
    pub fn new(text: &str) -> Self { Self::with_primitive(text, SemanticDiff) }
}

impl<P: DiffPrimitive> Reconciler<P> {
    #[must_use]
    pub fn with_primitive(text: &str, primitive: P) -> Self {
        Self {
            document: Document::new(text),
            primitive,
            sessions: BTreeMap::new(),
            closed: BTreeMap::new(),
            streams: StreamRegistry::new(),
            next_session: 0,
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document { &self.document }

    /// The document's current text, including any live session's view.
    #[must_use]
    pub fn text(&self) -> String { self.document.text() }

    /// Starts a session over the characters in `range`, which must not
    /// overlap another live session.
    pub fn start_reconciliation(
        &mut self,
        range: Range<usize>,
    ) -> Result<SessionHandle, ReconcileError> {
        let selection = self.document.isolate(range)?;

        let mut session = ReconciliationSession::new();
        session.start(&mut self.document, selection)?;

        let id = SessionId(self.next_session);
        self.next_session += 1;
        let (stream, _) = self.streams.register(id);
        self.sessions.insert(id, session);
        debug!("Started {id}");

        Ok(SessionHandle {
            session: id,
            stream,
        })
    }

    /// Shows `completion_so_far` against the session's original text.
    ///
    /// If the stream has been cancelled in the meantime, the session is
    /// rejected instead.
    pub fn feed_increment(
        &mut self,
        handle: SessionHandle,
        completion_so_far: &str,
    ) -> Result<(), ReconcileError> {
        let Some(mut session) = self.take_live(handle)? else {
            return Ok(());
        };

        let result = if self.is_cancelled(handle) {
            debug!("Dropping increment of cancelled {}", handle.session);
            session.reject(&mut self.document).map_err(ReconcileError::from)
        } else {
            session.on_increment(&mut self.document, &self.primitive, completion_so_far)
        };
        self.restore(handle, session);

        result
    }

    /// Marks the session's stream as complete. A stream cancelled after its
    /// last increment rejects the session instead.
    pub fn finish_session(&mut self, handle: SessionHandle) -> Result<(), ReconcileError> {
        let Some(mut session) = self.take_live(handle)? else {
            return Ok(());
        };

        let result = if self.is_cancelled(handle) {
            debug!("Rejecting cancelled {} instead of finishing it", handle.session);
            session.reject(&mut self.document).map_err(ReconcileError::from)
        } else {
            session.finish();
            Ok(())
        };
        self.streams.complete(handle.stream);
        self.restore(handle, session);

        result
    }

    pub fn accept_session(&mut self, handle: SessionHandle) -> Result<(), ReconcileError> {
        let Some(mut session) = self.take_live(handle)? else {
            return Ok(());
        };

        let result = session.accept(&mut self.document);
        self.restore(handle, session);

        Ok(result?)
    }

    pub fn reject_session(&mut self, handle: SessionHandle) -> Result<(), ReconcileError> {
        let Some(mut session) = self.take_live(handle)? else {
            return Ok(());
        };

        let result = session.reject(&mut self.document);
        self.restore(handle, session);

        Ok(result?)
    }

    /// Stops the session's stream and restores its original text.
    pub fn cancel(&mut self, handle: SessionHandle) -> Result<(), ReconcileError> {
        let Some(mut session) = self.take_live(handle)? else {
            return Ok(());
        };

        self.streams.cancel(handle.stream);
        let result = session.reject(&mut self.document);
        self.restore(handle, session);

        Ok(result?)
    }

    /// Cancels every stream and rejects every session that is still open,
    /// including finished ones awaiting a decision. Returns the number of
    /// rejected sessions.
    ///
    /// Every session is attempted even if some fail, the first failure is
    /// returned afterwards.
    pub fn cancel_all(&mut self) -> Result<usize, ReconcileError> {
        self.streams.cancel_all();

        let mut rejected = 0;
        let mut first_error = None;
        for (id, mut session) in std::mem::take(&mut self.sessions) {
            match session.reject(&mut self.document) {
                Ok(()) => {
                    self.closed.insert(id, session.state());
                    rejected += 1;
                }
                Err(error) => {
                    warn!("Failed to reject {id}: {error}");
                    first_error.get_or_insert(error);
                    self.sessions.insert(id, session);
                }
            }
        }
        debug!("Cancelled all reconciliations, {rejected} rejected");

        match first_error {
            Some(error) => Err(error.into()),
            None => Ok(rejected),
        }
    }

    /// Feeds `increments` in order until they run out or the stream is
    /// cancelled, then finishes the session.
    pub fn consume_stream<I>(
        &mut self,
        handle: SessionHandle,
        increments: I,
    ) -> Result<(), ReconcileError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for increment in increments {
            if !self.streams.contains(handle.stream) {
                break;
            }

            self.feed_increment(handle, increment.as_ref())?;
        }

        self.finish_session(handle)
    }

    /// The session behind `handle` while it's open. Accepted and rejected
    /// sessions are discarded, only their final state is kept.
    #[must_use]
    pub fn session(&self, handle: SessionHandle) -> Option<&ReconciliationSession> {
        self.sessions.get(&handle.session)
    }

    pub fn session_state(&self, handle: SessionHandle) -> Result<SessionState, ReconcileError> {
        if let Some(state) = self.closed.get(&handle.session) {
            return Ok(*state);
        }

        self.session(handle)
            .map(ReconciliationSession::state)
            .ok_or(ReconcileError::UnknownSession(handle.session))
    }

    /// What accepting the session right now would keep. Empty once the
    /// session is closed.
    pub fn rendered_text(&self, handle: SessionHandle) -> Result<String, ReconcileError> {
        if self.closed.contains_key(&handle.session) {
            return Ok(String::new());
        }

        let session = self
            .session(handle)
            .ok_or(ReconcileError::UnknownSession(handle.session))?;

        Ok(session.rendered_text(&self.document)?)
    }

    /// Token a stream producer can watch, or cancel, while the stream is
    /// registered.
    #[must_use]
    pub fn cancellation_token(&self, handle: SessionHandle) -> Option<CancellationToken> {
        self.streams.token(handle.stream)
    }

    /// Number of streams still delivering increments.
    #[must_use]
    pub fn active_streams(&self) -> usize { self.streams.len() }

    /// Number of sessions that are neither accepted nor rejected.
    #[must_use]
    pub fn open_sessions(&self) -> usize { self.sessions.len() }

    fn is_cancelled(&self, handle: SessionHandle) -> bool {
        self.streams
            .token(handle.stream)
            .is_some_and(|token| token.is_cancelled())
    }

    /// Takes an open session out of the map for the duration of a call.
    /// Closed sessions yield `None`.
    fn take_live(
        &mut self,
        handle: SessionHandle,
    ) -> Result<Option<ReconciliationSession>, ReconcileError> {
        if self.closed.contains_key(&handle.session) {
            return Ok(None);
        }

        self.sessions
            .remove(&handle.session)
            .map(Some)
            .ok_or(ReconcileError::UnknownSession(handle.session))
    }

    /// Puts a session taken by `take_live` back, or drops it for its final
    /// state once it's closed.
    fn restore(&mut self, handle: SessionHandle, session: ReconciliationSession) {
        let state = session.state();
        if state.is_terminal() {
            self.streams.complete(handle.stream);
            self.closed.insert(handle.session, state);
            debug!("Closed {} as {state:?}", handle.session);
        } else {
            self.sessions.insert(handle.session, session);
        }
    }
}
