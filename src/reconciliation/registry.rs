use std::{
    collections::BTreeMap,
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::debug;

use crate::reconciliation::session::SessionId;

/// Shared flag telling a stream's producer to stop sending increments.
///
/// Clones observe the same flag, so the producer can hold on to one while
/// the registry cancels another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed); }

    #[must_use]
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(u64);

impl Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Stream {
    session: SessionId,
    token: CancellationToken,
}

/// Keeps track of the streams that are still delivering increments.
///
/// A stream is removed once it completes or gets cancelled. Ids are never
/// handed out twice.
#[derive(Debug, Clone, Default)]
pub struct StreamRegistry {
    next_id: u64,
    streams: BTreeMap<StreamId, Stream>,
}

impl StreamRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a new stream feeding `session`.
    pub fn register(&mut self, session: SessionId) -> (StreamId, CancellationToken) {
        let id = StreamId(self.next_id);
        self.next_id += 1;

        let token = CancellationToken::new();
        self.streams.insert(
            id,
            Stream {
                session,
                token: token.clone(),
            },
        );
        debug!("Registered {id} for {session}");

        (id, token)
    }

    /// Forgets a stream that delivered everything. Returns whether it was
    /// still registered.
    pub fn complete(&mut self, id: StreamId) -> bool {
        let completed = self.streams.remove(&id).is_some();
        if completed {
            debug!("Completed {id}");
        }

        completed
    }

    /// Cancels a single stream and returns the session it was feeding.
    pub fn cancel(&mut self, id: StreamId) -> Option<SessionId> {
        let stream = self.streams.remove(&id)?;
        stream.token.cancel();
        debug!("Cancelled {id}");

        Some(stream.session)
    }

    /// Cancels every registered stream and returns the affected sessions in
    /// registration order.
    pub fn cancel_all(&mut self) -> Vec<SessionId> {
        let streams = std::mem::take(&mut self.streams);
        if !streams.is_empty() {
            debug!("Cancelling {} streams", streams.len());
        }

        streams
            .into_values()
            .map(|stream| {
                stream.token.cancel();
                stream.session
            })
            .collect()
    }

    #[must_use]
    pub fn token(&self, id: StreamId) -> Option<CancellationToken> {
        self.streams.get(&id).map(|stream| stream.token.clone())
    }

    #[must_use]
    pub fn contains(&self, id: StreamId) -> bool { self.streams.contains_key(&id) }

    #[must_use]
    pub fn len(&self) -> usize { self.streams.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.streams.is_empty() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_register_and_complete() {
        let mut registry = StreamRegistry::new();
        let (first, first_token) = registry.register(SessionId(0));
        let (second, _) = registry.register(SessionId(1));

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);

        assert!(registry.complete(first));
        assert!(!registry.complete(first));
        assert!(!first_token.is_cancelled());
        assert!(!registry.contains(first));
        assert!(registry.contains(second));
    }

    #[test]
    fn test_cancel_flags_shared_token() {
        let mut registry = StreamRegistry::new();
        let (id, token) = registry.register(SessionId(7));
        let producer_token = registry.token(id).unwrap();

        assert_eq!(registry.cancel(id), Some(SessionId(7)));
        assert!(token.is_cancelled());
        assert!(producer_token.is_cancelled());
        assert_eq!(registry.cancel(id), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut registry = StreamRegistry::new();
        let tokens = (0..3)
            .map(|session| registry.register(SessionId(session)).1)
            .collect::<Vec<_>>();

        assert_eq!(
            registry.cancel_all(),
            vec![SessionId(0), SessionId(1), SessionId(2)]
        );
        assert!(tokens.iter().all(CancellationToken::is_cancelled));
        assert!(registry.is_empty());
        assert_eq!(registry.cancel_all(), vec![]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut registry = StreamRegistry::new();
        let (first, _) = registry.register(SessionId(0));
        registry.cancel_all();
        let (second, _) = registry.register(SessionId(0));

        assert_ne!(first, second);
    }
}
