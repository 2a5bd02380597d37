use crate::data_structures::AwsSessionState;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Owner of the current AWS session. Every transition replaces the whole
/// state, so readers never observe fields from two different sessions.
pub trait SessionStore {
    fn get(&self) -> AwsSessionState;
    fn set(&self, state: AwsSessionState);
    fn clear(&self);

    fn is_ready(&self) -> bool {
        self.get().is_ready()
    }
}

/// Cloneable handle; clones share the same session.
#[derive(Clone, Default)]
pub struct AwsSessionStore {
    state: Arc<RwLock<AwsSessionState>>,
}

impl AwsSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_aws_session(
        &self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
        arn_id: Option<i64>,
    ) {
        self.set(AwsSessionState::new(
            access_key,
            secret_key,
            session_token,
            arn_id,
        ));
    }

    pub fn clear_aws_session(&self) {
        self.clear();
    }
}

impl SessionStore for AwsSessionStore {
    fn get(&self) -> AwsSessionState {
        self.state.read().clone()
    }

    fn set(&self, state: AwsSessionState) {
        debug!(arn_id = ?state.arn_id(), "aws session set");
        *self.state.write() = state;
    }

    fn clear(&self) {
        debug!("aws session cleared");
        *self.state.write() = AwsSessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_empty() {
        let store = AwsSessionStore::new();
        assert_eq!(store.get(), AwsSessionState::default());
        assert!(!store.is_ready());
    }

    #[test]
    fn test_set_then_clear() {
        let store = AwsSessionStore::new();

        store.set_aws_session("a", "b", "c", Some(5));
        let state = store.get();
        assert_eq!(state.access_key(), "a");
        assert_eq!(state.secret_key(), "b");
        assert_eq!(state.session_token(), "c");
        assert_eq!(state.arn_id(), Some(5));
        assert!(store.is_ready());

        store.clear_aws_session();
        let state = store.get();
        assert_eq!(state.access_key(), "");
        assert_eq!(state.secret_key(), "");
        assert_eq!(state.session_token(), "");
        assert_eq!(state.arn_id(), None);
        assert!(!store.is_ready());
    }

    #[test]
    fn test_set_replaces_previous_session() {
        let store = AwsSessionStore::new();
        store.set_aws_session("old-key", "old-secret", "old-token", Some(1));
        store.set_aws_session("new-key", "new-secret", "", None);

        assert_eq!(
            store.get(),
            AwsSessionState::new("new-key", "new-secret", "", None)
        );
        assert!(!store.is_ready());
    }

    #[test]
    fn test_clones_share_state() {
        let store = AwsSessionStore::new();
        let handle = store.clone();

        handle.set_aws_session("a", "b", "c", Some(9));
        assert_eq!(store.get().arn_id(), Some(9));

        store.clear();
        assert!(handle.get().is_empty());
    }

    #[test]
    fn test_readers_never_see_mixed_sessions() {
        let store = AwsSessionStore::new();
        let writer = store.clone();

        let handle = thread::spawn(move || {
            for i in 0..500 {
                let tag = i.to_string();
                writer.set_aws_session(
                    format!("key-{}", tag),
                    format!("secret-{}", tag),
                    format!("token-{}", tag),
                    Some(i),
                );
                if i % 7 == 0 {
                    writer.clear_aws_session();
                }
            }
        });

        for _ in 0..500 {
            let state = store.get();
            match state.arn_id() {
                None => assert!(state.is_empty()),
                Some(i) => {
                    assert_eq!(state.access_key(), format!("key-{}", i));
                    assert_eq!(state.secret_key(), format!("secret-{}", i));
                    assert_eq!(state.session_token(), format!("token-{}", i));
                }
            }
        }

        handle.join().unwrap();
    }
}
