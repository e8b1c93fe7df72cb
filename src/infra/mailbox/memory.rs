//! In-memory registry of callers waiting for a grant.

use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::core::{Delivery, Grant, JobKey, Mailbox};

/// Holds one completion handle per admitted request.
#[derive(Default)]
pub struct InMemoryMailbox {
    waiting: HashMap<JobKey, oneshot::Sender<Grant>>,
}

impl InMemoryMailbox {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Mailbox for InMemoryMailbox {
    fn register(&mut self, key: JobKey, sender: oneshot::Sender<Grant>) {
        self.waiting.insert(key, sender);
    }

    fn deliver(&mut self, key: &JobKey, grant: Grant) -> Delivery {
        match self.waiting.remove(key) {
            None => Delivery::NoCaller,
            Some(sender) => match sender.send(grant) {
                Ok(()) => Delivery::Delivered,
                Err(_) => Delivery::CallerGone,
            },
        }
    }

    fn len(&self) -> usize {
        self.waiting.len()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.waiting.keys().map(ToString::to_string).collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExecutionNumber, Preference};

    fn key(name: &str, exec: i64) -> JobKey {
        JobKey {
            name: name.into(),
            execution_number: ExecutionNumber::Valid(exec),
            ticket: 0,
        }
    }

    fn grant(name: &str, exec: i64) -> Grant {
        Grant {
            resource: "slot1@alpha".into(),
            job: name.into(),
            execution_number: ExecutionNumber::Valid(exec),
            preference: Preference::Performance,
        }
    }

    #[test]
    fn delivers_exactly_once() {
        let mut mailbox = InMemoryMailbox::new();
        let (tx, mut rx) = oneshot::channel();
        mailbox.register(key("a", 1), tx);
        assert_eq!(mailbox.keys(), ["a-1"]);

        assert_eq!(mailbox.deliver(&key("a", 1), grant("a", 1)), Delivery::Delivered);
        assert_eq!(rx.try_recv().unwrap().job, "a");
        assert_eq!(mailbox.deliver(&key("a", 1), grant("a", 1)), Delivery::NoCaller);
        assert_eq!(mailbox.len(), 0);
    }

    #[test]
    fn dropped_receiver_is_not_an_error() {
        let mut mailbox = InMemoryMailbox::new();
        let (tx, rx) = oneshot::channel();
        mailbox.register(key("gone", 2), tx);
        drop(rx);
        assert_eq!(mailbox.deliver(&key("gone", 2), grant("gone", 2)), Delivery::CallerGone);
        assert_eq!(mailbox.len(), 0);
    }
}
