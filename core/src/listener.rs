//! Change notification for [`crate::KnowledgeBase`].
//!
//! Listeners run synchronously inside the mutating call, in subscription
//! order. A listener that blocks, blocks the writer.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::model::Statement;

/// Receives the statements a knowledge base accepts.
pub trait KnowledgeBaseListener: Send + Sync {
    /// Called once for every statement that was newly added.
    fn on_statement_added(&self, statement: &Statement);

    /// Called once per [`crate::KnowledgeBase::add_statements`] call with the
    /// statements it actually added, after the per-statement calls.
    fn on_statements_added(&self, statements: &[Statement]);
}

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

/// Handle returned by [`crate::KnowledgeBase::subscribe`]; pass it back to
/// [`crate::KnowledgeBase::unsubscribe`] to deregister the listener.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a listener can only be removed through its subscription"]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    /// Process-unique identifier of this subscription.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Registered listeners in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(u64, Arc<dyn KnowledgeBaseListener>)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Arc<dyn KnowledgeBaseListener>) -> Subscription {
        let id = NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed);
        self.entries.push((id, listener));
        tracing::trace!(subscription = id, "listener subscribed");
        Subscription { id }
    }

    pub(crate) fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != subscription.id);
        let removed = self.entries.len() != before;
        tracing::trace!(subscription = subscription.id, removed, "listener unsubscribed");
        removed
    }

    pub(crate) fn statement_added(&self, statement: &Statement) {
        for (_, listener) in &self.entries {
            listener.on_statement_added(statement);
        }
    }

    pub(crate) fn statements_added(&self, statements: &[Statement]) {
        for (_, listener) in &self.entries {
            listener.on_statements_added(statements);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
