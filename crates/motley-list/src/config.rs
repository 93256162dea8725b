//! Dispatcher configuration.

/// What [`Dispatcher::set_items`](crate::Dispatcher::set_items) does with an
/// empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyItemsPolicy {
    /// Keep the current items and send no invalidation.
    #[default]
    Ignore,
    /// Clear the current items and invalidate, like a data reset that keeps
    /// handler state.
    Clear,
}

/// What happens when a second handler is registered for an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The new handler replaces the old one under the same type key.
    #[default]
    Replace,
    /// The new handler is dropped and registration fails.
    Reject,
}

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    pub empty_items: EmptyItemsPolicy,
    pub duplicate_registration: DuplicatePolicy,
}

impl DispatcherConfig {
    pub fn with_empty_items(mut self, policy: EmptyItemsPolicy) -> Self {
        self.empty_items = policy;
        self
    }

    pub fn with_duplicate_registration(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_registration = policy;
        self
    }
}
