//! User-facing failure reporting.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::CartError;

/// Shown when an add would take an item past its available stock.
pub const STOCK_EXCEEDED: &str = "Requested quantity is out of stock";

/// Shown when an add fails for any other reason.
pub const ADD_FAILED: &str = "Could not add the product to the cart";

/// Shown when a removal fails.
pub const REMOVE_FAILED: &str = "Could not remove the product from the cart";

/// Shown when an amount change fails, whatever the reason.
pub const AMOUNT_CHANGE_FAILED: &str = "Could not change the product quantity";

/// The three cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddItem,
    RemoveItem,
    SetItemAmount,
}

impl CartOperation {
    /// Returns the operation name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddItem => "add_item",
            CartOperation::RemoveItem => "remove_item",
            CartOperation::SetItemAmount => "set_item_amount",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a failed operation to the message the user sees.
pub fn notification_message(operation: CartOperation, error: &CartError) -> &'static str {
    match operation {
        CartOperation::AddItem => match error {
            CartError::InsufficientStock { .. } => STOCK_EXCEEDED,
            _ => ADD_FAILED,
        },
        CartOperation::RemoveItem => REMOVE_FAILED,
        CartOperation::SetItemAmount => AMOUNT_CHANGE_FAILED,
    }
}

/// Channel that shows failure reasons to the user.
///
/// Fire-and-forget: the cart never waits on or inspects the outcome.
pub trait NotificationSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Sink that emits every report as a warning log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn report(&self, message: &str) {
        tracing::warn!(target: "cart::notification", notification = message, "user notified");
    }
}

/// Sink that records reports for later inspection.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl InMemoryNotificationSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message reported so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent message.
    pub fn last(&self) -> Option<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Forgets all recorded messages.
    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
