//! Change notification.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifies a connected slot; pass it to `disconnect` to remove the slot.
    pub struct ConnectionId;
}

/// A list of callbacks invoked on every emission.
///
/// Styles live on the UI thread, so slots need not be `Send`.
pub struct Signal<Args> {
    connections: SlotMap<ConnectionId, Box<dyn Fn(&Args)>>,
    blocked: bool,
}

impl<Args> Signal<Args> {
    /// Create a signal with no slots.
    pub fn new() -> Self {
        Self {
            connections: SlotMap::with_key(),
            blocked: false,
        }
    }

    /// Connect a slot.
    pub fn connect<F>(&mut self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        self.connections.insert(Box::new(slot))
    }

    /// Disconnect a slot. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        self.connections.remove(id).is_some()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// While blocked, `emit` does nothing.
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Invoke every connected slot.
    pub fn emit(&self, args: &Args) {
        if self.blocked {
            tracing::trace!(target: crate::targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        tracing::trace!(
            target: crate::targets::SIGNAL,
            connection_count = self.connections.len(),
            "emitting signal"
        );
        for slot in self.connections.values() {
            slot(args);
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connection_count", &self.connections.len())
            .field("blocked", &self.blocked)
            .finish()
    }
}
