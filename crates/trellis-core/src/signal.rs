//! Type-safe signal/slot system for widget notifications.
//!
//! Widgets expose semantic events (a button was pushed, a slider finished
//! sliding, an entry's text changed) as [`Signal`] fields. Application code
//! connects closures to these signals; the widget emits them from inside its
//! event handlers.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let pushed = Signal::<u32>::new();
//! let id = pushed.connect(|count| println!("pushed {count} times"));
//! pushed.emit(1);
//! pushed.disconnect(id);
//! ```
//!
//! All emission happens on the event-loop thread, so every slot is invoked
//! directly. Slots are collected before invocation, which lets a slot connect
//! or disconnect other slots on the same signal without deadlocking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A signal that can have multiple connected slots.
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, usize)` for several.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Relaxed))
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect a slot, reporting a stale ID as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        (log, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn test_slider_values_arrive_in_order() {
        let moved = Signal::<f32>::new();
        let (log, slot) = recorder();
        moved.connect(slot);

        moved.emit(12.0);
        moved.emit(13.5);
        assert_eq!(*log.lock(), vec![12.0, 13.5]);
    }

    #[test]
    fn test_disconnected_slot_is_silent() {
        let toggled = Signal::<bool>::new();
        let (log, slot) = recorder();
        let id = toggled.connect(slot);

        toggled.emit(false);
        assert!(toggled.disconnect(id));
        toggled.emit(true);

        assert_eq!(*log.lock(), vec![false]);
        assert_eq!(toggled.try_disconnect(id), Err(SignalError::InvalidConnection));
    }

    #[test]
    fn test_blocked_edits_are_dropped() {
        let edited = Signal::<(String, String)>::new();
        let (log, slot) = recorder();
        edited.connect(slot);

        edited.set_blocked(true);
        edited.emit(("ab".to_string(), "a".to_string()));
        assert!(edited.is_blocked());
        edited.set_blocked(false);
        edited.emit(("abc".to_string(), "ab".to_string()));

        assert_eq!(*log.lock(), vec![("abc".to_string(), "ab".to_string())]);
    }

    #[test]
    fn test_every_listener_sees_a_push() {
        let pushed = Signal::<()>::new();
        let (log, _) = recorder::<u8>();
        for listener in 0..3u8 {
            let sink = Arc::clone(&log);
            pushed.connect(move |_| sink.lock().push(listener));
        }

        pushed.emit(());
        assert_eq!(*log.lock(), vec![0, 1, 2]);
        assert_eq!(pushed.connection_count(), 3);

        pushed.disconnect_all();
        assert_eq!(pushed.connection_count(), 0);
    }

    #[test]
    fn test_one_shot_slot_disconnects_itself() {
        let finished = Arc::new(Signal::<u8>::new());
        let calls = Arc::new(Mutex::new(0));
        let own_id: Arc<Mutex<Option<ConnectionId>>> = Arc::new(Mutex::new(None));

        let signal = Arc::clone(&finished);
        let id_slot = Arc::clone(&own_id);
        let counter = Arc::clone(&calls);
        let id = finished.connect(move |_| {
            *counter.lock() += 1;
            if let Some(id) = *id_slot.lock() {
                signal.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        finished.emit(0);
        finished.emit(1);
        assert_eq!(*calls.lock(), 1);
    }
}
