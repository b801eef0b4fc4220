//! Publish/subscribe notifications owned by a single component.
//!
//! DESIGN
//! ======
//! An `Emitter<P>` maps an event name to an ordered list of listeners. It is
//! composed into whichever component owns the notifications (the mesh for
//! `resize`/`save`, a text engine binding for its renderer events); nothing is
//! attached to foreign objects after the fact.
//!
//! ERROR HANDLING
//! ==============
//! A listener that fails is logged and skipped. Delivery to the remaining
//! listeners of the same notification always continues.

#[cfg(test)]
#[path = "emitter_test.rs"]
mod emitter_test;

use std::collections::HashMap;

use tracing::warn;

/// Handle returned by [`Emitter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Failure reported by a listener callback.
#[derive(Debug, thiserror::Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

type Callback<P> = Box<dyn FnMut(&P) -> Result<(), ListenerError>>;

struct Listener<P> {
    id: ListenerId,
    callback: Callback<P>,
}

/// Event name to ordered listener list.
pub struct Emitter<P> {
    listeners: HashMap<String, Vec<Listener<P>>>,
    next_id: u64,
}

impl<P> Default for Emitter<P> {
    fn default() -> Self {
        Self { listeners: HashMap::new(), next_id: 0 }
    }
}

impl<P> std::fmt::Debug for Emitter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.listeners.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        names.sort_unstable();
        f.debug_struct("Emitter").field("listeners", &names).finish()
    }
}

impl<P> Emitter<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event`. Listeners run in registration order.
    pub fn on<F>(&mut self, event: &str, callback: F) -> ListenerId
    where
        F: FnMut(&P) -> Result<(), ListenerError> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(event.to_owned())
            .or_default()
            .push(Listener { id, callback: Box::new(callback) });
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for list in self.listeners.values_mut() {
            let before = list.len();
            list.retain(|l| l.id != id);
            removed |= list.len() != before;
        }
        self.listeners.retain(|_, list| !list.is_empty());
        removed
    }

    /// Drop every listener for every event.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    /// Deliver `payload` to every listener of `event`.
    ///
    /// Returns the number of listeners that completed without error.
    pub fn emit(&mut self, event: &str, payload: &P) -> usize {
        let Some(list) = self.listeners.get_mut(event) else {
            return 0;
        };

        let mut delivered = 0;
        for listener in list.iter_mut() {
            match (listener.callback)(payload) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(event, listener = listener.id.0, error = %e, "emitter: listener failed"),
            }
        }
        delivered
    }
}
