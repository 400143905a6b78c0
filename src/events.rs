//! Typed match-lifecycle event registry.
//!
//! The host delivers match events on its own dispatch thread, one at a time.
//! Observers subscribe with an explicit id so the load/unload lifecycle is
//! auditable: the plugin subscribes once in `on_load` and unsubscribes in
//! `on_unload`.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Which player's turn started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePlayer {
    Player,
    Opponent,
}

pub trait MatchObserver: Send + Sync {
    fn match_started(&self);
    fn turn_started(&self, active_player: ActivePlayer);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

/// Observer registry for `match_started` / `turn_started` notifications.
/// Dispatch is synchronous, in subscription order.
#[derive(Default)]
pub struct MatchEvents {
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn MatchObserver>)>>,
}

impl MatchEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn MatchObserver>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.observers.lock().unwrap().push((id, observer));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock().unwrap();
        let before = observers.len();
        observers.retain(|(sub_id, _)| *sub_id != id);
        observers.len() != before
    }

    pub fn emit_match_started(&self) {
        for observer in self.snapshot() {
            observer.match_started();
        }
    }

    pub fn emit_turn_started(&self, active_player: ActivePlayer) {
        for observer in self.snapshot() {
            observer.turn_started(active_player);
        }
    }

    // Clone the list out of the lock so observers may subscribe or
    // unsubscribe from inside a callback.
    fn snapshot(&self) -> Vec<Arc<dyn MatchObserver>> {
        self.observers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}
