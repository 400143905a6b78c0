//! Plugin lifecycle surface: load/unload, the match-event observer, and the
//! toggle hot-key.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::{error, info};
use tokio::runtime::Handle;

use crate::events::{ActivePlayer, MatchEvents, MatchObserver, SubscriptionId};
use crate::services::{HostServices, Hotkey};
use crate::squelch::executor::AttemptFlags;
use crate::squelch::{GuardState, SquelchController, SquelchGuard};

/// Ctrl+Alt+D temporarily turns the autosquelch off.
pub const TOGGLE_HOTKEY: Hotkey = Hotkey::ctrl_alt('D');

/// When enabled, automatically squelches the opponent at the start of a
/// match. Construct with the host's services, call `on_load` once at
/// startup and `on_unload` at shutdown.
pub struct AutosquelchPlugin {
    inner: Arc<PluginInner>,
    subscription: Option<SubscriptionId>,
}

struct PluginInner {
    services: HostServices,
    guard: Arc<SquelchGuard>,
    running: Arc<AtomicBool>,
    disabled: Arc<AtomicBool>,
    controller: Mutex<SquelchController>,
}

impl AutosquelchPlugin {
    pub fn new(services: HostServices, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(PluginInner {
                services,
                guard: Arc::new(SquelchGuard::new()),
                running: Arc::new(AtomicBool::new(false)),
                disabled: Arc::new(AtomicBool::new(false)),
                controller: Mutex::new(SquelchController::new(runtime)),
            }),
            subscription: None,
        }
    }

    /// Subscribe to match events and register the toggle hot-key.
    pub fn on_load(&mut self, events: &MatchEvents) -> Result<()> {
        self.inner.guard.reset();
        self.inner.running.store(true, Ordering::Release);

        let inner = Arc::clone(&self.inner);
        self.inner.services.hotkeys.register(
            TOGGLE_HOTKEY,
            "Toggle Autosquelch",
            Box::new(move || inner.toggle()),
        )?;

        let observer: Arc<dyn MatchObserver> = self.inner.clone();
        self.subscription = Some(events.subscribe(observer));
        info!("autosquelch loaded");
        Ok(())
    }

    /// Unsubscribe, unregister the hot-key, and cancel and join any
    /// in-flight attempt.
    pub async fn on_unload(&mut self, events: &MatchEvents) {
        self.inner.running.store(false, Ordering::Release);

        if let Some(id) = self.subscription.take() {
            events.unsubscribe(id);
        }
        self.inner.services.hotkeys.unregister(&TOGGLE_HOTKEY);

        let handle = {
            let mut controller = self.inner.controller.lock().unwrap();
            controller.cancel();
            controller.take_handle()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        info!("autosquelch unloaded");
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.load(Ordering::Acquire)
    }

    /// Join the in-flight attempt, if any. Used in tests and by hosts that
    /// want a quiescent pointer before doing their own automation.
    pub async fn wait_for_attempt(&self) {
        let handle = self.inner.controller.lock().unwrap().take_handle();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl PluginInner {
    fn toggle(&self) {
        let was_disabled = self.disabled.fetch_xor(true, Ordering::AcqRel);
        let state = if was_disabled { "enabled" } else { "disabled" };
        self.services
            .notifier
            .show(&format!("Autosquelch is now {state}"));
    }
}

impl MatchObserver for PluginInner {
    fn match_started(&self) {
        // A leftover attempt from the previous match must not click into the
        // new one; its token is cancelled before the guard reopens.
        self.controller.lock().unwrap().cancel();
        self.guard.reset();
    }

    fn turn_started(&self, _active_player: ActivePlayer) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        if self.guard.state() != GuardState::Idle {
            return;
        }
        if !self.services.window.is_target_foreground() {
            return;
        }
        if !self.services.match_state.current_mode().supports_squelch() {
            return;
        }

        // Winning this transition is the idempotency commit; it happens
        // before any pointer action so a rapid second turn event cannot
        // start a second attempt.
        if !self.guard.try_begin_attempt() {
            return;
        }

        let flags = AttemptFlags {
            running: Arc::clone(&self.running),
            disabled: Arc::clone(&self.disabled),
        };
        let spawned = self.controller.lock().unwrap().spawn_attempt(
            self.services.clone(),
            Arc::clone(&self.guard),
            flags,
        );
        if let Err(err) = spawned {
            error!("failed to start squelch attempt: {err:#}");
            self.guard.abort_to_idle();
        }
    }
}
