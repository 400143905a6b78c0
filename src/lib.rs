//! When enabled, automatically squelches the opponent at the start of a
//! match by hovering the opponent hero, confirming that the squelch bubble
//! rendered via a brightness sample of the screen, and clicking it.
//!
//! The host environment (window lookup, pointer injection, screen capture,
//! match state, hot-keys, notifications) is consumed through the traits in
//! [`services`]; see [`plugin::AutosquelchPlugin`] for the lifecycle surface.

pub mod events;
pub mod plugin;
pub mod services;
pub mod settings;
pub mod squelch;
mod utils;

pub use events::{ActivePlayer, MatchEvents, MatchObserver};
pub use plugin::{AutosquelchPlugin, TOGGLE_HOTKEY};
pub use services::HostServices;
pub use squelch::{SquelchController, SquelchGuard};

/// Initialize logging for hosts that do not bring their own `log`
/// implementation (reads `RUST_LOG`). Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
