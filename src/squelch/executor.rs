//! The squelch attempt itself: hover the opponent hero, wait for the
//! confirmation bubble to render, sample its brightness, and commit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::services::HostServices;
use crate::squelch::geometry::probe_layout;
use crate::squelch::guard::SquelchGuard;
use crate::squelch::luminance::average_luminance;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Minimum average brightness of the bubble region to count as visible.
/// Tolerates anti-aliasing and overlay translucency.
pub const MIN_BUBBLE_BRIGHTNESS: f64 = 0.67;

/// Additional samples beyond the first, so at most 5 samples per attempt.
pub const MAX_EXTRA_TRIES: u32 = 4;

/// Cooperative-cancellation inputs polled once per loop iteration.
#[derive(Clone)]
pub struct AttemptFlags {
    /// Cleared when the plugin unloads.
    pub running: Arc<AtomicBool>,
    /// Set by the user's toggle hot-key.
    pub disabled: Arc<AtomicBool>,
}

/// Everything one attempt needs; created fresh per attempt and discarded.
pub struct AttemptContext {
    pub services: HostServices,
    pub guard: Arc<SquelchGuard>,
    pub flags: AttemptFlags,
    pub cancel: CancellationToken,
}

impl AttemptContext {
    fn should_continue(&self) -> bool {
        !self.cancel.is_cancelled()
            && self.flags.running.load(Ordering::Acquire)
            && !self.flags.disabled.load(Ordering::Acquire)
            && self.services.match_state.game_in_progress()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The window handle could not be resolved. The guard stays spent for
    /// the rest of the match so an unresolvable target is not clicked at
    /// again and again.
    WindowUnresolved,
    /// The window lost foreground status between the turn event and the
    /// start of work. Guard reset; a later turn may retry.
    LostForeground,
    /// The client rectangle was unreadable or degenerate. Guard reset.
    BadWindowRect,
    /// Cancelled mid-loop: token fired, plugin unloaded, feature toggled
    /// off, or the match ended. Guard reset.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The committing click was issued. `confirmed` records whether the
    /// bubble was ever actually seen; the commit fires either way.
    Committed { confirmed: bool, samples: u32 },
    Aborted(AbortReason),
}

/// Run one squelch attempt to completion.
///
/// The caller has already won the guard's `Idle -> Attempting` transition;
/// this function owns every later guard transition for the attempt.
pub async fn run_attempt(ctx: AttemptContext) -> AttemptOutcome {
    let services = &ctx.services;

    let Some(window) = services.window.target_window() else {
        log_warn!("game window could not be resolved; giving up for this match");
        return AttemptOutcome::Aborted(AbortReason::WindowUnresolved);
    };

    if !services.window.is_target_foreground() {
        ctx.guard.abort_to_idle();
        return AttemptOutcome::Aborted(AbortReason::LostForeground);
    }

    let rect = match services.window.client_rect(window, true) {
        Ok(rect) if rect.width > 0 && rect.height > 0 => rect,
        Ok(rect) => {
            log_warn!("degenerate client rect {}x{}", rect.width, rect.height);
            ctx.guard.abort_to_idle();
            return AttemptOutcome::Aborted(AbortReason::BadWindowRect);
        }
        Err(err) => {
            log_warn!("client rect lookup failed: {err:#}");
            ctx.guard.abort_to_idle();
            return AttemptOutcome::Aborted(AbortReason::BadWindowRect);
        }
    };

    let layout = probe_layout(&rect);
    let saved_pointer = services.pointer.pointer_position();

    let mut confirmed = false;
    let mut samples = 0u32;
    let mut extra_tries = 0u32;

    while !confirmed && extra_tries <= MAX_EXTRA_TRIES {
        if !ctx.should_continue() {
            ctx.guard.abort_to_idle();
            return AttemptOutcome::Aborted(AbortReason::Cancelled);
        }

        // Non-committing click on the hero surfaces the emote menu.
        if let Err(err) = services.pointer.move_and_click(window, layout.hero, false) {
            log_warn!("hover click failed: {err:#}");
        }

        // Give the overlay one delay interval to render before sampling.
        sleep(services.config.hover_delay()).await;

        let capture = Arc::clone(&services.capture);
        let anchor = layout.bubble;
        let size = layout.capture_size;
        let frame =
            match tokio::task::spawn_blocking(move || capture.capture_region(window, anchor, size))
                .await
            {
                Ok(result) => result,
                Err(join_err) => Err(anyhow!("capture worker failed to join: {join_err}")),
            };
        samples += 1;

        confirmed = match frame {
            Ok(frame) => {
                let score = average_luminance(&frame);
                log_info!("sample {samples}: bubble region brightness {score:.3}");
                score >= MIN_BUBBLE_BRIGHTNESS
            }
            // A failed capture is indistinguishable from a timing artifact;
            // score it as "not visible" and let the loop retry.
            Err(err) => {
                log_warn!("capture failed, treating bubble as not visible: {err:#}");
                false
            }
        };

        if !confirmed {
            sleep(services.config.hover_delay()).await;
            extra_tries += 1;
        }
    }

    // Commit even when the bubble was never seen: its absence in the sample
    // may be a timing artifact rather than true absence.
    if let Err(err) = services.pointer.move_and_click(window, layout.bubble, true) {
        log_warn!("committing click failed: {err:#}");
    }

    services.pointer.set_pointer_position(saved_pointer);
    ctx.guard.settle();

    AttemptOutcome::Committed { confirmed, samples }
}
