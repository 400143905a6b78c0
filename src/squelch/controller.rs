use anyhow::{bail, Context, Result};
use log::info;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::services::HostServices;
use crate::squelch::executor::{run_attempt, AttemptContext, AttemptFlags, AttemptOutcome};
use crate::squelch::guard::SquelchGuard;

/// Owns the spawned attempt task: one cancellation token and join handle per
/// attempt, so the fire-and-forget task stays cancellable and joinable.
pub struct SquelchController {
    runtime: Handle,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SquelchController {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            handle: None,
            cancel_token: None,
        }
    }

    /// Spawn one squelch attempt. The caller has already won the guard;
    /// on error it is expected to release it again.
    pub fn spawn_attempt(
        &mut self,
        services: HostServices,
        guard: Arc<SquelchGuard>,
        flags: AttemptFlags,
    ) -> Result<()> {
        if self.handle.as_ref().is_some_and(|handle| !handle.is_finished()) {
            bail!("squelch attempt already in flight");
        }

        let cancel_token = CancellationToken::new();
        let ctx = AttemptContext {
            services,
            guard,
            flags,
            cancel: cancel_token.clone(),
        };

        let handle = self.runtime.spawn(async move {
            match run_attempt(ctx).await {
                AttemptOutcome::Committed { confirmed, samples } => {
                    info!(
                        "squelch committed after {} sample(s), bubble confirmed: {}",
                        samples, confirmed
                    );
                }
                AttemptOutcome::Aborted(reason) => {
                    info!("squelch attempt aborted: {:?}", reason);
                }
            }
        });

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Request cooperative cancellation of the in-flight attempt, if any.
    /// The loop notices at its next iteration boundary.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }

    pub fn take_handle(&mut self) -> Option<JoinHandle<()>> {
        self.handle.take()
    }

    /// Join the in-flight attempt after `cancel`; used on unload.
    pub async fn wait(&mut self) -> Result<()> {
        if let Some(handle) = self.take_handle() {
            handle.await.context("squelch attempt task failed to join")?;
        }
        Ok(())
    }
}
