//! Periodic session check
//!
//! Ticks every `recheck_interval` while running; each tick runs
//! [`AuthSession::check_session`], which only calls the server when the
//! token is close to expiry.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use super::manager::{AuthSession, SessionCheck, VerifyOutcome};
use crate::config::ClientConfig;

/// Handle of the background check task
pub struct SessionMonitor {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SessionMonitor {
    /// Start the check loop on the current runtime
    pub fn spawn(session: AuthSession, every: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; initialization already verified
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match session.check_session().await {
                            SessionCheck::Verified(VerifyOutcome::Expired | VerifyOutcome::Invalid) => {
                                tracing::info!("Session ended by periodic check");
                            }
                            SessionCheck::Verified(VerifyOutcome::Unreachable) => {
                                tracing::warn!("Periodic check could not reach the server");
                            }
                            outcome => tracing::debug!(?outcome, "Periodic session check"),
                        }
                    }
                }
            }
            tracing::debug!("Session monitor stopped");
        });

        Self { cancel, handle }
    }

    /// Start the check loop with the configured re-check interval
    pub fn from_config(session: AuthSession, config: &ClientConfig) -> Self {
        Self::spawn(session, config.recheck_interval)
    }

    /// Ask the loop to stop after the current tick
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop and wait for the task to end
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Session monitor task failed");
        }
    }
}
