//! Auth session state machine
//!
//! `anonymous -> authenticated -> anonymous`, with `loading` while a
//! transition is pending. [`AuthSession`] is the only writer; consumers get
//! snapshots through [`AuthSession::subscribe`].
//!
//! Every transition (login, logout, expiry) starts a new session generation.
//! A verification publishes its result only if the generation it started
//! under is still current, so a slow answer cannot revive a session that was
//! logged out, or end one that replaced it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use shared::client::LoginResponse;
use tokio::sync::watch;

use super::state::{AuthSnapshot, SessionUser};
use super::store::{SessionStore, TOKEN_KEY, USER_KEY, load_json, save_json};
use super::token;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::AuthApi;

const AUTH_UNAVAILABLE: &str = "Authentication service unavailable";
const SESSION_EXPIRED: &str = "Session expired, please log in again";

/// Result of one token verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Server confirmed the token
    Valid,
    /// Token expired locally; cleared without a network call
    Expired,
    /// Server refused the token; session cleared
    Invalid,
    /// Server unreachable; session kept, error flag set
    Unreachable,
    /// Nothing to verify
    NoToken,
    /// Session changed while the server answered; result discarded
    Superseded,
}

/// Result of a periodic session check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    NotAuthenticated,
    /// Enough lifetime left; no network call
    StillFresh,
    Verified(VerifyOutcome),
}

type VerifyFlight = Shared<BoxFuture<'static, VerifyOutcome>>;

/// Flight together with the generation it was started under
type FlightSlot = Option<(u64, VerifyFlight)>;

struct Inner {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<AuthSnapshot>,
    /// Bumped under the `state` lock on every transition
    generation: AtomicU64,
    login_gate: tokio::sync::Mutex<()>,
    verify_flight: Mutex<FlightSlot>,
    refresh_threshold: Duration,
}

/// Owner of the admin session
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<Inner>,
}

impl AuthSession {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn SessionStore>,
        refresh_threshold: Duration,
    ) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::initializing());
        Self {
            inner: Arc::new(Inner {
                api,
                store,
                state,
                generation: AtomicU64::new(0),
                login_gate: tokio::sync::Mutex::new(()),
                verify_flight: Mutex::new(None),
                refresh_threshold,
            }),
        }
    }

    /// Session over the configured refresh threshold
    pub fn from_config(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn SessionStore>,
        config: &ClientConfig,
    ) -> Self {
        Self::new(api, store, config.refresh_threshold)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    /// Restore a stored session, verifying it once before trusting it
    pub async fn initialize(&self) -> VerifyOutcome {
        let stored = match self.inner.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        let Some(token) = stored else {
            self.inner.publish(AuthSnapshot::anonymous(None));
            return VerifyOutcome::NoToken;
        };

        let user = load_json::<SessionUser>(self.inner.store.as_ref(), USER_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored user record unreadable");
            None
        });
        self.inner.publish(AuthSnapshot {
            user,
            token: Some(token),
            is_loading: true,
            ..AuthSnapshot::default()
        });

        self.verify_token().await
    }

    /// Log in and persist the session
    ///
    /// A second call while one is running fails with [`ClientError::InFlight`].
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<SessionUser> {
        let Ok(_gate) = self.inner.login_gate.try_lock() else {
            return Err(ClientError::InFlight);
        };

        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            let err = ClientError::Validation("Username and password are required".into());
            self.inner
                .publish(AuthSnapshot::anonymous(Some(err.user_message())));
            return Err(err);
        }

        self.inner.publish(AuthSnapshot {
            is_loading: true,
            ..AuthSnapshot::default()
        });

        let response = match self.inner.api.login(username, password).await {
            Ok(response) => response,
            Err(err) => {
                let message = if err.is_transport() {
                    AUTH_UNAVAILABLE.to_string()
                } else {
                    err.user_message()
                };
                tracing::warn!(%username, error = %err, "Login failed");
                self.inner.publish(AuthSnapshot::anonymous(Some(message)));
                return Err(err);
            }
        };

        match self.inner.persist(&response) {
            Ok(user) => {
                tracing::info!(username = %user.username, "Logged in");
                self.inner
                    .publish(AuthSnapshot::authenticated(response.token, Some(user.clone())));
                Ok(user)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to persist session");
                self.inner.clear_storage();
                self.inner
                    .publish(AuthSnapshot::anonymous(Some("Failed to save session".into())));
                Err(err.into())
            }
        }
    }

    /// Verify the current token
    ///
    /// Concurrent callers within one session generation share one
    /// verification. While a login is running the snapshot holds no token,
    /// so no call is made.
    pub async fn verify_token(&self) -> VerifyOutcome {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let flight = {
            let mut slot = self.inner.flight_slot();
            match slot.as_ref() {
                Some((owner, flight)) if *owner == generation => flight.clone(),
                _ => {
                    let inner = self.inner.clone();
                    let flight = async move {
                        let outcome = inner.verify_once().await;
                        let mut slot = inner.flight_slot();
                        if slot.as_ref().is_some_and(|(owner, _)| *owner == generation) {
                            *slot = None;
                        }
                        outcome
                    }
                    .boxed()
                    .shared();
                    *slot = Some((generation, flight.clone()));
                    flight
                }
            }
        };
        flight.await
    }

    /// Clear the session unconditionally
    pub fn logout(&self) {
        self.inner.clear_storage();
        self.inner.publish(AuthSnapshot::anonymous(None));
        tracing::info!("Logged out");
    }

    /// Periodic check: verify upstream only when the token is close to expiry
    pub async fn check_session(&self) -> SessionCheck {
        let snapshot = self.snapshot();
        if !snapshot.is_authenticated {
            return SessionCheck::NotAuthenticated;
        }
        let Some(token) = snapshot.token else {
            return SessionCheck::NotAuthenticated;
        };

        let now = shared::util::now_secs();
        let needs_check = token::is_expired(&token, now)
            || token::remaining(&token, now).is_some_and(|left| left < self.inner.refresh_threshold);
        if !needs_check {
            return SessionCheck::StillFresh;
        }
        SessionCheck::Verified(self.verify_token().await)
    }
}

impl Inner {
    /// Replace the snapshot and start a new generation
    fn publish(&self, snapshot: AuthSnapshot) {
        self.state.send_modify(|current| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = snapshot;
        });
    }

    /// Replace the snapshot unless a transition happened since `generation`
    fn publish_if_current(&self, generation: u64, snapshot: AuthSnapshot) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = snapshot;
            true
        })
    }

    /// End the session unless a transition happened since `generation`
    fn clear_if_current(&self, generation: u64, error: Option<String>) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.clear_storage();
            *current = AuthSnapshot::anonymous(error);
            true
        })
    }

    fn flight_slot(&self) -> MutexGuard<'_, FlightSlot> {
        self.verify_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, response: &LoginResponse) -> Result<SessionUser, super::store::StoreError> {
        let user = SessionUser {
            username: response.user.username.clone(),
            login_time: shared::util::now_iso(),
            nickname: response.user.nickname.clone(),
            role: response.user.role.clone(),
        };
        self.store.set(TOKEN_KEY, &response.token)?;
        save_json(self.store.as_ref(), USER_KEY, &user)?;
        Ok(user)
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear stored session");
            }
        }
    }

    /// End the session after a negative answer
    fn expire(&self, generation: u64, reason: &str) -> VerifyOutcome {
        if self.clear_if_current(generation, Some(SESSION_EXPIRED.into())) {
            tracing::info!("{reason}, clearing session");
            VerifyOutcome::Invalid
        } else {
            Self::superseded()
        }
    }

    fn superseded() -> VerifyOutcome {
        tracing::debug!("Session changed during verification, result dropped");
        VerifyOutcome::Superseded
    }

    async fn verify_once(&self) -> VerifyOutcome {
        let (generation, current) = {
            let state = self.state.borrow();
            (self.generation.load(Ordering::SeqCst), state.clone())
        };
        let Some(token) = current.token.clone() else {
            return VerifyOutcome::NoToken;
        };

        if token::is_expired(&token, shared::util::now_secs()) {
            return match self.expire(generation, "Token expired locally") {
                VerifyOutcome::Invalid => VerifyOutcome::Expired,
                outcome => outcome,
            };
        }

        match self.api.verify(&token).await {
            Ok(response) if response.valid => {
                let mut user = current.user;
                if user.is_none()
                    && let Some(info) = response.user
                {
                    user = Some(SessionUser {
                        username: info.username,
                        login_time: shared::util::now_iso(),
                        nickname: info.nickname,
                        role: info.role,
                    });
                }
                if self.publish_if_current(generation, AuthSnapshot::authenticated(token, user)) {
                    VerifyOutcome::Valid
                } else {
                    Self::superseded()
                }
            }
            Ok(_) => self.expire(generation, "Token rejected by server"),
            Err(err @ (ClientError::Rejected { .. } | ClientError::Validation(_))) => {
                tracing::debug!(error = %err, "Verification refused");
                self.expire(generation, "Token rejected by server")
            }
            Err(err) => {
                // Keep the session; the server may come back
                tracing::warn!(error = %err, "Token verification unreachable");
                let kept = AuthSnapshot {
                    is_authenticated: true,
                    user: current.user,
                    token: Some(token),
                    is_loading: false,
                    error: Some(AUTH_UNAVAILABLE.into()),
                };
                if self.publish_if_current(generation, kept) {
                    VerifyOutcome::Unreachable
                } else {
                    Self::superseded()
                }
            }
        }
    }
}
