//! Session bootstrapper.
//!
//! [`SessionService`] owns the authentication state of one client process:
//! the current session, the user resolved from it, whether backend
//! credentials are present, and the last error. It is constructed and
//! injected explicitly; there is no global instance.
//!
//! Lifecycle: `Uninitialized -> Loading -> Ready`. [`SessionService::init`]
//! asks the [`SessionSource`] for the current session once, under a hard
//! timeout, then keeps a subscription to session-change events open until
//! [`SessionService::dispose`] (or drop).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::identity::{ResolvedUser, Session, SessionEvent};
use crate::role_resolver::RoleResolver;

/// Hard limit on the initial session request.
pub const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown when backend credentials are absent from the environment.
pub const UNCONFIGURED_MESSAGE: &str =
    "Configuration Supabase manquante : définissez SUPABASE_URL et SUPABASE_ANON_KEY.";

/// Shown when the initial session request exceeds [`BOOTSTRAP_TIMEOUT`].
pub const BOOTSTRAP_TIMEOUT_MESSAGE: &str =
    "La vérification de la session prend trop de temps. Vérifiez votre connexion puis réessayez.";

/// Provider of the current session and of session-change notifications.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>, CoreError>;

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Ready,
}

/// Point-in-time view of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub configured: bool,
    #[serde(skip_serializing)]
    pub session: Option<Session>,
    pub user: Option<ResolvedUser>,
    pub error: Option<String>,
}

impl SessionSnapshot {
    fn initial(configured: bool) -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            configured,
            session: None,
            user: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }
}

pub struct SessionService {
    source: Option<Arc<dyn SessionSource>>,
    resolver: RoleResolver,
    state: Arc<watch::Sender<SessionSnapshot>>,
    cancel: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
    bootstrap_timeout: Duration,
}

impl SessionService {
    /// `source = None` means the backend is not configured.
    pub fn new(source: Option<Arc<dyn SessionSource>>, resolver: RoleResolver) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::initial(source.is_some()));
        Self {
            source,
            resolver,
            state: Arc::new(state),
            cancel: CancellationToken::new(),
            listener: Mutex::new(None),
            bootstrap_timeout: BOOTSTRAP_TIMEOUT,
        }
    }

    /// Override the bootstrap timeout.
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Bootstrap the session. Only the first call does any work; later calls
    /// return the current snapshot.
    pub async fn init(&self) -> SessionSnapshot {
        // Held until the listener is stored, so concurrent calls wait here
        // and then see a phase other than `Uninitialized`.
        let mut listener = self.listener.lock().await;
        if self.state.borrow().phase != SessionPhase::Uninitialized {
            return self.snapshot();
        }

        let Some(source) = self.source.clone() else {
            tracing::warn!("Backend credentials absent, session left unconfigured");
            self.state.send_modify(|s| {
                s.phase = SessionPhase::Ready;
                s.configured = false;
                s.error = Some(UNCONFIGURED_MESSAGE.to_string());
            });
            return self.snapshot();
        };

        self.state.send_modify(|s| {
            s.phase = SessionPhase::Loading;
            s.error = None;
        });

        // Subscribe before the request so no change is missed in between.
        let events = source.subscribe();

        match tokio::time::timeout(self.bootstrap_timeout, source.current_session()).await {
            Ok(Ok(session)) => {
                let user = self
                    .resolver
                    .resolve(session.as_ref().map(|s| &s.identity))
                    .await;
                tracing::info!(
                    signed_in = session.is_some(),
                    role = ?user.as_ref().map(|u| u.role),
                    "Session bootstrapped"
                );
                self.state.send_modify(|s| {
                    s.phase = SessionPhase::Ready;
                    s.session = session;
                    s.user = user;
                });
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Session bootstrap failed");
                self.state.send_modify(|s| {
                    s.phase = SessionPhase::Ready;
                    s.error = Some(e.to_string());
                });
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.bootstrap_timeout.as_secs_f64(),
                    "Session bootstrap timed out"
                );
                self.state.send_modify(|s| {
                    s.phase = SessionPhase::Ready;
                    s.error = Some(BOOTSTRAP_TIMEOUT_MESSAGE.to_string());
                });
            }
        }

        *listener = Some(tokio::spawn(listen(
            events,
            self.resolver.clone(),
            Arc::clone(&self.state),
            self.cancel.clone(),
        )));

        self.snapshot()
    }

    /// Release the session-change subscription. Idempotent.
    pub async fn dispose(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.listener.lock().await.take() {
            let _ = handle.await;
            tracing::debug!("Session listener released");
        }
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Apply session-change events to the shared state until cancelled or the
/// source closes its channel.
async fn listen(
    mut events: broadcast::Receiver<SessionEvent>,
    resolver: RoleResolver,
    state: Arc<watch::Sender<SessionSnapshot>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = events.recv() => match received {
                Ok(event) => {
                    tracing::debug!(event = event.name(), "Session change received");
                    let session = event.session().cloned();
                    let user = resolver.resolve(session.as_ref().map(|s| &s.identity)).await;
                    state.send_modify(|s| {
                        s.phase = SessionPhase::Ready;
                        s.session = session;
                        s.user = user;
                        s.error = None;
                    });
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session listener lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}
