//! Client-side session holder.
//!
//! [`AuthSession`] keeps the current session in memory and broadcasts a
//! [`SessionEvent`] on every change. It is the [`SessionSource`] behind the
//! core session bootstrapper.

use async_trait::async_trait;
use chrono::Utc;
use marches_core::error::CoreError;
use marches_core::identity::{Session, SessionEvent};
use marches_core::session::SessionSource;
use tokio::sync::{broadcast, RwLock};

use crate::client::GoTrueClient;
use crate::error::AuthApiError;

/// Capacity of the session-change channel.
const EVENT_CAPACITY: usize = 16;

pub struct AuthSession {
    client: GoTrueClient,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthSession {
    pub fn new(client: GoTrueClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            current: RwLock::new(None),
            events,
        }
    }

    pub fn client(&self) -> &GoTrueClient {
        &self.client
    }

    fn emit(&self, event: SessionEvent) {
        tracing::debug!(event = event.name(), "Session changed");
        // No subscriber is not an error.
        let _ = self.events.send(event);
    }

    /// Sign in with email and password and make the session current.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let session = self
            .client
            .sign_in_with_password(email, password)
            .await
            .map_err(AuthApiError::into_credentials_error)?;

        *self.current.write().await = Some(session.clone());
        self.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Exchange the refresh token of the current session.
    pub async fn refresh(&self) -> Result<Session, CoreError> {
        let refresh_token = self
            .current
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .ok_or_else(|| CoreError::Unauthorized("No session to refresh".into()))?;

        let session = self
            .client
            .refresh_session(&refresh_token)
            .await
            .map_err(CoreError::from)?;

        *self.current.write().await = Some(session.clone());
        self.emit(SessionEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Revoke the session at the service and clear it locally. The local
    /// session is cleared even when the revocation fails.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let previous = self.current.write().await.take();
        let result = match &previous {
            Some(session) => self
                .client
                .sign_out(&session.access_token)
                .await
                .map_err(CoreError::from),
            None => Ok(()),
        };
        if previous.is_some() {
            self.emit(SessionEvent::SignedOut);
        }
        result
    }

    /// Install a session obtained elsewhere (e.g. restored from disk).
    pub async fn restore(&self, session: Session) {
        *self.current.write().await = Some(session.clone());
        self.emit(SessionEvent::UserUpdated(session));
    }
}

#[async_trait]
impl SessionSource for AuthSession {
    /// The stored session, refreshed first when it has expired and a
    /// refresh token is available.
    async fn current_session(&self) -> Result<Option<Session>, CoreError> {
        let stored = self.current.read().await.clone();
        match stored {
            Some(session)
                if session.expires_at.is_some_and(|at| at <= Utc::now())
                    && session.refresh_token.is_some() =>
            {
                tracing::debug!("Stored session expired, refreshing");
                self.refresh().await.map(Some)
            }
            other => Ok(other),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
