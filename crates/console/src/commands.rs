//! Command implementations.
//!
//! Every command that talks to the dashboard API first signs in with the
//! configured credentials; the API only accepts bearer tokens.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Utc};
use marches_auth::{AuthSession, GoTrueClient, RestProfileLookup};
use marches_core::identity::Session;
use marches_core::role_resolver::{ProfileLookup, RoleResolver};
use marches_core::session::{SessionService, SessionSource, UNCONFIGURED_MESSAGE};

use crate::api::MarchesApi;
use crate::args::Command;
use crate::config::ConsoleConfig;
use crate::render;

/// Refresh this long before the access token expires.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

const MISSING_CREDENTIALS: &str = "MARCHES_EMAIL et MARCHES_PASSWORD sont requis";

/// Run a one-shot command and return what it prints. `watch` is handled by
/// [`watch`] since it runs until interrupted.
pub async fn run(command: Command, config: &ConsoleConfig) -> anyhow::Result<String> {
    match command {
        Command::WhoAmI => whoami(config).await,
        Command::Dashboard => dashboard(config).await,
        Command::Contracts { status, sort } => {
            let token = sign_in(config).await?.access_token;
            let rows = MarchesApi::new(&config.api_url)
                .contracts(&token, status, sort)
                .await
                .context("Chargement des contrats")?;
            Ok(render::render_contracts(&rows))
        }
        Command::Watch => Err(anyhow!("watch is not a one-shot command")),
    }
}

// ---------------------------------------------------------------------------
// Session plumbing
// ---------------------------------------------------------------------------

/// Signed-in session for API calls.
async fn sign_in(config: &ConsoleConfig) -> anyhow::Result<Session> {
    let client = GoTrueClient::from_config(&config.backend)
        .ok_or_else(|| anyhow!(UNCONFIGURED_MESSAGE))?;
    let credentials = config
        .credentials
        .as_ref()
        .ok_or_else(|| anyhow!(MISSING_CREDENTIALS))?;

    let session = AuthSession::new(client)
        .sign_in(&credentials.email, &credentials.password)
        .await?;
    tracing::debug!(user_id = %session.identity.id, "Signed in");
    Ok(session)
}

/// Session holder and bootstrapper wired to the configured backend.
///
/// When credentials are configured the holder is signed in first, so the
/// profile lookup runs with the user's token.
struct ConsoleSession {
    auth: Option<Arc<AuthSession>>,
    service: SessionService,
}

impl ConsoleSession {
    async fn open(config: &ConsoleConfig) -> anyhow::Result<Self> {
        let client = GoTrueClient::from_config(&config.backend);
        let auth = client.clone().map(|c| Arc::new(AuthSession::new(c)));

        let mut access_token = None;
        if let (Some(auth), Some(credentials)) = (&auth, &config.credentials) {
            let session = auth.sign_in(&credentials.email, &credentials.password).await?;
            access_token = Some(session.access_token);
        }

        let lookup = client.as_ref().map(|c| {
            let lookup = match &access_token {
                Some(token) => RestProfileLookup::new(c).with_access_token(token.clone()),
                None => RestProfileLookup::new(c),
            };
            Arc::new(lookup) as Arc<dyn ProfileLookup>
        });
        let service = SessionService::new(
            auth.clone().map(|a| a as Arc<dyn SessionSource>),
            RoleResolver::new(lookup),
        );
        Ok(Self { auth, service })
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub async fn whoami(config: &ConsoleConfig) -> anyhow::Result<String> {
    let console = ConsoleSession::open(config).await?;
    let snapshot = console.service.init().await;
    console.service.dispose().await;

    if let Some(error) = snapshot.error {
        bail!(error);
    }
    Ok(match snapshot.user {
        Some(user) => render::render_user(&user),
        None => format!("Aucune session active ({MISSING_CREDENTIALS})\n"),
    })
}

pub async fn dashboard(config: &ConsoleConfig) -> anyhow::Result<String> {
    let token = sign_in(config).await?.access_token;
    let summary = MarchesApi::new(&config.api_url)
        .summary(&token)
        .await
        .context("Chargement du tableau de bord")?;
    Ok(render::render_summary(&summary))
}

/// Time to wait before refreshing a session expiring at `expires_at`.
/// `None` when the session never expires.
pub fn refresh_delay(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Duration> {
    let expires_at = expires_at?;
    let remaining = (expires_at - now).to_std().unwrap_or(Duration::ZERO);
    Some(remaining.saturating_sub(REFRESH_MARGIN))
}

/// Print every session change until Ctrl-C, refreshing the token ahead of
/// expiry, then release the subscription.
pub async fn watch(config: &ConsoleConfig) -> anyhow::Result<()> {
    let console = ConsoleSession::open(config).await?;
    let mut changes = console.service.watch();

    let snapshot = console.service.init().await;
    changes.borrow_and_update();
    println!("{}", render::render_snapshot(&snapshot));
    let mut expires_at = snapshot.session.and_then(|s| s.expires_at);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, closing session");
                break;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = changes.borrow_and_update().clone();
                println!("{}", render::render_snapshot(&snapshot));
                expires_at = snapshot.session.and_then(|s| s.expires_at);
            }
            _ = sleep_for(refresh_delay(expires_at, Utc::now())) => {
                let Some(auth) = &console.auth else {
                    expires_at = None;
                    continue;
                };
                match auth.refresh().await {
                    Ok(session) => expires_at = session.expires_at,
                    Err(e) => {
                        tracing::warn!(error = %e, "Token refresh failed, signing out");
                        expires_at = None;
                        let _ = auth.sign_out().await;
                    }
                }
            }
        }
    }

    console.service.dispose().await;
    Ok(())
}

/// Sleep for `delay`, or forever when there is nothing to wait for.
async fn sleep_for(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}
