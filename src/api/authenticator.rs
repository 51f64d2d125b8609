//! The request authenticator.
//!
//! Wraps outgoing HTTP calls: attaches a bearer credential, transparently
//! refreshes an expired one, and forces a logout when nothing usable is
//! left. The decision tree runs once per request; there is no persistent
//! state machine here.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Request, Response};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::credentials::CredentialStore;
use crate::auth::session::SessionController;
use crate::auth::token;
use crate::config::Config;
use crate::navigation::{LoginRedirect, Navigator};

use super::AuthError;

/// Paths equal to this never get a `returnUrl` on forced logout.
const ROOT_PATH: &str = "/";

#[derive(Debug, Deserialize)]
struct RefreshEnvelope {
    #[serde(default)]
    data: Option<RefreshData>,
}

#[derive(Debug, Deserialize)]
struct RefreshData {
    #[serde(default)]
    data: Option<RefreshPayload>,
}

#[derive(Debug, Deserialize)]
struct RefreshPayload {
    #[serde(default)]
    access_token: Option<String>,
}

/// Decides, per outgoing request, whether a valid bearer credential can be
/// attached, refreshes it if expired, or triggers logout if unrecoverable.
///
/// Constructed once with its collaborators injected; cheap to share behind
/// an `Arc`.
pub struct RequestAuthenticator {
    client: Client,
    config: Config,
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn SessionController>,
    navigator: Arc<dyn Navigator>,
    /// At most one refresh call in flight. Requests that queue behind it
    /// re-read the store and reuse the fresh credential.
    refresh_gate: Mutex<()>,
}

impl RequestAuthenticator {
    pub fn new(
        config: Config,
        store: Arc<dyn CredentialStore>,
        session: Arc<dyn SessionController>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            store,
            session,
            navigator,
            refresh_gate: Mutex::new(()),
        })
    }

    /// Attach a valid bearer credential to `request`, refreshing it first
    /// if necessary.
    ///
    /// On any failure the session and stored credentials are cleared and
    /// the navigator is sent to the login view; the error only says why.
    pub async fn authenticate(&self, mut request: Request) -> Result<Request, AuthError> {
        match self.attach_credential(&mut request).await {
            Ok(()) => Ok(request),
            Err(e) => {
                warn!(error = %e, "request authentication failed, logging out");
                self.logout();
                Err(e)
            }
        }
    }

    /// Authenticate `request`, then dispatch it.
    pub async fn execute(&self, request: Request) -> Result<Response, AuthError> {
        let request = self.authenticate(request).await?;
        Ok(self.client.execute(request).await?)
    }

    async fn attach_credential(&self, request: &mut Request) -> Result<(), AuthError> {
        let credentials = self.store.get()?;
        let temporary = self.store.get_temporary()?;

        // Persistent access token wins; the temporary token only exists
        // when a persistent one was never issued.
        let active = credentials
            .access_token
            .clone()
            .or_else(|| temporary.clone());
        let Some(active) = active else {
            return Err(AuthError::MissingCredential);
        };

        if !token::is_expired(&active) {
            request
                .headers_mut()
                .insert(header::AUTHORIZATION, bearer(&active)?);
            return Ok(());
        }

        let Some(refresh_token) = credentials.refresh_token.clone() else {
            return Err(AuthError::ExpiredNoRefresh);
        };
        if token::is_expired(&refresh_token) {
            return Err(AuthError::ExpiredRefresh);
        }

        let _gate = self.refresh_gate.lock().await;

        // A request queued behind the gate may find the store already
        // refreshed; reuse that credential instead of refreshing again.
        let credentials = self.store.get()?;
        let temporary = self.store.get_temporary()?;
        if let Some(current) = credentials.access_token.as_deref().or(temporary.as_deref()) {
            if !token::is_expired(current) {
                debug!("credential already refreshed by a concurrent request");
                request
                    .headers_mut()
                    .insert(header::AUTHORIZATION, bearer(current)?);
                return Ok(());
            }
        }

        let new_token = self.refresh_access_token(&refresh_token).await?;

        let user = self.session.user();
        if credentials.access_token.is_some() {
            self.store.set(user.as_ref(), &new_token, &refresh_token)?;
        } else {
            // Partial login flow: no persistent access token was ever
            // issued, so the fresh token goes into the temporary slot.
            self.store.set(user.as_ref(), "", &refresh_token)?;
            self.store.set_temporary(&new_token)?;
        }

        request
            .headers_mut()
            .insert(header::AUTHORIZATION, bearer(&new_token)?);
        Ok(())
    }

    /// Exchange the refresh token for a new access token. Issued at most
    /// once per request.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let url = format!("{}/refresh-token", self.config.auth_base_url);
        debug!(url = %url, "refreshing access token");

        let response = self
            .client
            .post(&url)
            .bearer_auth(refresh_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailed(status));
        }

        let envelope: RefreshEnvelope = response
            .json()
            .await
            .map_err(|_| AuthError::MalformedRefreshResponse)?;

        envelope
            .data
            .and_then(|d| d.data)
            .and_then(|p| p.access_token)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedRefreshResponse)
    }

    /// Clear session state and stored credentials, then redirect to the
    /// login view. Safe to call repeatedly.
    pub fn logout(&self) {
        self.session.set_user(None);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear credential store");
        }
        if let Err(e) = self.store.clear_temporary() {
            warn!(error = %e, "failed to clear temporary token");
        }

        let path = self.navigator.current_path();
        let return_url = (path != ROOT_PATH).then_some(path);
        self.navigator.redirect_to_login(LoginRedirect {
            login_path: self.config.login_path.clone(),
            return_url,
        });
    }
}

fn bearer(token: &str) -> Result<HeaderValue, AuthError> {
    Ok(HeaderValue::from_str(&format!("Bearer {}", token))?)
}
