//! OAuth2 client-credentials token management.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::{Error, Result};

/// OAuth2 client credentials and the access token obtained with them.
///
/// The token is fetched eagerly when the credentials are created and is
/// replaced in place whenever it expires or a request is rejected with
/// `401 Unauthorized`.
///
/// # Thread Safety
///
/// `Credentials` is cheap to clone and can be shared across tasks. The
/// token and its expiration are guarded together by one lock, and a second
/// lock serialises renewals so that at most one token exchange is in flight;
/// concurrent requesters wait for it and reuse the new token.
#[derive(Clone)]
pub struct Credentials {
    state: Arc<RwLock<TokenState>>,
    renew_lock: Arc<Mutex<()>>,
    exchange: Arc<TokenExchange>,
}

struct TokenState {
    access_token: SecretString,
    /// Epoch seconds from the token's `exp` claim; `0` when unknown.
    expires_at: i64,
}

struct TokenExchange {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    client_secret: SecretString,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
}

impl Credentials {
    /// Exchange the client credentials for a first access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the token endpoint rejects the
    /// credentials, or [`Error::Http`] if it cannot be reached.
    pub async fn acquire(
        http: reqwest::Client,
        base_url: &Url,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: Option<&str>,
    ) -> Result<Self> {
        let mut token_url = base_url.join("/oauth/token")?;
        {
            let mut query = token_url.query_pairs_mut();
            query.append_pair("grant_type", "client_credentials");
            if let Some(scope) = scope {
                query.append_pair("scope", scope);
            }
        }

        let exchange = TokenExchange {
            http,
            token_url,
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        };

        let state = exchange.request_token().await?;

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            renew_lock: Arc::new(Mutex::new(())),
            exchange: Arc::new(exchange),
        })
    }

    /// Renew the token if its known expiration has passed.
    ///
    /// A token whose expiration could not be decoded is never renewed
    /// proactively; it is only replaced after a `401` response.
    pub async fn ensure_fresh(&self) -> Result<()> {
        if !self.is_expired().await {
            return Ok(());
        }

        let _guard = self.renew_lock.lock().await;
        // Another task may have renewed while we waited for the lock.
        if !self.is_expired().await {
            return Ok(());
        }

        debug!("access token expired, renewing");
        self.renew_locked().await
    }

    /// Unconditionally exchange the client credentials for a new token.
    pub async fn renew(&self) -> Result<()> {
        let _guard = self.renew_lock.lock().await;
        self.renew_locked().await
    }

    /// Renew after the server rejected `rejected_token`.
    ///
    /// If the current token already differs from the rejected one, another
    /// task renewed it in the meantime and no exchange is made.
    pub(crate) async fn renew_after_rejection(&self, rejected_token: &SecretString) -> Result<()> {
        let _guard = self.renew_lock.lock().await;

        let current = self.access_token().await;
        if current.expose_secret() != rejected_token.expose_secret() {
            debug!("access token already renewed by a concurrent request");
            return Ok(());
        }

        self.renew_locked().await
    }

    /// Returns `true` if the locally tracked expiration has passed.
    pub async fn is_expired(&self) -> bool {
        let expires_at = self.state.read().await.expires_at;
        expires_at != 0 && Utc::now().timestamp() >= expires_at
    }

    /// Expiration of the current token, if it could be decoded.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        let expires_at = self.state.read().await.expires_at;
        if expires_at == 0 {
            None
        } else {
            DateTime::from_timestamp(expires_at, 0)
        }
    }

    /// Get the current access token without checking its expiration.
    pub(crate) async fn access_token(&self) -> SecretString {
        self.state.read().await.access_token.clone()
    }

    async fn renew_locked(&self) -> Result<()> {
        let fresh = self.exchange.request_token().await?;
        let mut state = self.state.write().await;
        *state = fresh;
        Ok(())
    }
}

impl TokenExchange {
    async fn request_token(&self) -> Result<TokenState> {
        info!("requesting access token");

        let response = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "token exchange failed");
            return Err(Error::Authentication {
                status: Some(status.as_u16()),
                message: format!("Error retrieving an access token: {body}"),
            });
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = match decode_expiration(&token.access_token) {
            Some(exp) => exp,
            None => {
                warn!("could not decode access token expiration; proactive renewal disabled");
                0
            }
        };

        Ok(TokenState {
            access_token: SecretString::from(token.access_token),
            expires_at,
        })
    }
}

/// Decode the `exp` claim from the middle segment of a three-part token.
pub(crate) fn decode_expiration(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let (_, claims, _) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let decoded = URL_SAFE_NO_PAD.decode(claims.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&decoded).ok()?;
    Some(claims.exp)
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.exchange.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
