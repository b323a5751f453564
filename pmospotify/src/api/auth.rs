//! Authentification par client credentials
//!
//! Le token est demandé au service de comptes puis conservé jusqu'à son
//! expiration. Le verrou du cache est tenu pendant l'échange : deux appels
//! concurrents ne déclenchent qu'une seule requête.

use super::SpotifyApi;
use crate::error::{Result, SpotifyError};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Token d'accès et son instant d'expiration
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AuthToken {
    /// Vrai tant que le token n'a pas expiré
    pub fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }

    /// Durée de validité restante
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Informations publiques sur le token courant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub access_token: String,
    /// Secondes restantes avant expiration
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

impl SpotifyApi {
    /// Retourne un token valide, en le renouvelant si besoin
    pub async fn token(&self) -> Result<String> {
        Ok(self.fresh_token().await?.value)
    }

    /// Retourne le token en cache et sa durée de validité restante
    ///
    /// Ne déclenche aucun échange : `None` si aucun token valide n'est en cache.
    pub async fn token_info(&self) -> Option<TokenInfo> {
        let guard = self.token.lock().await;
        guard.as_ref().filter(|t| t.is_valid()).map(|t| TokenInfo {
            access_token: t.value.clone(),
            expires_in: t.remaining().as_secs(),
        })
    }

    /// Oublie le token courant ; le prochain appel en redemande un
    pub async fn invalidate_token(&self) {
        let mut guard = self.token.lock().await;
        if guard.take().is_some() {
            debug!("Spotify token invalidated");
        }
    }

    async fn fresh_token(&self) -> Result<AuthToken> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.clone());
        }

        let token = self.request_token().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    async fn request_token(&self) -> Result<AuthToken> {
        let url = format!(
            "{}/api/token",
            self.settings.accounts_base.trim_end_matches('/')
        );

        debug!("Requesting Spotify token from {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Spotify token exchange refused ({}): {}", status, body);
            return Err(SpotifyError::Auth(format!(
                "token exchange failed with status {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Auth(format!("invalid token response: {}", e)))?;

        match (body.access_token, body.expires_in) {
            (Some(value), Some(expires_in)) if !value.is_empty() => {
                info!("Obtained Spotify token valid for {}s", expires_in);
                Ok(AuthToken {
                    value,
                    expires_at: Instant::now() + Duration::from_secs(expires_in),
                })
            }
            _ => Err(SpotifyError::Auth(
                "token response without access_token or expires_in".to_string(),
            )),
        }
    }
}
