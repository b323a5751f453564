//! Couche d'accès aux API REST Spotify
//!
//! Ce module fournit une interface bas-niveau pour communiquer avec le service
//! d'authentification (échange client-id/secret contre un token) et avec
//! l'API du catalogue.

pub mod auth;
pub mod catalog;

use crate::error::{SpotifyError, Result};
use auth::AuthToken;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// URL publique des objets du catalogue
pub const DEFAULT_WEB_BASE: &str = "https://open.spotify.com";

/// URL de base de l'API du catalogue
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com";

/// URL de base du service d'authentification
pub const DEFAULT_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Paramètres de connexion aux services Spotify
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    /// Préfixe des URLs reconnues comme références de catalogue
    pub web_base: String,
    pub api_base: String,
    pub accounts_base: String,
    /// Délai maximal d'une requête ; au-delà, l'appel échoue
    pub timeout: Duration,
}

impl SpotifySettings {
    /// Paramètres par défaut pour un couple client-id/secret
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            accounts_base: DEFAULT_ACCOUNTS_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client API bas-niveau pour communiquer avec Spotify
pub struct SpotifyApi {
    /// Client HTTP
    client: Client,
    settings: SpotifySettings,
    /// Token courant ; le verrou est tenu pendant tout le rafraîchissement
    token: Mutex<Option<AuthToken>>,
}

impl SpotifyApi {
    /// Crée une nouvelle instance de l'API
    pub fn new(settings: SpotifySettings) -> Result<Self> {
        if settings.client_id.is_empty() || settings.client_secret.is_empty() {
            return Err(SpotifyError::Configuration(
                "client_id and client_secret are required".to_string(),
            ));
        }

        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            settings,
            token: Mutex::new(None),
        })
    }

    /// Retourne les paramètres de connexion
    pub fn settings(&self) -> &SpotifySettings {
        &self.settings
    }

    /// Effectue une requête GET authentifiée sur l'API du catalogue
    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!(
            "{}{}",
            self.settings.api_base.trim_end_matches('/'),
            endpoint
        );
        let token = self.token().await?;

        debug!("GET {}", url);

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        match self.handle_response(response).await {
            Err(e) if e.is_auth_error() => {
                // Token révoqué côté serveur : le prochain appel en redemandera un
                self.invalidate_token().await;
                Err(e)
            }
            other => other,
        }
    }

    /// Traite la réponse HTTP
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status_code, error_text);
            return Err(SpotifyError::from_status_code(status_code, error_text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            SpotifyError::JsonParse(e)
        })
    }
}
