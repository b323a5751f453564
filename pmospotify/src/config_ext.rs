//! Extension pour intégrer la configuration Spotify dans pmoconfig
//!
//! Clés lues sous `spotify` :
//!
//! ```yaml
//! spotify:
//!   client_id: "..."
//!   client_secret: "..."
//!   web_base: https://open.spotify.com      # optionnel
//!   api_base: https://api.spotify.com       # optionnel
//!   accounts_base: https://accounts.spotify.com  # optionnel
//!   timeout_secs: 10
//! ```

use crate::api::SpotifySettings;
use anyhow::{anyhow, Result};
use pmoconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

/// Trait d'extension pour gérer la configuration Spotify
pub trait SpotifyConfigExt {
    /// Construit les paramètres de connexion depuis la configuration
    ///
    /// Échoue si `client_id` ou `client_secret` est absent.
    fn get_spotify_settings(&self) -> Result<SpotifySettings>;

    /// Définit les credentials Spotify
    fn set_spotify_credentials(&self, client_id: &str, client_secret: &str) -> Result<()>;
}

impl SpotifyConfigExt for Config {
    fn get_spotify_settings(&self) -> Result<SpotifySettings> {
        let client_id = self
            .get_string(&["spotify", "client_id"])
            .ok_or_else(|| anyhow!("spotify.client_id is not configured"))?;
        let client_secret = self
            .get_string(&["spotify", "client_secret"])
            .ok_or_else(|| anyhow!("spotify.client_secret is not configured"))?;

        let mut settings = SpotifySettings::new(client_id, client_secret);
        if let Some(web_base) = self.get_string(&["spotify", "web_base"]) {
            settings.web_base = web_base;
        }
        if let Some(api_base) = self.get_string(&["spotify", "api_base"]) {
            settings.api_base = api_base;
        }
        if let Some(accounts_base) = self.get_string(&["spotify", "accounts_base"]) {
            settings.accounts_base = accounts_base;
        }
        if let Some(secs) = self.get_u64(&["spotify", "timeout_secs"]) {
            settings.timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }

    fn set_spotify_credentials(&self, client_id: &str, client_secret: &str) -> Result<()> {
        self.set_value(
            &["spotify", "client_id"],
            Value::String(client_id.to_string()),
        )?;
        self.set_value(
            &["spotify", "client_secret"],
            Value::String(client_secret.to_string()),
        )
    }
}
