//! Client haut-niveau du catalogue Spotify
//!
//! [`SpotifyClient`] reconnaît les URLs de catalogue, récupère leurs
//! métadonnées et réécrit les cartes à partir de celles-ci.

use crate::api::auth::TokenInfo;
use crate::api::{SpotifyApi, SpotifySettings};
use crate::config_ext::SpotifyConfigExt;
use crate::error::{Result, SpotifyError};
use crate::models::{CatalogItem, CatalogReference};
use pmocards::Card;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

/// Client du catalogue : parsing d'URL, métadonnées et enrichissement
///
/// # Exemple
///
/// ```rust,no_run
/// use pmospotify::{SpotifyClient, SpotifySettings};
/// use pmocards::Card;
///
/// # async fn example() -> pmospotify::Result<()> {
/// let client = SpotifyClient::new(SpotifySettings::new("client-id", "secret"))?;
///
/// let mut card = Card::new("04a1b2c3");
/// card.content_id = Some("https://open.spotify.com/album/1weenld61qoidwYuZ1GESA?si=x".into());
/// if client.enrich_card(&mut card).await? {
///     println!("{:?}", card.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SpotifyClient {
    api: Arc<SpotifyApi>,
    reference_pattern: Regex,
}

impl SpotifyClient {
    /// Crée un client à partir de paramètres explicites
    pub fn new(settings: SpotifySettings) -> Result<Self> {
        let pattern = format!(
            r"^{}/([^/]+)/([^/?]+)(\?.*)$",
            regex::escape(settings.web_base.trim_end_matches('/'))
        );
        let reference_pattern = Regex::new(&pattern)
            .map_err(|e| SpotifyError::Configuration(format!("invalid web_base: {}", e)))?;

        Ok(Self {
            api: Arc::new(SpotifyApi::new(settings)?),
            reference_pattern,
        })
    }

    /// Crée un client à partir de la configuration globale
    pub fn from_config() -> Result<Self> {
        let config = pmoconfig::get_config();
        let settings = config.get_spotify_settings()?;
        info!("Spotify catalog client configured for {}", settings.web_base);
        Self::new(settings)
    }

    /// Accès à l'API bas-niveau
    pub fn api(&self) -> &SpotifyApi {
        &self.api
    }

    /// Reconnaît une URL `<web_base>/<kind>/<id>?<query>`
    ///
    /// La partie requête est obligatoire ; toute autre forme donne `None`.
    pub fn parse_reference(&self, url: &str) -> Option<CatalogReference> {
        let captures = self.reference_pattern.captures(url)?;
        Some(CatalogReference {
            kind: captures[1].to_string(),
            id: captures[2].to_string(),
        })
    }

    /// Récupère les métadonnées d'une référence
    pub async fn fetch_metadata(&self, reference: &CatalogReference) -> Result<CatalogItem> {
        self.api.get_item(reference).await
    }

    /// Parse puis récupère les métadonnées ; `None` si l'URL n'est pas du catalogue
    pub async fn fetch_url(&self, url: &str) -> Result<Option<CatalogItem>> {
        match self.parse_reference(url) {
            Some(reference) => Ok(Some(self.fetch_metadata(&reference).await?)),
            None => Ok(None),
        }
    }

    /// Retourne un token valide
    pub async fn token(&self) -> Result<String> {
        self.api.token().await
    }

    /// Token en cache, sans rafraîchissement
    pub async fn token_info(&self) -> Option<TokenInfo> {
        self.api.token_info().await
    }

    /// Réécrit une carte depuis le catalogue
    ///
    /// Retourne `false` sans rien modifier si le `content_id` de la carte
    /// n'est pas une référence de catalogue. La carte n'est pas enregistrée.
    pub async fn enrich_card(&self, card: &mut Card) -> Result<bool> {
        let Some(reference) = card
            .content_id
            .as_deref()
            .and_then(|c| self.parse_reference(c))
        else {
            debug!("Card {} has no catalog reference", card.id);
            return Ok(false);
        };

        let item = self.fetch_metadata(&reference).await?;
        item.apply_to(card, &reference);
        info!("Enriched card {} as {:?}", card.id, card.title);
        Ok(true)
    }
}
