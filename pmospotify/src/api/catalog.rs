//! Lecture des métadonnées du catalogue

use super::SpotifyApi;
use crate::error::Result;
use crate::models::{CatalogItem, CatalogReference};
use tracing::debug;

impl SpotifyApi {
    /// Récupère les métadonnées d'un objet du catalogue
    pub async fn get_item(&self, reference: &CatalogReference) -> Result<CatalogItem> {
        debug!("Fetching {} {}", reference.kind, reference.id);
        self.get(&reference.api_path()).await
    }
}
