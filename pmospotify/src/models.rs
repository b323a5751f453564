//! Structures de données pour représenter les objets du catalogue Spotify

use pmocards::Card;
use serde::{Deserialize, Serialize};

/// Référence extraite d'une URL de catalogue : `<base>/<kind>/<id>?<query>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReference {
    /// Type d'objet ("track", "album", "playlist"...)
    pub kind: String,
    /// Identifiant dans le catalogue
    pub id: String,
}

impl CatalogReference {
    /// Chemin de l'endpoint de l'API (`/v1/albums/<id>`)
    pub fn api_path(&self) -> String {
        format!("/v1/{}s/{}", self.kind, self.id)
    }
}

/// Contributeur (artiste) d'un objet du catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// Image (pochette) d'un objet du catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// URLs publiques d'un objet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

/// Album parent d'une piste (seule la pochette nous intéresse)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumImages {
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Métadonnées d'un objet du catalogue, telles que retournées par l'API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Nom de l'objet
    pub name: String,
    /// Contributeurs (absents pour une playlist)
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Images, de la plus grande à la plus petite
    #[serde(default)]
    pub images: Vec<Image>,
    /// Description (playlists, podcasts)
    #[serde(default)]
    pub description: Option<String>,
    /// URL canonique de l'objet
    pub external_urls: ExternalUrls,
    /// Album parent (pistes uniquement)
    #[serde(default)]
    pub album: Option<AlbumImages>,
}

impl CatalogItem {
    /// Titre affichable : `"A, B - Nom"`, ou `"Nom"` sans contributeur
    pub fn display_title(&self) -> String {
        if self.artists.is_empty() {
            return self.name.clone();
        }

        let artists = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} - {}", artists, self.name)
    }

    /// Première image disponible ; pour une piste, celle de son album
    pub fn first_image(&self) -> Option<&str> {
        self.images
            .first()
            .or_else(|| self.album.as_ref().and_then(|a| a.images.first()))
            .map(|i| i.url.as_str())
    }

    /// Réécrit une carte à partir de ces métadonnées
    ///
    /// Le titre, l'URL canonique et le type sont toujours remplacés ; la
    /// description et la pochette seulement si le catalogue en fournit.
    pub fn apply_to(&self, card: &mut Card, reference: &CatalogReference) {
        card.title = Some(self.display_title());
        if let Some(description) = &self.description {
            card.description = Some(description.clone());
        }
        if let Some(art) = self.first_image() {
            card.art = Some(art.to_string());
        }
        card.content_id = Some(self.external_urls.spotify.clone());
        card.content_type = Some(reference.kind.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: &str) -> CatalogItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_display_title_with_artists() {
        let album = item(
            r#"{"name": "Moanin'", "artists": [{"name": "Art Blakey"}, {"name": "The Jazz Messengers"}],
                "external_urls": {"spotify": "https://open.spotify.com/album/1"}}"#,
        );
        assert_eq!(album.display_title(), "Art Blakey, The Jazz Messengers - Moanin'");
    }

    #[test]
    fn test_display_title_without_artists() {
        let playlist = item(
            r#"{"name": "Bedtime", "description": "Soft songs",
                "external_urls": {"spotify": "https://open.spotify.com/playlist/2"}}"#,
        );
        assert_eq!(playlist.display_title(), "Bedtime");
    }

    #[test]
    fn test_track_uses_album_image() {
        let track = item(
            r#"{"name": "So What", "artists": [{"name": "Miles Davis"}],
                "album": {"images": [{"url": "https://i.scdn.co/image/big", "width": 640, "height": 640}]},
                "external_urls": {"spotify": "https://open.spotify.com/track/3"}}"#,
        );
        assert_eq!(track.first_image(), Some("https://i.scdn.co/image/big"));
    }

    #[test]
    fn test_apply_to_card() {
        let playlist = item(
            r#"{"name": "Bedtime", "description": "Soft songs",
                "images": [{"url": "https://i.scdn.co/image/a"}, {"url": "https://i.scdn.co/image/b"}],
                "external_urls": {"spotify": "https://open.spotify.com/playlist/2"}}"#,
        );
        let reference = CatalogReference {
            kind: "playlist".to_string(),
            id: "2".to_string(),
        };
        let mut card = Card::new("t1");
        card.shuffle = true;

        playlist.apply_to(&mut card, &reference);

        assert_eq!(card.title.as_deref(), Some("Bedtime"));
        assert_eq!(card.description.as_deref(), Some("Soft songs"));
        assert_eq!(card.art.as_deref(), Some("https://i.scdn.co/image/a"));
        assert_eq!(
            card.content_id.as_deref(),
            Some("https://open.spotify.com/playlist/2")
        );
        assert_eq!(card.content_type.as_deref(), Some("playlist"));
        assert!(card.shuffle);
    }

    #[test]
    fn test_api_path() {
        let reference = CatalogReference {
            kind: "album".to_string(),
            id: "xyz".to_string(),
        };
        assert_eq!(reference.api_path(), "/v1/albums/xyz");
    }
}
