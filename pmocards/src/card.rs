//! Structure de données représentant une carte (tag NFC/RFID)

use crate::error::CardError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `content_type` posé par l'ancienne clé `playlist`
pub const LEGACY_PLAYLIST_CONTENT_TYPE: &str = "sonos.playlist";

/// Clés acceptées par [`Card::update`] ; toute autre clé est ignorée
pub const UPDATABLE_FIELDS: [&str; 6] = [
    "title",
    "description",
    "art",
    "content_type",
    "content_id",
    "shuffle",
];

/// Record de lecture associé à un identifiant de tag
///
/// L'identifiant n'est pas sérialisé : c'est la clé primaire de la table,
/// le record JSON ne contient que les six champs de métadonnées.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    /// Identifiant du tag, attribué par le lecteur
    #[serde(skip)]
    pub id: String,
    /// Titre affiché dans l'administration
    pub title: Option<String>,
    /// Description issue du catalogue
    pub description: Option<String>,
    /// URL de la pochette
    pub art: Option<String>,
    /// Type de contenu ("playlist", "music", type de catalogue...)
    pub content_type: Option<String>,
    /// Adresse du contenu, propre au backend (URI, URL de catalogue...)
    pub content_id: Option<String>,
    /// Lecture aléatoire
    pub shuffle: bool,
}

impl Card {
    /// Crée une carte vide pour un identifiant de tag
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Recharge une carte depuis son record JSON stocké
    ///
    /// Le record passe par [`Card::update`] : les anciens records qui
    /// portent encore la clé `playlist` restent jouables.
    pub fn load(id: impl Into<String>, metadata: &str) -> serde_json::Result<Self> {
        let data: Map<String, Value> = serde_json::from_str(metadata)?;
        let mut card = Card::new(id);
        card.update(&data).map_err(serde::de::Error::custom)?;
        Ok(card)
    }

    /// Sérialise le record (sans l'identifiant)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Vrai si la carte désigne un contenu jouable
    pub fn has_content(&self) -> bool {
        self.content_id.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Met à jour la carte depuis un dictionnaire de valeurs
    ///
    /// Seules les clés de [`UPDATABLE_FIELDS`] sont prises en compte, plus
    /// l'ancienne clé `playlist` qui fixe `content_id` et le type
    /// `sonos.playlist`. Un `null` efface un champ optionnel. Si une valeur a
    /// le mauvais type, la carte n'est pas modifiée du tout.
    pub fn update(&mut self, data: &Map<String, Value>) -> Result<(), CardError> {
        let mut next = self.clone();

        if let Some(value) = data.get("playlist") {
            next.content_id = optional_string("playlist", value)?;
            next.content_type = Some(LEGACY_PLAYLIST_CONTENT_TYPE.to_string());
        }

        for key in UPDATABLE_FIELDS {
            let Some(value) = data.get(key) else {
                continue;
            };
            match key {
                "title" => next.title = optional_string("title", value)?,
                "description" => next.description = optional_string("description", value)?,
                "art" => next.art = optional_string("art", value)?,
                "content_type" => next.content_type = optional_string("content_type", value)?,
                "content_id" => next.content_id = optional_string("content_id", value)?,
                "shuffle" => {
                    next.shuffle = match value {
                        Value::Bool(b) => *b,
                        Value::Null => false,
                        _ => {
                            return Err(CardError::InvalidField {
                                field: "shuffle",
                                expected: "a boolean",
                            });
                        }
                    }
                }
                _ => unreachable!(),
            }
        }

        *self = next;
        Ok(())
    }

    /// URL du lecteur intégré du catalogue
    ///
    /// Insère un segment `embed` juste après l'hôte :
    /// `https://open.spotify.com/track/x` devient
    /// `https://open.spotify.com/embed/track/x`.
    pub fn embed_url(&self) -> String {
        let Some(content_id) = self.content_id.as_deref().filter(|c| !c.is_empty()) else {
            return String::new();
        };

        let parts: Vec<&str> = content_id.split('/').collect();
        let head = parts.len().min(3);
        let mut out: Vec<&str> = parts[..head].to_vec();
        out.push("embed");
        out.extend_from_slice(&parts[head..]);
        out.join("/")
    }
}

fn optional_string(field: &'static str, value: &Value) -> Result<Option<String>, CardError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(CardError::InvalidField {
            field,
            expected: "a string or null",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_card_is_empty() {
        let card = Card::new("04a1b2");
        assert_eq!(card.id, "04a1b2");
        assert!(!card.has_content());
        assert!(!card.shuffle);
    }

    #[test]
    fn test_empty_content_id_is_not_playable() {
        let mut card = Card::new("t");
        card.content_id = Some(String::new());
        assert!(!card.has_content());
    }

    #[test]
    fn test_json_record_has_no_id() {
        let mut card = Card::new("t1");
        card.title = Some("Lullabies".to_string());
        let json: Value = serde_json::from_str(&card.to_json().unwrap()).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["title"], "Lullabies");
        assert_eq!(json["shuffle"], false);
        assert!(json["content_id"].is_null());
    }

    #[test]
    fn test_load_tolerates_missing_and_unknown_keys() {
        let card = Card::load("t2", r#"{"content_id": "x", "volume": 3}"#).unwrap();
        assert_eq!(card.id, "t2");
        assert_eq!(card.content_id.as_deref(), Some("x"));
        assert!(card.title.is_none());
        assert!(!card.shuffle);
    }

    #[test]
    fn test_update_ignores_unknown_keys() {
        let mut card = Card::new("t");
        card.update(&map(json!({"title": "A", "color": "red", "id": "other"})))
            .unwrap();

        assert_eq!(card.title.as_deref(), Some("A"));
        assert_eq!(card.id, "t");
    }

    #[test]
    fn test_update_null_clears_field() {
        let mut card = Card::new("t");
        card.art = Some("http://img".to_string());
        card.update(&map(json!({"art": null}))).unwrap();
        assert!(card.art.is_none());
    }

    #[test]
    fn test_update_rejects_wrong_type_without_partial_change() {
        let mut card = Card::new("t");
        let err = card
            .update(&map(json!({"title": "kept?", "shuffle": "yes"})))
            .unwrap_err();

        assert_eq!(
            err,
            CardError::InvalidField {
                field: "shuffle",
                expected: "a boolean"
            }
        );
        assert!(card.title.is_none());
    }

    #[test]
    fn test_update_legacy_playlist_key() {
        let mut card = Card::new("t");
        card.update(&map(json!({"playlist": "Morning"}))).unwrap();
        assert_eq!(card.content_id.as_deref(), Some("Morning"));
        assert_eq!(card.content_type.as_deref(), Some(LEGACY_PLAYLIST_CONTENT_TYPE));

        card.update(&map(json!({"playlist": "Evening", "content_type": "playlist"})))
            .unwrap();
        assert_eq!(card.content_id.as_deref(), Some("Evening"));
        assert_eq!(card.content_type.as_deref(), Some("playlist"));
    }

    #[test]
    fn test_embed_url() {
        let mut card = Card::new("t");
        assert_eq!(card.embed_url(), "");

        card.content_id = Some("https://open.spotify.com/album/1x2y?si=abc".to_string());
        assert_eq!(
            card.embed_url(),
            "https://open.spotify.com/embed/album/1x2y?si=abc"
        );

        card.content_id = Some("spotify:playlist:37i9".to_string());
        assert_eq!(card.embed_url(), "spotify:playlist:37i9/embed");
    }
}
