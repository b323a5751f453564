//! Gestion des erreurs pour le client Spotify

use thiserror::Error;

/// Type Result personnalisé pour pmospotify
pub type Result<T> = std::result::Result<T, SpotifyError>;

/// Erreurs possibles lors de l'utilisation du catalogue Spotify
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Échange de credentials refusé ou réponse incomplète
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Ressource non trouvée dans le catalogue
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP (connexion, timeout...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Paramètres Spotify invalides (client id, URL de base...)
    #[error("Spotify configuration error: {0}")]
    Configuration(String),

    /// Réponse en erreur du service distant
    #[error("Spotify API error (code {code}): {message}")]
    Remote { code: u16, message: String },

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,
}

impl SpotifyError {
    /// Crée une erreur depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Auth(message.into()),
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimitExceeded,
            _ => Self::Remote {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur est une erreur d'authentification
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SpotifyError::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_code() {
        assert!(SpotifyError::from_status_code(401, "expired").is_auth_error());
        assert!(matches!(
            SpotifyError::from_status_code(404, "no such album"),
            SpotifyError::NotFound(_)
        ));
        assert!(matches!(
            SpotifyError::from_status_code(429, ""),
            SpotifyError::RateLimitExceeded
        ));
        let err = SpotifyError::from_status_code(502, "bad gateway");
        assert!(matches!(err, SpotifyError::Remote { code: 502, .. }));
        assert_eq!(err.to_string(), "Spotify API error (code 502): bad gateway");
    }
}
