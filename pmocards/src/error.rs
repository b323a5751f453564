//! Gestion des erreurs du registre de cartes

use thiserror::Error;

/// Type Result personnalisé pour pmocards
pub type Result<T> = std::result::Result<T, StorageError>;

/// Erreurs d'accès au stockage persistant des cartes
///
/// Une erreur de stockage est fatale pour l'opération qui l'a déclenchée,
/// mais ne laisse jamais une ligne à moitié écrite : chaque appel s'exécute
/// dans sa propre transaction.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Erreur SQLite (ouverture, requête, transaction)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Record JSON illisible ou impossible à sérialiser
    #[error("Card serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Erreur d'entrée/sortie (création du répertoire de la base)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Erreurs de mise à jour d'une carte depuis un dictionnaire de valeurs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// Un champ connu a reçu une valeur du mauvais type
    #[error("Invalid value for card field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}
