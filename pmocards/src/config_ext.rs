//! Extension pour intégrer la configuration du registre de cartes dans pmoconfig

use anyhow::Result;
use pmoconfig::Config;
use std::path::PathBuf;

/// Nom du fichier de base par défaut (relatif au répertoire de configuration)
pub const DEFAULT_CARDS_DATABASE: &str = "music.db";

/// Trait d'extension pour gérer la configuration du registre de cartes
///
/// # Exemple
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmocards::{CardStore, CardsConfigExt};
///
/// let config = get_config();
/// let store = CardStore::open(config.get_cards_database()?)?;
/// ```
pub trait CardsConfigExt {
    /// Récupère le chemin absolu de la base SQLite des cartes
    ///
    /// Un chemin relatif est résolu par rapport au répertoire de configuration,
    /// dont le répertoire parent est créé si besoin.
    fn get_cards_database(&self) -> Result<PathBuf>;
}

impl CardsConfigExt for Config {
    fn get_cards_database(&self) -> Result<PathBuf> {
        self.get_managed_file(&["cards", "database"], DEFAULT_CARDS_DATABASE)
    }
}
