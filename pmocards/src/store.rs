//! Registre persistant des cartes (SQLite)
//!
//! Chaque opération ouvre sa propre connexion et sa propre transaction, puis
//! les referme : aucune connexion longue n'est partagée entre les requêtes.
//! La table est créée à la demande au premier accès.

use crate::card::Card;
use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CREATE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS card (id VARCHAR(32) PRIMARY KEY, metadata TEXT)";

/// Registre des cartes, indexé par identifiant de tag
#[derive(Debug, Clone)]
pub struct CardStore {
    path: PathBuf,
}

impl CardStore {
    /// Prépare un registre adossé au fichier SQLite `path`
    ///
    /// Le répertoire parent est créé si nécessaire ; la base elle-même n'est
    /// ouverte qu'au premier appel.
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// use pmocards::CardStore;
    ///
    /// let store = CardStore::open(".pmomusicbox/music.db")?;
    /// let card = store.get("04a1b2c3")?;
    /// # Ok::<(), pmocards::StorageError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("Created card database directory: {}", parent.display());
            }
        }

        Ok(Self { path })
    }

    /// Chemin de la base SQLite
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exécute `f` dans une transaction dédiée, sur une connexion dédiée
    fn with_transaction<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        tx.execute(CREATE_TABLE_SQL, [])?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Récupère la carte d'un tag
    ///
    /// Ne retourne jamais "absent" : un tag inconnu donne une carte vide,
    /// qui n'est pas enregistrée tant que [`CardStore::store`] n'est pas appelé.
    pub fn get(&self, card_id: &str) -> Result<Card> {
        let metadata: Option<String> = self.with_transaction(|tx| {
            Ok(tx
                .query_row(
                    "SELECT metadata FROM card WHERE id = ?1",
                    params![card_id],
                    |row| row.get(0),
                )
                .optional()?)
        })?;

        match metadata {
            Some(text) => {
                debug!("Card {} found", card_id);
                Ok(Card::load(card_id, &text)?)
            }
            None => {
                debug!("Card {} unknown, returning an empty card", card_id);
                Ok(Card::new(card_id))
            }
        }
    }

    /// Enregistre une carte (remplace entièrement le record existant)
    pub fn store(&self, card: &Card) -> Result<()> {
        let metadata = card.to_json()?;
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT OR REPLACE INTO card (id, metadata) VALUES (?1, ?2)",
                params![card.id, metadata],
            )?;
            Ok(())
        })?;
        debug!("Stored card {}", card.id);
        Ok(())
    }

    /// Supprime une carte ; sans effet si elle n'existe pas
    pub fn drop_card(&self, card: &Card) -> Result<()> {
        let removed = self.with_transaction(|tx| {
            Ok(tx.execute("DELETE FROM card WHERE id = ?1", params![card.id])?)
        })?;
        debug!("Dropped card {} ({} row(s))", card.id, removed);
        Ok(())
    }

    /// Liste toutes les cartes, triées par identifiant
    ///
    /// Le résultat est un instantané : un nouvel appel relance la requête.
    pub fn list(&self) -> Result<Vec<Card>> {
        let rows: Vec<(String, String)> = self.with_transaction(|tx| {
            let mut stmt = tx.prepare("SELECT id, metadata FROM card ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(id, metadata)| Ok(Card::load(id, &metadata)?))
            .collect()
    }

    /// Nombre de cartes enregistrées
    pub fn count(&self) -> Result<usize> {
        self.with_transaction(|tx| {
            let count: i64 = tx.query_row("SELECT COUNT(*) FROM card", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
