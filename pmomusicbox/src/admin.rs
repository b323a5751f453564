//! Card administration: lookup, assignment, catalog enrichment.
//!
//! These operations back whatever front-end manages the cards; they share the
//! card store with the running controller.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use pmocards::{Card, CardStore};
use pmospotify::{CatalogItem, SpotifyClient};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::controller::{SessionSnapshot, TagController};
use crate::error::{MusicBoxError, Result};

/// Changes requested for a card; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardUpdate {
    pub content_id: Option<String>,
    pub shuffle: Option<bool>,
}

/// Active tag and the card it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentCard {
    pub tag: String,
    pub card: Card,
}

pub struct MusicBoxAdmin {
    store: CardStore,
    controller: Arc<Mutex<TagController>>,
    catalog: Option<Arc<SpotifyClient>>,
}

impl MusicBoxAdmin {
    pub fn new(
        store: CardStore,
        controller: Arc<Mutex<TagController>>,
        catalog: Option<Arc<SpotifyClient>>,
    ) -> Self {
        Self {
            store,
            controller,
            catalog,
        }
    }

    fn catalog(&self) -> Result<&SpotifyClient> {
        self.catalog
            .as_deref()
            .ok_or(MusicBoxError::CatalogUnavailable)
    }

    /// Returns the card of `id`, applying `update` first when it carries
    /// anything.
    ///
    /// A new content id that is a catalog URL is replaced by the catalog
    /// metadata; any other content id is stored as given.
    pub async fn get_or_update_card(&self, id: &str, update: CardUpdate) -> Result<Card> {
        let mut card = self.store.get(id)?;
        let mut changed = false;

        if let Some(content_id) = update.content_id {
            card.content_id = Some(content_id);
            if let Some(catalog) = self.catalog.as_deref() {
                catalog.enrich_card(&mut card).await?;
            }
            changed = true;
        }
        if let Some(shuffle) = update.shuffle {
            card.shuffle = shuffle;
            changed = true;
        }

        if changed {
            self.store.store(&card)?;
            info!(card = id, content = ?card.content_id, shuffle = card.shuffle, "Card updated");
        }
        Ok(card)
    }

    /// Deletes the card of `id` and returns what it held.
    pub fn drop_card(&self, id: &str) -> Result<Card> {
        let card = self.store.get(id)?;
        self.store.drop_card(&card)?;
        info!(card = id, "Card dropped");
        Ok(card)
    }

    /// The tag currently on the reader, resolved to its card.
    pub fn current_cards(&self) -> Result<Option<CurrentCard>> {
        let SessionSnapshot { current, .. } = self.session();
        match current {
            Some(tag) => {
                let card = self.store.get(&tag)?;
                Ok(Some(CurrentCard { tag, card }))
            }
            None => Ok(None),
        }
    }

    pub fn session(&self) -> SessionSnapshot {
        match self.controller.lock() {
            Ok(controller) => controller.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }

    /// Every stored card, keyed by tag id.
    pub fn list_cards(&self) -> Result<BTreeMap<String, Card>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|card| (card.id.clone(), card))
            .collect())
    }

    /// A valid catalog token.
    pub async fn token(&self) -> Result<String> {
        Ok(self.catalog()?.token().await?)
    }

    /// Catalog metadata behind `url`, `None` when it is not a catalog URL.
    pub async fn parse(&self, url: &str) -> Result<Option<CatalogItem>> {
        Ok(self.catalog()?.fetch_url(url).await?)
    }

    /// Re-enriches every stored card from the catalog.
    ///
    /// Returns the number of cards that changed. A card that fails is logged
    /// and skipped.
    pub async fn fix_cards(&self) -> Result<usize> {
        let catalog = self.catalog()?;
        let mut fixed = 0;

        for card in self.store.list()? {
            let mut updated = card.clone();
            match catalog.enrich_card(&mut updated).await {
                Ok(true) if updated != card => match self.store.store(&updated) {
                    Ok(()) => fixed += 1,
                    Err(e) => warn!(card = %card.id, error = %e, "Failed to store fixed card"),
                },
                Ok(_) => {}
                Err(e) => warn!(card = %card.id, error = %e, "Failed to fix card"),
            }
        }

        info!(fixed, "Cards fixed from catalog");
        Ok(fixed)
    }
}
