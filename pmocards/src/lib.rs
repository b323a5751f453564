//! # pmocards - Registre des cartes pour PMOMusicBox
//!
//! Cette crate gère la correspondance persistante entre un identifiant de tag
//! (NFC/RFID) et le record de lecture qui lui est associé.
//!
//! ## Architecture
//!
//! - `card` : la structure [`Card`] et sa mise à jour par clés autorisées
//! - `store` : le registre SQLite [`CardStore`] (upsert, suppression, listing)
//! - `config_ext` : emplacement de la base dans pmoconfig
//! - `error` : erreurs typées
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmocards::{Card, CardStore};
//!
//! let store = CardStore::open("music.db")?;
//!
//! let mut card = store.get("04a1b2c3")?;
//! card.content_id = Some("https://open.spotify.com/album/xyz?si=1".to_string());
//! card.shuffle = true;
//! store.store(&card)?;
//!
//! for card in store.list()? {
//!     println!("{} -> {:?}", card.id, card.content_id);
//! }
//! # Ok::<(), pmocards::StorageError>(())
//! ```

pub mod card;
pub mod config_ext;
pub mod error;
pub mod store;

pub use card::{Card, LEGACY_PLAYLIST_CONTENT_TYPE, UPDATABLE_FIELDS};
pub use config_ext::CardsConfigExt;
pub use error::{CardError, Result, StorageError};
pub use store::CardStore;
