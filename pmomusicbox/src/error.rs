use pmocards::{CardError, StorageError};
use pmohass::HassError;
use pmospotify::SpotifyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MusicBoxError>;

#[derive(Error, Debug)]
pub enum MusicBoxError {
    #[error("Card storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Invalid card update: {0}")]
    Card(#[from] CardError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] SpotifyError),
    #[error("Player error: {0}")]
    Player(#[from] HassError),
    #[error("Catalog is not configured")]
    CatalogUnavailable,
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}
