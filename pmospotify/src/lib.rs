//! # pmospotify - Résolution du catalogue Spotify pour PMOMusicBox
//!
//! Cette crate reconnaît les URLs du catalogue Spotify, récupère les
//! métadonnées des objets référencés et enrichit les cartes avec.
//!
//! ## Fonctionnalités
//!
//! - Parsing des URLs `https://open.spotify.com/<kind>/<id>?<query>`
//! - Authentification client credentials avec cache du token
//! - Lecture des métadonnées (titre, contributeurs, description, pochette)
//! - Réécriture des cartes [`pmocards::Card`]
//!
//! ## Architecture
//!
//! - `api` : couche bas-niveau HTTP (token, catalogue)
//! - `client` : [`SpotifyClient`], point d'entrée haut-niveau
//! - `models` : structures de données du catalogue
//! - `config_ext` : lecture des credentials dans pmoconfig
//! - `error` : erreurs typées

pub mod api;
pub mod client;
pub mod config_ext;
pub mod error;
pub mod models;

pub use api::auth::TokenInfo;
pub use api::{SpotifyApi, SpotifySettings};
pub use client::SpotifyClient;
pub use config_ext::SpotifyConfigExt;
pub use error::{Result, SpotifyError};
pub use models::{CatalogItem, CatalogReference};
