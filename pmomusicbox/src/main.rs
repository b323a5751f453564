use std::sync::{Arc, Mutex};

use anyhow::Context;
use pmocards::{CardStore, CardsConfigExt};
use pmoconfig::get_config;
use pmohass::{HassBus, HassConfigExt, build_player};
use pmomusicbox::{
    MusicBoxAdmin, MusicBoxConfigExt, MusicBoxError, TagController, TagWatcher, logs::init_logging,
    spawn_controller_loop,
};
use pmospotify::SpotifyClient;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = get_config();

    // ========== Cards ==========
    let store = CardStore::open(config.get_cards_database()?)?;
    info!(
        "🗂️ {} card(s) in {}",
        store.count()?,
        store.path().display()
    );

    // ========== Player ==========
    let bus: Arc<dyn HassBus> = Arc::new(config.build_hass_client()?);
    let player_config = config.get_player_config()?;
    let player = build_player(&player_config, Arc::clone(&bus))
        .context("Failed to build player backend")?;

    let controller = Arc::new(Mutex::new(TagController::new(
        store.clone(),
        player,
        config.get_volume_bounds(),
    )));

    // ========== Catalog (optional) ==========
    let catalog = match SpotifyClient::from_config() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!("⚠️ Spotify catalog disabled: {}", e);
            None
        }
    };
    let admin = MusicBoxAdmin::new(store, Arc::clone(&controller), catalog);
    match admin.fix_cards().await {
        Ok(fixed) => info!("🎵 {} card(s) refreshed from the Spotify catalog", fixed),
        Err(MusicBoxError::CatalogUnavailable) => {}
        Err(e) => warn!("⚠️ Card refresh failed: {}", e),
    }

    // ========== Control loop ==========
    let (tx, rx) = crossbeam_channel::unbounded();
    let controller_thread = spawn_controller_loop(Arc::clone(&controller), rx)?;
    let mut watcher = TagWatcher::spawn(
        Arc::clone(&bus),
        config.get_tag_entity()?,
        config.get_poll_interval(),
        tx,
    )?;

    info!("✅ PMOMusicBox is ready!");
    info!("Press Ctrl+C to stop...");
    tokio::signal::ctrl_c().await?;

    info!("🛑 Stopping...");
    watcher.stop();
    drop(watcher);
    if controller_thread.join().is_err() {
        warn!("Controller thread panicked");
    }

    let session = admin.session();
    info!(current = ?session.current, playing = ?session.playing, "Last session");

    let mut controller = match controller.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    controller.stop();

    Ok(())
}
