mod common;

use std::sync::{Arc, Mutex};

use common::Fixture;
use mockito::Server;
use pmomusicbox::{CardUpdate, MusicBoxAdmin, MusicBoxError, VolumeBounds};
use pmospotify::{SpotifyClient, SpotifySettings};

const ALBUM_URL: &str = "https://open.spotify.com/album/1weenld61qoidwYuZ1GESA?si=shared";

fn admin(fx: &Fixture, catalog: Option<SpotifyClient>) -> MusicBoxAdmin {
    let controller = Arc::new(Mutex::new(fx.controller(VolumeBounds::default())));
    MusicBoxAdmin::new(fx.store.clone(), controller, catalog.map(Arc::new))
}

async fn catalog(server: &mut Server) -> SpotifyClient {
    server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "tok", "expires_in": 3600}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/v1/albums/1weenld61qoidwYuZ1GESA")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "name": "Kind of Blue",
                "artists": [{"name": "Miles Davis"}],
                "images": [{"url": "https://i.scdn.co/image/kob"}],
                "external_urls": {"spotify": "https://open.spotify.com/album/1weenld61qoidwYuZ1GESA"}
            }"#,
        )
        .create_async()
        .await;

    let mut settings = SpotifySettings::new("id", "secret");
    settings.api_base = server.url();
    settings.accounts_base = server.url();
    SpotifyClient::new(settings).unwrap()
}

#[tokio::test]
async fn test_get_without_update_does_not_store() {
    let fx = Fixture::new();
    let admin = admin(&fx, None);

    let card = admin
        .get_or_update_card("t1", CardUpdate::default())
        .await
        .unwrap();

    assert!(!card.has_content());
    assert_eq!(fx.store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_non_catalog_content_is_stored_verbatim() {
    let fx = Fixture::new();
    let admin = admin(&fx, None);

    let card = admin
        .get_or_update_card(
            "t1",
            CardUpdate {
                content_id: Some("x-sonos-spotify:spotify%3aalbum%3a1".to_string()),
                shuffle: Some(true),
            },
        )
        .await
        .unwrap();

    assert_eq!(fx.store.get("t1").unwrap(), card);
    assert_eq!(
        card.content_id.as_deref(),
        Some("x-sonos-spotify:spotify%3aalbum%3a1")
    );
    assert!(card.shuffle);
}

#[tokio::test]
async fn test_catalog_content_is_enriched() {
    let mut server = Server::new_async().await;
    let fx = Fixture::new();
    let admin = admin(&fx, Some(catalog(&mut server).await));

    let card = admin
        .get_or_update_card(
            "t1",
            CardUpdate {
                content_id: Some(ALBUM_URL.to_string()),
                shuffle: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(card.title.as_deref(), Some("Miles Davis - Kind of Blue"));
    assert_eq!(card.content_type.as_deref(), Some("album"));
    assert_eq!(fx.store.get("t1").unwrap(), card);
}

#[tokio::test]
async fn test_fix_cards_counts_changed_cards() {
    let mut server = Server::new_async().await;
    let fx = Fixture::new();
    fx.card("t1", Some(ALBUM_URL));
    fx.card("t2", Some("spotify:playlist:1"));
    let admin = admin(&fx, Some(catalog(&mut server).await));

    assert_eq!(admin.fix_cards().await.unwrap(), 1);
    assert_eq!(
        fx.store.get("t1").unwrap().title.as_deref(),
        Some("Miles Davis - Kind of Blue")
    );
    // second pass: canonical URL has no query, nothing left to fix
    assert_eq!(admin.fix_cards().await.unwrap(), 0);
}

#[tokio::test]
async fn test_catalog_operations_need_a_catalog() {
    let fx = Fixture::new();
    let admin = admin(&fx, None);

    assert!(matches!(
        admin.token().await,
        Err(MusicBoxError::CatalogUnavailable)
    ));
    assert!(matches!(
        admin.parse(ALBUM_URL).await,
        Err(MusicBoxError::CatalogUnavailable)
    ));
    assert!(matches!(
        admin.fix_cards().await,
        Err(MusicBoxError::CatalogUnavailable)
    ));
}

#[tokio::test]
async fn test_parse_returns_metadata() {
    let mut server = Server::new_async().await;
    let fx = Fixture::new();
    let admin = admin(&fx, Some(catalog(&mut server).await));

    let item = admin.parse(ALBUM_URL).await.unwrap().unwrap();
    assert_eq!(item.name, "Kind of Blue");
    assert!(admin.parse("https://example.com/x").await.unwrap().is_none());
    assert_eq!(admin.token().await.unwrap(), "tok");
}

#[test]
fn test_drop_and_list_cards() {
    let fx = Fixture::new();
    fx.card("b", Some("spotify:album:2"));
    fx.card("a", Some("spotify:album:1"));
    let admin = admin(&fx, None);

    let cards = admin.list_cards().unwrap();
    assert_eq!(cards.keys().collect::<Vec<_>>(), vec!["a", "b"]);

    let dropped = admin.drop_card("a").unwrap();
    assert_eq!(dropped.content_id.as_deref(), Some("spotify:album:1"));
    assert_eq!(admin.list_cards().unwrap().len(), 1);
}

#[test]
fn test_current_cards_follows_controller() {
    let fx = Fixture::new();
    fx.card("t1", Some("spotify:album:1"));
    let controller = Arc::new(Mutex::new(fx.controller(VolumeBounds::default())));
    let admin = MusicBoxAdmin::new(fx.store.clone(), Arc::clone(&controller), None);

    assert!(admin.current_cards().unwrap().is_none());

    controller.lock().unwrap().on_observation(Some("t1")).unwrap();

    let current = admin.current_cards().unwrap().unwrap();
    assert_eq!(current.tag, "t1");
    assert_eq!(current.card.content_id.as_deref(), Some("spotify:album:1"));
    assert_eq!(admin.session().playing.as_deref(), Some("spotify:album:1"));
}
