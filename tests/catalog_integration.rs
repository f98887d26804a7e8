// SPDX-License-Identifier: MPL-2.0
use futures_util::StreamExt;
use kaitori_admin::application::catalog::{CardFields, Catalog, Taxonomy};
use kaitori_admin::application::upload::{upload_card_photo, PickedPhoto};
use kaitori_admin::infrastructure::fs_blobs::path_from_url;
use kaitori_admin::infrastructure::{FsBlobStore, MemoryDocumentStore};
use std::sync::Arc;
use tempfile::tempdir;

const GAME: &str = "ポケモンカード";
const VERSION: &str = "スカーレットex";

fn card(name: &str, store_price: Option<i64>, min_price: Option<i64>) -> CardFields {
    CardFields {
        card_name: name.to_string(),
        store_price,
        min_price,
        ..CardFields::default()
    }
}

#[tokio::test]
async fn cards_are_listed_in_buy_price_order() {
    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
    catalog.add_card_game(GAME).await.expect("add game");
    catalog.add_version(GAME, VERSION).await.expect("add version");

    catalog
        .add_card(GAME, VERSION, &card("ミュウ", Some(1_000), Some(800)))
        .await
        .expect("add card");
    catalog
        .add_card(GAME, VERSION, &card("ピカチュウ", Some(3_000), None))
        .await
        .expect("add card");
    catalog
        .add_card(GAME, VERSION, &card("イーブイ", None, None))
        .await
        .expect("add card");
    catalog
        .add_card(GAME, VERSION, &card("ゼニガメ", Some(1_000), Some(900)))
        .await
        .expect("add card");

    let mut cards = catalog.cards(GAME, VERSION);
    let rows = cards.next().await.expect("snapshot").expect("rows");
    let names: Vec<_> = rows.iter().map(|c| c.card_name.as_str()).collect();
    assert_eq!(names, ["ピカチュウ", "ゼニガメ", "ミュウ", "イーブイ"]);
}

#[tokio::test]
async fn lists_are_scoped_to_their_parents() {
    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
    catalog.add_version(GAME, VERSION).await.expect("add version");
    catalog.add_version("遊戯王", VERSION).await.expect("add version");
    catalog
        .add_card(GAME, VERSION, &card("ピカチュウ", None, None))
        .await
        .expect("add card");
    catalog
        .add_card("遊戯王", VERSION, &card("ブラック・マジシャン", None, None))
        .await
        .expect("add card");

    let versions = catalog
        .versions(GAME)
        .next()
        .await
        .expect("snapshot")
        .expect("rows");
    assert_eq!(versions.len(), 1);

    let cards = catalog
        .cards(GAME, VERSION)
        .next()
        .await
        .expect("snapshot")
        .expect("rows");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].card_name, "ピカチュウ");
}

#[tokio::test]
async fn live_list_follows_writes() {
    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
    let mut games = catalog.card_games();
    assert!(games.next().await.expect("snapshot").expect("rows").is_empty());

    let id = catalog.add_card_game(GAME).await.expect("add");
    let rows = games.next().await.expect("update").expect("rows");
    assert_eq!(rows.len(), 1);

    catalog.rename_card_game(&id, "ポケカ").await.expect("rename");
    let rows = games.next().await.expect("update").expect("rows");
    assert_eq!(rows[0].name, "ポケカ");
    let stored = catalog.get_card_game(&id).await.expect("get").expect("exists");
    assert!(stored.updated_at.is_some());

    catalog.delete_card_game(&id).await.expect("delete");
    assert!(games.next().await.expect("update").expect("rows").is_empty());
}

#[tokio::test]
async fn live_card_game_reports_deletion() {
    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
    let id = catalog.add_card_game(GAME).await.expect("add");

    let mut record = catalog.card_game(&id);
    let first = record.next().await.expect("snapshot").expect("record");
    assert_eq!(first.map(|game| game.name).as_deref(), Some(GAME));

    catalog.delete_card_game(&id).await.expect("delete");
    assert_eq!(record.next().await.expect("update").expect("record"), None);
}

#[tokio::test]
async fn taxonomy_options_are_per_version() {
    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
    catalog
        .add_taxonomy_option(Taxonomy::Character, GAME, VERSION, "ピカチュウ")
        .await
        .expect("add character");
    catalog
        .add_taxonomy_option(Taxonomy::CardType, GAME, VERSION, "SAR")
        .await
        .expect("add card type");

    let characters = catalog
        .taxonomy_options(Taxonomy::Character, GAME, VERSION)
        .next()
        .await
        .expect("snapshot")
        .expect("rows");
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].name, "ピカチュウ");

    let other_version = catalog
        .taxonomy_options(Taxonomy::Character, GAME, "別バージョン")
        .next()
        .await
        .expect("snapshot")
        .expect("rows");
    assert!(other_version.is_empty());
}

#[tokio::test]
async fn editing_a_card_keeps_its_photo_and_clears_unset_prices() {
    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
    let mut fields = card("ピカチュウ", Some(3_000), Some(2_000));
    fields.card_photo = Some("file:///photos/pikachu.jpg".into());
    let id = catalog.add_card(GAME, VERSION, &fields).await.expect("add");

    let edit = card("ピカチュウ ex", Some(3_500), None);
    catalog.update_card(&id, &edit).await.expect("update");

    let stored = catalog.get_card(&id).await.expect("get").expect("exists");
    assert_eq!(stored.card_name, "ピカチュウ ex");
    assert_eq!(stored.store_price, Some(3_500));
    assert_eq!(stored.min_price, None);
    assert_eq!(stored.card_photo.as_deref(), Some("file:///photos/pikachu.jpg"));
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn catalog_snapshot_survives_reopen() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("catalog.cbor");

    let catalog = Catalog::new(Arc::new(MemoryDocumentStore::open(path.clone())));
    catalog.add_card_game(GAME).await.expect("add");
    drop(catalog);

    let reopened = Catalog::new(Arc::new(MemoryDocumentStore::open(path)));
    let rows = reopened
        .card_games()
        .next()
        .await
        .expect("snapshot")
        .expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, GAME);
}

#[tokio::test]
async fn uploaded_photo_is_readable_from_its_url() {
    let dir = tempdir().expect("temp dir");
    let blobs = Arc::new(FsBlobStore::new(dir.path().join("blobs")));
    let photo = PickedPhoto {
        path: "pikachu.jpg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    };

    let url = upload_card_photo(
        blobs,
        GAME.to_string(),
        VERSION.to_string(),
        "ピカチュウ ex".to_string(),
        photo.clone(),
    )
    .await
    .expect("upload");

    let stored = path_from_url(&url).expect("file url");
    let file_name = stored.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    assert!(file_name.starts_with("ピカチュウ_ex_"), "{file_name}");
    assert_eq!(std::fs::read(stored).expect("read back"), photo.bytes);
}
