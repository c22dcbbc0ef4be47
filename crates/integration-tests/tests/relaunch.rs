//! Cart persistence across relaunches.

use pocket_cart::Hydration;
use pocket_cart_core::{Cart, ProductId};
use pocket_cart_integration_tests::{KEY, launch, product};

fn id(s: &str) -> ProductId {
    ProductId::parse(s).expect("valid id")
}

#[tokio::test]
async fn cart_survives_relaunch() {
    let dir = tempfile::tempdir().expect("tempdir");

    let first = launch(dir.path()).await;
    first.add_to_cart(product("A", 10)).await;
    first.add_to_cart(product("B", 5)).await;
    first.add_to_cart(product("A", 10)).await;
    first.decrement(&id("B")).await;
    first.add_to_cart(product("C", 7)).await;
    let before = first.products();
    drop(first);

    let second = launch(dir.path()).await;
    assert!(second.is_hydrated());
    assert_eq!(*second.products(), *before);

    let ids: Vec<&str> = before.iter().map(|item| item.id().as_str()).collect();
    assert_eq!(ids, ["A", "C"]);
}

#[tokio::test]
async fn record_matches_latest_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = launch(dir.path()).await;

    store.add_to_cart(product("A", 10)).await;
    store.increment(&id("A")).await;

    let raw = std::fs::read_to_string(dir.path().join(format!("{KEY}.json"))).expect("record");
    let record: Cart = serde_json::from_str(&raw).expect("parse");
    assert_eq!(record, *store.products());
    assert_eq!(record.total_quantity(), 2);
}

#[tokio::test]
async fn corrupt_record_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(format!("{KEY}.json")), "{not json").expect("write");

    let store = pocket_cart::CartStore::new(pocket_cart::FileStorage::new(dir.path()), KEY);
    assert_eq!(store.hydrate().await, Hydration::Discarded);
    assert!(store.products().is_empty());

    store.add_to_cart(product("A", 1)).await;
    drop(store);

    let relaunched = launch(dir.path()).await;
    assert_eq!(relaunched.products().len(), 1);
}

#[tokio::test]
async fn legacy_record_is_upgraded_on_next_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let legacy = r#"[{"id":"1","title":"Chair","image_url":"https://img/1.png","price":400,"quantity":1}]"#;
    std::fs::write(dir.path().join(format!("{KEY}.json")), legacy).expect("write");

    let store = launch(dir.path()).await;
    store.increment(&id("1")).await;

    let raw = std::fs::read_to_string(dir.path().join(format!("{KEY}.json"))).expect("record");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse");
    assert_eq!(value[0]["imageUrl"], "https://img/1.png");
    assert_eq!(value[0]["unitPrice"], "400");
    assert_eq!(value[0]["quantity"], 2);
}
