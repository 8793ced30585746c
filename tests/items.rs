mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{add_item, bearer, list_items, register_and_login, test_app, test_state, RecordingQueue};
use rentdesk::models::{Item, ItemStatus, SearchHistory};

#[actix_rt::test]
async fn test_add_item_rejects_blank_names() {
    let app = test_app!(test_state(Arc::new(RecordingQueue::default())).await);
    let alice = register_and_login(&app, "alice", "s3cret").await;

    for name in ["", "   "] {
        let req = test::TestRequest::post()
            .uri("/add_item")
            .append_header(bearer(&alice.token))
            .set_json(json!({ "name": name }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "name {:?} was accepted",
            name
        );
    }
    assert!(list_items(&app).await.is_empty());

    let drill = add_item(&app, &alice, "Drill").await;
    assert_eq!(drill.owner_id, alice.id);
    assert_eq!(drill.status, ItemStatus::Available);

    let names: Vec<String> = list_items(&app).await.into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Drill".to_string()]);
}

#[actix_rt::test]
async fn test_add_item_details_and_duplicates() {
    let app = test_app!(test_state(Arc::new(RecordingQueue::default())).await);
    let alice = register_and_login(&app, "alice", "s3cret").await;

    let req = test::TestRequest::post()
        .uri("/add_item")
        .append_header(bearer(&alice.token))
        .set_json(json!({
            "name": "  Tent  ",
            "description": "Four person tent",
            "price_day": 12.5,
            "price_week": 60.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tent: Item = test::read_body_json(resp).await;
    assert_eq!(tent.name, "Tent");
    assert_eq!(tent.description.as_deref(), Some("Four person tent"));
    assert_eq!(tent.price_day, Some(12.5));
    assert_eq!(tent.price_hour, None);

    let req = test::TestRequest::post()
        .uri("/add_item")
        .append_header(bearer(&alice.token))
        .set_json(json!({ "name": "Tent" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/add_item")
        .append_header(bearer(&alice.token))
        .set_json(json!({ "name": "Kayak", "price_hour": -1.0 }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    assert_eq!(list_items(&app).await.len(), 1);
}

#[actix_rt::test]
async fn test_only_owner_can_delete_item() {
    let app = test_app!(test_state(Arc::new(RecordingQueue::default())).await);
    let alice = register_and_login(&app, "alice", "s3cret").await;
    let bob = register_and_login(&app, "bob", "hunter2").await;
    let ladder = add_item(&app, &alice, "Ladder").await;

    let req = test::TestRequest::post()
        .uri(&format!("/delete_item/{}", ladder.id))
        .append_header(bearer(&bob.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(list_items(&app).await.len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/delete_item/{}", ladder.id))
        .append_header(bearer(&alice.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    assert!(list_items(&app).await.is_empty());

    let req = test::TestRequest::post()
        .uri(&format!("/delete_item/{}", ladder.id))
        .append_header(bearer(&alice.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_item_with_contract_cannot_be_deleted() {
    let queue = Arc::new(RecordingQueue::default());
    let app = test_app!(test_state(queue.clone()).await);
    let alice = register_and_login(&app, "alice", "s3cret").await;
    let bob = register_and_login(&app, "bob", "hunter2").await;
    let ladder = add_item(&app, &alice, "Ladder").await;

    let req = test::TestRequest::post()
        .uri(&format!("/create_contract/{}", ladder.id))
        .append_header(bearer(&bob.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/delete_item/{}", ladder.id))
        .append_header(bearer(&alice.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    assert_eq!(list_items(&app).await.len(), 1);
}

#[actix_rt::test]
async fn test_search_matches_and_records_history() {
    let app = test_app!(test_state(Arc::new(RecordingQueue::default())).await);
    let alice = register_and_login(&app, "alice", "s3cret").await;
    let bob = register_and_login(&app, "bob", "hunter2").await;

    add_item(&app, &alice, "Ladder").await;
    add_item(&app, &alice, "Drill").await;
    let req = test::TestRequest::post()
        .uri("/add_item")
        .append_header(bearer(&alice.token))
        .set_json(json!({ "name": "Toolbox", "description": "Hammer, drill bits" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/search?q=DRILL")
        .append_header(bearer(&bob.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Vec<Item> = test::read_body_json(resp).await;
    let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Drill", "Toolbox"]);

    // LIKE wildcards in the query are matched literally.
    let req = test::TestRequest::get()
        .uri("/search?q=%25")
        .append_header(bearer(&bob.token))
        .to_request();
    let found: Vec<Item> = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(found.is_empty());

    let req = test::TestRequest::get()
        .uri("/search?q=%20%20")
        .append_header(bearer(&bob.token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::get()
        .uri("/search_history")
        .append_header(bearer(&bob.token))
        .to_request();
    let history: Vec<SearchHistory> = test::read_body_json(test::call_service(&app, req).await).await;
    let texts: Vec<&str> = history.iter().map(|h| h.search_text.as_str()).collect();
    assert_eq!(texts, vec!["%", "DRILL"]);

    let req = test::TestRequest::get()
        .uri("/search_history")
        .append_header(bearer(&alice.token))
        .to_request();
    let history: Vec<SearchHistory> = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(history.is_empty());
}

#[actix_rt::test]
async fn test_listing_is_public_and_shows_every_owner() {
    let app = test_app!(test_state(Arc::new(RecordingQueue::default())).await);
    let alice = register_and_login(&app, "alice", "s3cret").await;
    let bob = register_and_login(&app, "bob", "hunter2").await;
    add_item(&app, &alice, "Ladder").await;
    add_item(&app, &bob, "Bicycle").await;

    let items = list_items(&app).await;
    let owners: Vec<(String, i64)> = items.into_iter().map(|i| (i.name, i.owner_id)).collect();
    assert_eq!(
        owners,
        vec![("Ladder".to_string(), alice.id), ("Bicycle".to_string(), bob.id)]
    );
}
