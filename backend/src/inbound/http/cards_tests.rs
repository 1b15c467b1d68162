//! Tests for the card handlers.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Board, BoardDraft, User};
use crate::inbound::http::test_utils::{Harness, session_cookie, sign_in_request};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(rebalance_cards)
        .service(list_cards_for_member)
        .service(create_card)
        .service(list_cards)
        .service(get_card)
        .service(update_card)
        .service(delete_card)
        .service(move_card);
}

async fn board_for(harness: &Harness, owner: &User) -> Board {
    harness
        .state
        .boards
        .create(
            BoardDraft {
                name: "Launch".to_owned(),
                description: None,
            },
            owner.id,
        )
        .await
        .expect("board created")
}

macro_rules! call {
    ($app:expr, $req:expr) => {
        test::call_service(&$app, $req.to_request()).await
    };
}

macro_rules! json_of {
    ($app:expr, $req:expr) => {{
        let body: Value = test::read_body_json(call!($app, $req)).await;
        body
    }};
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("card list")
        .iter()
        .filter_map(|card| card["name"].as_str().map(str::to_owned))
        .collect()
}

#[actix_web::test]
async fn created_cards_append_and_moves_reorder() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let board = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let cards_uri = format!("/api/v1/boards/{}/cards", board.id);

    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        let response = call!(
            app,
            test::TestRequest::post()
                .uri(&cards_uri)
                .cookie(cookie.clone())
                .set_json(json!({ "name": name }))
        );
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["data"]["status"], "backlog");
        ids.push(body["data"]["id"].as_str().expect("id").to_owned());
    }

    let body = json_of!(
        app,
        test::TestRequest::patch()
            .uri(&format!("{cards_uri}/{}/move", ids[2]))
            .cookie(cookie.clone())
            .set_json(json!({ "status": "ongoing", "index": "0" }))
    );
    assert_eq!(body["message"], "Card moved");
    assert_eq!(body["data"]["status"], "ongoing");

    let body = json_of!(
        app,
        test::TestRequest::get().uri(&cards_uri).cookie(cookie)
    );
    assert_eq!(names(&body), vec!["third", "first", "second"]);
}

#[rstest]
#[case(json!({ "index": -1 }), "invalid_index")]
#[case(json!({ "index": 1.5 }), "invalid_index")]
#[case(json!({ "index": "abc" }), "invalid_index")]
#[case(json!({}), "invalid_index")]
#[case(json!({ "status": "archived", "index": 0 }), "invalid_status")]
#[actix_web::test]
async fn move_rejects_bad_targets(#[case] payload: Value, #[case] reason: &str) {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let board = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let cards_uri = format!("/api/v1/boards/{}/cards", board.id);
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&cards_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "name": "only" }))
    );
    let card_id = created["data"]["id"].as_str().expect("id");

    let response = call!(
        app,
        test::TestRequest::patch()
            .uri(&format!("{cards_uri}/{card_id}/move"))
            .cookie(cookie)
            .set_json(payload)
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], reason);
}

#[actix_web::test]
async fn create_requires_a_card_name() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let board = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));

    let body = json_of!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/boards/{}/cards", board.id))
            .cookie(cookie)
            .set_json(json!({ "name": "" }))
    );
    assert_eq!(body["error"], "Card name must not be blank");
}

#[actix_web::test]
async fn outsiders_cannot_touch_cards() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let outsider = harness.user("outsider@example.com").await;
    let board = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&outsider.id)));

    let response = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/boards/{}/cards", board.id))
            .cookie(cookie)
            .set_json(json!({ "name": "sneaky" }))
    );
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn card_from_another_board_is_not_found() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let first = board_for(&harness, &owner).await;
    let second = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));

    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/boards/{}/cards", first.id))
            .cookie(cookie.clone())
            .set_json(json!({ "name": "mine" }))
    );
    let card_id = created["data"]["id"].as_str().expect("id");

    let response = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/boards/{}/cards/{card_id}", second.id))
            .cookie(cookie)
    );
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_and_delete_round_trip() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let board = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let cards_uri = format!("/api/v1/boards/{}/cards", board.id);
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&cards_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "name": "draft", "description": "rough" }))
    );
    let card_uri = format!("{cards_uri}/{}", created["data"]["id"].as_str().expect("id"));

    let body = json_of!(
        app,
        test::TestRequest::put()
            .uri(&card_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "name": "final", "description": null }))
    );
    assert_eq!(body["data"]["name"], "final");
    assert!(body["data"]["description"].is_null());
    assert_eq!(body["data"]["position"], created["data"]["position"]);

    let body = json_of!(
        app,
        test::TestRequest::delete().uri(&card_uri).cookie(cookie.clone())
    );
    assert_eq!(body["message"], "Card deleted successfully");

    let response = call!(app, test::TestRequest::get().uri(&card_uri).cookie(cookie));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn member_listing_and_rebalance_routes_are_not_shadowed() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let board = board_for(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let cards_uri = format!("/api/v1/boards/{}/cards", board.id);
    for name in ["a", "b"] {
        call!(
            app,
            test::TestRequest::post()
                .uri(&cards_uri)
                .cookie(cookie.clone())
                .set_json(json!({ "name": name }))
        );
    }

    let body = json_of!(
        app,
        test::TestRequest::get()
            .uri(&format!("{cards_uri}/user/{}", owner.id))
            .cookie(cookie.clone())
    );
    assert_eq!(names(&body), vec!["a", "b"]);

    let body = json_of!(
        app,
        test::TestRequest::get()
            .uri(&format!("{cards_uri}/user/{}", crate::domain::UserId::random()))
            .cookie(cookie.clone())
    );
    assert_eq!(names(&body), Vec::<String>::new());

    let body = json_of!(
        app,
        test::TestRequest::post()
            .uri(&format!("{cards_uri}/rebalance"))
            .cookie(cookie)
    );
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["renumbered"], 0);
}
