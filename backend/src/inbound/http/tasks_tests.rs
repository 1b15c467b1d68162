//! Tests for the task handlers.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::CardRef;
use crate::domain::{BoardDraft, CardDraft, User};
use crate::inbound::http::test_utils::{Harness, session_cookie, sign_in_request};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(rebalance_tasks)
        .service(create_task)
        .service(list_tasks)
        .service(get_task)
        .service(update_task)
        .service(delete_task)
        .service(assign_task)
        .service(move_task);
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

/// Board owned by `owner` with two cards.
async fn board_with_cards(harness: &Harness, owner: &User) -> (CardRef, CardRef) {
    let board = harness
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
        .expect("board created");
    let mut refs = Vec::new();
    for name in ["todo", "doing"] {
        let card = harness
            .state
            .cards
            .create(
                board.id,
                CardDraft {
                    name: name.to_owned(),
                    description: None,
                },
                owner.id,
            )
            .await
            .expect("card created");
        refs.push(CardRef {
            board_id: board.id,
            card_id: card.id,
        });
    }
    (refs[0], refs[1])
}

fn tasks_uri(card: &CardRef) -> String {
    format!("/api/v1/boards/{}/cards/{}/tasks", card.board_id, card.card_id)
}

fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("task list")
        .iter()
        .filter_map(|task| task["title"].as_str().map(str::to_owned))
        .collect()
}

#[actix_web::test]
async fn create_applies_defaults_and_validates_fields() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let (card, _) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));

    let response = call!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Draft outline" }))
    );
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["priority"], "medium");
    assert_eq!(body["data"]["status"], "todo");
    assert_eq!(body["data"]["createdBy"], owner.id.to_string());
    assert_eq!(body["data"]["position"], json!(1.0));

    let body = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Later", "deadline": "tomorrow" }))
    );
    assert_eq!(body["details"]["code"], "invalid_timestamp");

    let body = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie)
            .set_json(json!({ "priority": "high" }))
    );
    assert_eq!(body["error"], "Task title is required");
}

#[rstest]
#[case(json!({ "priority": "urgent" }), "invalid_priority")]
#[case(json!({ "status": "blocked" }), "invalid_status")]
#[case(json!({ "title": "  " }), "blank_field")]
#[actix_web::test]
async fn update_rejects_bad_fields(#[case] payload: Value, #[case] reason: &str) {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let (card, _) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Draft" }))
    );
    let task_uri = format!(
        "{}/{}",
        tasks_uri(&card),
        created["data"]["id"].as_str().expect("id")
    );

    let response = call!(
        app,
        test::TestRequest::put()
            .uri(&task_uri)
            .cookie(cookie)
            .set_json(payload)
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], reason);
}

#[actix_web::test]
async fn update_sets_and_clears_deadline() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let (card, _) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Draft", "deadline": "2026-05-01T12:00:00Z" }))
    );
    let task_uri = format!(
        "{}/{}",
        tasks_uri(&card),
        created["data"]["id"].as_str().expect("id")
    );
    assert_eq!(created["data"]["deadline"], "2026-05-01T12:00:00+00:00");

    let body = json_of!(
        app,
        test::TestRequest::put()
            .uri(&task_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "status": "in_progress", "deadline": null }))
    );
    assert_eq!(body["data"]["status"], "in_progress");
    assert!(body["data"]["deadline"].is_null());
    assert_eq!(body["data"]["title"], "Draft");
}

#[actix_web::test]
async fn move_across_cards_updates_order_and_counts() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let (source, destination) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));

    for title in ["a", "b"] {
        call!(
            app,
            test::TestRequest::post()
                .uri(&tasks_uri(&destination))
                .cookie(cookie.clone())
                .set_json(json!({ "title": title }))
        );
    }
    let moving = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&source))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "moving" }))
    );
    let moving_id = moving["data"]["id"].as_str().expect("id");

    let body = json_of!(
        app,
        test::TestRequest::patch()
            .uri(&format!("{}/{moving_id}/move", tasks_uri(&source)))
            .cookie(cookie.clone())
            .set_json(json!({ "toCardId": destination.card_id.to_string(), "index": 1 }))
    );
    assert_eq!(body["message"], "Task moved");
    assert_eq!(body["data"]["cardId"], destination.card_id.to_string());

    let body = json_of!(
        app,
        test::TestRequest::get()
            .uri(&tasks_uri(&destination))
            .cookie(cookie.clone())
    );
    assert_eq!(titles(&body), vec!["a", "moving", "b"]);
    let body = json_of!(
        app,
        test::TestRequest::get().uri(&tasks_uri(&source)).cookie(cookie)
    );
    assert_eq!(titles(&body), Vec::<String>::new());

    let cards = harness
        .state
        .cards_query
        .list(source.board_id, owner.id)
        .await
        .expect("cards");
    let count = |card_id| {
        cards
            .iter()
            .find(|card| card.id == card_id)
            .map(|card| card.tasks_count)
    };
    assert_eq!(count(source.card_id), Some(0));
    assert_eq!(count(destination.card_id), Some(3));
}

#[actix_web::test]
async fn move_requires_destination_and_index() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let (card, _) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Draft" }))
    );
    let move_uri = format!(
        "{}/{}/move",
        tasks_uri(&card),
        created["data"]["id"].as_str().expect("id")
    );

    let body = json_of!(
        app,
        test::TestRequest::patch()
            .uri(&move_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "index": 0 }))
    );
    assert_eq!(body["error"], "toCardId is required");

    let body = json_of!(
        app,
        test::TestRequest::patch()
            .uri(&move_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "toCardId": card.card_id.to_string(), "index": "x" }))
    );
    assert_eq!(body["details"]["code"], "invalid_index");

    let response = call!(
        app,
        test::TestRequest::patch()
            .uri(&move_uri)
            .cookie(cookie)
            .set_json(json!({ "toCardId": crate::domain::CardId::random().to_string(), "index": 0 }))
    );
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn assign_accepts_members_only() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let stranger = harness.user("stranger@example.com").await;
    let (card, _) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Draft" }))
    );
    let assign_uri = format!(
        "{}/{}/assign",
        tasks_uri(&card),
        created["data"]["id"].as_str().expect("id")
    );

    let response = call!(
        app,
        test::TestRequest::post()
            .uri(&assign_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "memberId": stranger.id.to_string() }))
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = call!(
        app,
        test::TestRequest::post()
            .uri(&assign_uri)
            .cookie(cookie)
            .set_json(json!({ "memberId": owner.id.to_string() }))
    );
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Task assigned");
    assert_eq!(body["data"]["assignedTo"], owner.id.to_string());
}

#[actix_web::test]
async fn delete_then_rebalance() {
    let harness = Harness::new();
    let owner = harness.user("owner@example.com").await;
    let (card, _) = board_with_cards(&harness, &owner).await;
    let app = test::init_service(harness.app(routes)).await;
    let cookie = session_cookie(&call!(app, sign_in_request(&owner.id)));
    let created = json_of!(
        app,
        test::TestRequest::post()
            .uri(&tasks_uri(&card))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Draft" }))
    );
    let task_uri = format!(
        "{}/{}",
        tasks_uri(&card),
        created["data"]["id"].as_str().expect("id")
    );

    let body = json_of!(
        app,
        test::TestRequest::delete().uri(&task_uri).cookie(cookie.clone())
    );
    assert_eq!(body["message"], "Task deleted successfully");
    let response = call!(app, test::TestRequest::get().uri(&task_uri).cookie(cookie.clone()));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_of!(
        app,
        test::TestRequest::post()
            .uri(&format!("{}/rebalance", tasks_uri(&card)))
            .cookie(cookie)
    );
    assert_eq!(body["data"]["renumbered"], 0);
}
