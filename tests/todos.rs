mod common;

use actix_web::{http::header, http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use todoflow::models::TodoResult;
use todoflow::routes::{self, health};

#[test_log::test(actix_rt::test)]
async fn test_todo_lifecycle_flow() {
    let (dispatch, _) = common::in_memory_dispatch().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(dispatch))
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    // 1. Create
    let req = test::TestRequest::post()
        .uri("/api/todos")
        .set_json(json!({ "description": "Write the report" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .expect("Location header");
    let created: TodoResult = test::read_body_json(resp).await;
    assert_eq!(created.description, "Write the report");
    assert_eq!(created.state, "Pending");
    assert!(!created.is_done);
    assert!(created.created.is_some());
    assert_eq!(location, format!("/api/todos/{}", created.id));

    // 2. Start
    let req = test::TestRequest::post()
        .uri(&format!("/api/todos/{}/start", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(resp).await;
    assert_eq!(outcome, json!({ "succeeded": true, "errors": [] }));

    let req = test::TestRequest::get().uri(&location).to_request();
    let started: TodoResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started.state, "In Progress");
    assert!(!started.is_done);
    assert!(started.modified.is_some());

    // 3. Rename
    let req = test::TestRequest::put()
        .uri(&location)
        .set_json(json!({ "description": "Write the annual report" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 4. Complete
    let req = test::TestRequest::post()
        .uri(&format!("/api/todos/{}/complete", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/todos").to_request();
    let all: Vec<TodoResult> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "Write the annual report");
    assert_eq!(all[0].state, "Completed");
    assert!(all[0].is_done);

    // 5. Delete
    let req = test::TestRequest::delete().uri(&location).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&location).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_missing_todo_commands_fail() {
    let (dispatch, _) = common::in_memory_dispatch().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(dispatch))
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    for req in [
        test::TestRequest::post().uri("/api/todos/missing/start"),
        test::TestRequest::post().uri("/api/todos/missing/complete"),
        test::TestRequest::delete().uri("/api/todos/missing"),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let outcome: Value = test::read_body_json(resp).await;
        assert_eq!(outcome["succeeded"], false);
        assert_eq!(outcome["errors"][0], "Todo does not exists in the system.");
    }

    let req = test::TestRequest::put()
        .uri("/api/todos/missing")
        .set_json(json!({ "description": "Anything" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_invalid_description_is_rejected() {
    let (dispatch, _) = common::in_memory_dispatch().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(dispatch))
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .set_json(json!({ "description": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .set_json(json!({ "description": "a".repeat(501) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/api/todos").to_request();
    let all: Vec<TodoResult> = test::call_and_read_body_json(&app, req).await;
    assert!(all.is_empty());
}
