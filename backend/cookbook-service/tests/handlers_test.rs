//! Integration Tests: ownership and privacy rules on the HTTP surface
//!
//! Runs the real routes against a PostgreSQL container and checks who may
//! read, edit and delete posts, comments, likes and profiles.

mod common;

use actix_middleware::SessionVerifier;
use actix_web::{http::StatusCode, test, web, App};
use common::setup_test_db;
use cookbook_service::handlers;
use cookbook_service::models::CreatePostRequest;
use cookbook_service::realtime::ChatHub;
use cookbook_service::repository::{CommentRepository, PostRepository, UserRepository};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

const SECRET: &str = "handler-test-secret-at-least-32-bytes-long";

struct TestUser {
    id: Uuid,
    token: String,
}

impl TestUser {
    fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

async fn create_test_user(pool: &PgPool, name: &str) -> TestUser {
    let id = Uuid::new_v4();
    UserRepository::new(pool.clone()).ensure(id, name, None).await.unwrap();
    let token = SessionVerifier::new(SECRET).unwrap().issue(id, name, None).unwrap();
    TestUser { id, token }
}

async fn create_test_post(pool: &PgPool, author: &TestUser, is_private: bool) -> Uuid {
    let req = CreatePostRequest {
        category: Some("dessert".to_string()),
        description: "Lemon tart".to_string(),
        media_urls: vec![],
        media_types: vec![],
        is_private,
        tagged_friends: vec![],
        location: None,
    };
    PostRepository::new(pool.clone()).create(author.id, &req).await.unwrap().id
}

macro_rules! handler_app {
    ($pool:expr) => {{
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(ChatHub::new(16)))
                .app_data(web::Data::new(SessionVerifier::new(SECRET).unwrap()))
                .configure(handlers::configure),
        )
        .await
    }};
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_only_author_can_modify_post() {
    let pool = setup_test_db().await.expect("Failed to setup test db");
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let post_id = create_test_post(&pool, &alice, false).await;
    let app = handler_app!(pool);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/update/{}", post_id))
        .insert_header(bob.bearer())
        .set_json(json!({"description": "mine now"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/delete/{}", post_id))
        .insert_header(bob.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/update/{}", post_id))
        .insert_header(alice.bearer())
        .set_json(json!({"description": "Lemon tart, less sugar"}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["description"], "Lemon tart, less sugar");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/delete/{}", post_id))
        .insert_header(alice.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_private_post_visible_only_to_author() {
    let pool = setup_test_db().await.expect("Failed to setup test db");
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let post_id = create_test_post(&pool, &alice, true).await;
    let app = handler_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .insert_header(bob.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .insert_header(alice.bearer())
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["id"], post_id.to_string());
    assert_eq!(post["is_private"], true);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_only_commenter_can_modify_comment() {
    let pool = setup_test_db().await.expect("Failed to setup test db");
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let post_id = create_test_post(&pool, &alice, false).await;
    let comment = CommentRepository::new(pool.clone())
        .create(post_id, bob.id, "bob", "needs more zest")
        .await
        .unwrap();
    let app = handler_app!(pool);

    // The post author does not own comments on it
    let req = test::TestRequest::put()
        .uri(&format!("/api/comments/{}", comment.id))
        .insert_header(alice.bearer())
        .set_json(json!({"text": "edited"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/comments/{}", comment.id))
        .insert_header(alice.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/comments/{}", comment.id))
        .insert_header(bob.bearer())
        .set_json(json!({"text": "needs more lemon zest"}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["text"], "needs more lemon zest");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/comments/{}", comment.id))
        .insert_header(bob.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_repeat_like_reports_already_liked() {
    let pool = setup_test_db().await.expect("Failed to setup test db");
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let public = create_test_post(&pool, &alice, false).await;
    let private = create_test_post(&pool, &alice, true).await;
    let app = handler_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bob.bearer())
        .set_json(json!({"postId": public}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bob.bearer())
        .set_json(json!({"postId": public}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "already_liked"}));

    let req = test::TestRequest::post()
        .uri("/api/likes")
        .insert_header(bob.bearer())
        .set_json(json!({"postId": private}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_profile_rename_survives_me() {
    let pool = setup_test_db().await.expect("Failed to setup test db");
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let app = handler_app!(pool);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", alice.id))
        .insert_header(bob.bearer())
        .set_json(json!({"name": "bob was here"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", alice.id))
        .insert_header(alice.bearer())
        .set_json(json!({"name": "Chef Alice"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // The session token still says "alice"
    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(alice.bearer())
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["name"], "Chef Alice");
}
