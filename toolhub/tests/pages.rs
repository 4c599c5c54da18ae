// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::dev::ServiceResponse;
use actix_web::{http::StatusCode, test};
use serde_json::Value;
use toolhub::cms::{GraphError, NamedRef, Tool, ToolsOverview};
use toolhub::store::{NewReview, NewSave, RelationalStore};

async fn read_json(resp: ServiceResponse) -> (StatusCode, Value) {
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

macro_rules! get_json {
    ($app:expr, $req:expr $(,)?) => {
        read_json(test::call_service($app, $req.to_request()).await).await
    };
}

fn sample_tool() -> Tool {
    Tool {
        id: "tool-1".to_string(),
        name: "Ripgrep".to_string(),
        slug: "ripgrep".to_string(),
        logo: None,
        description: Some("Fast search".to_string()),
        features: None,
        website_url: Some("https://example.com/rg".to_string()),
        category: Some(NamedRef {
            name: "Search".to_string(),
            slug: "search".to_string(),
        }),
        platform: None,
    }
}

#[actix_web::test]
async fn session_is_null_when_signed_out() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, json) = get_json!(&app, test::TestRequest::get().uri("/api/session"));
    assert_eq!(status, StatusCode::OK);
    assert!(json.is_null());
}

#[actix_web::test]
async fn session_returns_user_when_signed_in() {
    let harness = common::TestHarness::new();
    let reader = harness.reader();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, json) = get_json!(
        &app,
        common::with_session(test::TestRequest::get().uri("/api/session"), &reader),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], common::READER_EMAIL);
    assert_eq!(json["name"], common::READER_NAME);
}

#[actix_web::test]
async fn tools_overview_and_detail_with_reviews() {
    let harness = common::TestHarness::new();
    harness.cms.seed_tools(ToolsOverview {
        tools: vec![sample_tool()],
        categories: vec![NamedRef {
            name: "Search".to_string(),
            slug: "search".to_string(),
        }],
        platforms: Vec::new(),
    });
    harness
        .store
        .insert_review(&NewReview {
            user_id: "u1".to_string(),
            user_full_name: "Ada Lovelace".to_string(),
            tool_id: "tool-1".to_string(),
            title: "Great".to_string(),
            content: "Use it daily".to_string(),
        })
        .await
        .unwrap();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, json) = get_json!(&app, test::TestRequest::get().uri("/api/tools"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tools"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["categories"][0]["slug"], "search");

    let (status, json) = get_json!(&app, test::TestRequest::get().uri("/api/tools/ripgrep"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tool"]["name"], "Ripgrep");
    assert_eq!(json["reviews"][0]["title"], "Great");
    assert_eq!(json["reviews"][0]["userFullName"], "Ada Lovelace");

    let (status, _) = get_json!(&app, test::TestRequest::get().uri("/api/tools/missing"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn blog_post_reports_like_and_save_state_for_viewer() {
    let harness = common::TestHarness::new();
    let reader = harness.reader();
    harness.cms.seed_author("Walt Writer", common::WRITER_EMAIL);
    let post = harness
        .cms
        .seed_post("Hello World", common::WRITER_EMAIL, &[]);
    harness.store.insert_like("someone-else", &post.id).await.unwrap();
    harness.store.insert_like(&reader.user.id, &post.id).await.unwrap();
    harness
        .store
        .insert_save(&NewSave {
            user_id: reader.user.id.clone(),
            post_id: post.id.clone(),
            post_title: post.title.clone(),
            post_slug: post.slug.clone(),
        })
        .await
        .unwrap();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, json) = get_json!(
        &app,
        common::with_session(test::TestRequest::get().uri("/api/blog/hello-world"), &reader),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["post"]["title"], "Hello World");
    assert_eq!(json["likeCount"], 2);
    assert_eq!(json["liked"], true);
    assert_eq!(json["saved"], true);

    let (status, json) =
        get_json!(&app, test::TestRequest::get().uri("/api/blog/hello-world"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["likeCount"], 2);
    assert_eq!(json["liked"], false);
    assert_eq!(json["saved"], false);
}

#[actix_web::test]
async fn blog_index_tag_and_author_pages() {
    let harness = common::TestHarness::new();
    harness.cms.seed_author("Walt Writer", common::WRITER_EMAIL);
    harness.cms.seed_tag("Rust", "rust", true);
    harness
        .cms
        .seed_post("Hello World", common::WRITER_EMAIL, &["rust"]);
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, json) = get_json!(&app, test::TestRequest::get().uri("/api/blog"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["posts"][0]["slug"], "hello-world");

    let (status, json) = get_json!(&app, test::TestRequest::get().uri("/api/blog/tag/rust"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Rust");
    assert_eq!(json["post"].as_array().map(Vec::len), Some(1));

    let (status, json) = get_json!(
        &app,
        test::TestRequest::get().uri("/api/blog/author/walt-writer"),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["post"][0]["title"], "Hello World");

    let (status, _) = get_json!(&app, test::TestRequest::get().uri("/api/blog/nope"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn cms_outage_is_internal_error_without_detail() {
    let harness = common::TestHarness::new();
    harness
        .cms
        .fail_reads(GraphError::Transport("connection reset".to_string()));
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/blog").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::body_text(resp).await;
    assert_eq!(body, "Internal server error");
}

#[actix_web::test]
async fn profile_requires_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, _) = get_json!(&app, test::TestRequest::get().uri("/api/profile"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_lists_author_posts_and_saves() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness
        .cms
        .seed_post("Hello World", common::WRITER_EMAIL, &[]);
    harness
        .store
        .insert_save(&NewSave {
            user_id: writer.user.id.clone(),
            post_id: "elsewhere".to_string(),
            post_title: "Saved Post".to_string(),
            post_slug: "saved-post".to_string(),
        })
        .await
        .unwrap();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let (status, json) = get_json!(
        &app,
        common::with_session(test::TestRequest::get().uri("/api/profile"), &writer),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["email"], common::WRITER_EMAIL);
    assert_eq!(json["author"]["slug"], "walt-writer");
    assert_eq!(json["author"]["post"][0]["slug"], "hello-world");
    assert_eq!(json["saves"][0]["postSlug"], "saved-post");
}
