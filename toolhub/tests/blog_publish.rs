// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};

fn tag_slugs(harness: &common::TestHarness, post_slug: &str) -> Vec<String> {
    let mut slugs: Vec<String> = harness
        .cms
        .post(post_slug)
        .expect("post stored")
        .node
        .tag
        .into_iter()
        .map(|tag| tag.slug)
        .collect();
    slugs.sort();
    slugs
}

#[actix_web::test]
async fn write_form_publishes_post_and_redirects_to_blog() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness.cms.seed_tag("Rust", "rust", true);
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/write"), &writer)
        .set_form([
            ("title", "Hello World"),
            ("content", "First post body"),
            ("tags", "rust and Web, CLI, web"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp).as_deref(), Some("/blog"));

    let post = harness.cms.post("hello-world").expect("post stored");
    assert!(post.published);
    assert_eq!(post.content, "First post body");
    assert!(post.node.is_written_by(common::WRITER_EMAIL));
    assert_eq!(tag_slugs(&harness, "hello-world"), vec!["cli", "rust", "web"]);

    // New tags are published before the post is.
    for slug in ["cli", "web"] {
        assert!(harness.cms.tag(slug).expect("tag created").is_published(), "{}", slug);
    }
    let rust_tags = harness
        .cms
        .tags()
        .into_iter()
        .filter(|tag| tag.slug == "rust")
        .count();
    assert_eq!(rust_tags, 1);
}

#[actix_web::test]
async fn write_form_requires_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = test::TestRequest::post()
        .uri("/blog/write")
        .set_form([("title", "Hello World"), ("content", "Body")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.cms.post("hello-world").is_none());

    for uri in ["/blog/write", "/blog/register", "/user/profile/edit", "/user/profile/delete"] {
        let req = test::TestRequest::post().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "empty {}", uri);
    }
}

#[actix_web::test]
async fn signed_in_empty_form_is_a_bad_request() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/write"), &writer)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_text(resp).await, "Invalid form submission");
}

#[actix_web::test]
async fn write_form_without_author_profile_is_not_found() {
    let harness = common::TestHarness::new();
    let reader = harness.reader();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/write"), &reader)
        .set_form([("title", "Hello World"), ("content", "Body")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        common::body_text(resp).await,
        "Author not found. Register as an author first."
    );
}

#[actix_web::test]
async fn write_form_with_taken_slug_is_unprocessable() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness.cms.seed_post("Hello World", common::WRITER_EMAIL, &[]);
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/write"), &writer)
        .set_form([("title", "hello   world"), ("content", "Again")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(harness.cms.post("hello-world").expect("original").content, "Hello World body");
}

#[actix_web::test]
async fn publish_failure_reports_saved_but_unpublished() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness.cms.fail_post_publish();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/write"), &writer)
        .set_form([("title", "Draft Only"), ("content", "Body")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        common::body_text(resp).await,
        "Post was saved but failed to publish"
    );
    let stored = harness.cms.post("draft-only").expect("draft kept");
    assert!(!stored.published);
}

#[actix_web::test]
async fn edit_form_updates_owned_post_and_tags() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness.cms.seed_tag("Rust", "rust", true);
    harness.cms.seed_tag("Go", "go", true);
    harness
        .cms
        .seed_post("Hello World", common::WRITER_EMAIL, &["rust", "go"]);
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/user/profile/edit"), &writer)
        .set_form([
            ("slug", "hello-world"),
            ("title", "Hello Again"),
            ("content", "Updated body"),
            ("tags", "Rust, Zig"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp).as_deref(), Some("/user/profile"));

    assert!(harness.cms.post("hello-world").is_none());
    let updated = harness.cms.post("hello-again").expect("renamed post");
    assert!(updated.published);
    assert_eq!(updated.content, "Updated body");
    assert_eq!(tag_slugs(&harness, "hello-again"), vec!["rust", "zig"]);
}

#[actix_web::test]
async fn edit_form_on_foreign_post_is_not_found() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness.cms.seed_author("Other Author", "other@example.com");
    harness
        .cms
        .seed_post("Not Yours", "other@example.com", &[]);
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/user/profile/edit"), &writer)
        .set_form([
            ("slug", "not-yours"),
            ("title", "Mine Now"),
            ("content", "Hijacked"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(harness.cms.post("not-yours").expect("untouched").content, "Not Yours body");
}

#[actix_web::test]
async fn delete_form_removes_owned_post() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    harness.cms.seed_post("Gone Soon", common::WRITER_EMAIL, &[]);
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/user/profile/delete"), &writer)
        .set_form([("slug", "gone-soon")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp).as_deref(), Some("/user/profile"));
    assert!(harness.cms.post("gone-soon").is_none());

    let calls = harness.cms.calls();
    let unpublish = calls.iter().position(|call| call.starts_with("unpublish_post:"));
    let delete = calls.iter().position(|call| call.starts_with("delete_post:"));
    assert!(unpublish.is_some());
    assert!(unpublish < delete);
}

#[actix_web::test]
async fn delete_form_requires_slug() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/user/profile/delete"), &writer)
        .set_form([("slug", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_form_creates_published_author() {
    let harness = common::TestHarness::new();
    let reader = harness.reader();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/register"), &reader)
        .set_form([
            ("name", ""),
            ("title", "Staff Writer"),
            ("bio", "Writes about tools."),
            ("instagram", "rita.reads"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp).as_deref(), Some("/blog/write"));

    let author = harness
        .cms
        .author_record(common::READER_EMAIL)
        .expect("author created");
    assert!(author.published);
    assert_eq!(author.name, common::READER_NAME);
    assert_eq!(author.slug, "rita-reader");
    assert_eq!(
        author.instagram.as_deref(),
        Some("https://instagram.com/rita.reads")
    );
}

#[actix_web::test]
async fn register_form_twice_is_unprocessable() {
    let harness = common::TestHarness::new();
    let writer = harness.writer();
    let app = test::init_service(common::build_test_app(harness.app_state())).await;

    let req = common::with_session(test::TestRequest::post().uri("/blog/register"), &writer)
        .set_form([("name", "Walt Again")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
