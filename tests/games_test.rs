mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn player_cannot_create_game() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::register(&app, "player01", "p@example.com", "player").await;

    let (status, _) = common::post_json_auth(
        &app,
        "/api/games",
        &json!({
            "title": "My Game",
            "description": "Great game.",
            "genre": "Action",
        }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn developer_creates_draft() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::register(&app, "devstudio", "dev@example.com", "developer").await;

    let (status, body) = common::post_json_auth(
        &app,
        "/api/games",
        &json!({
            "title": "Neon Sky Racer",
            "description": "Futuristic racing through a neon megacity.",
            "genre": "Racing",
            "price": 9.99,
        }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "draft");
}

#[tokio::test]
async fn create_game_validates_required_fields() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::register(&app, "devstudio", "dev@example.com", "developer").await;

    let cases = [
        json!({ "title": "  ", "description": "d", "genre": "Action" }),
        json!({ "title": "Game", "description": " ", "genre": "Action" }),
        json!({ "title": "Game", "description": "d", "genre": "" }),
        json!({ "title": "Game", "description": "d", "genre": "Action", "price": -1.0 }),
    ];

    for case in cases {
        let (status, _) = common::post_json_auth(&app, "/api/games", &case, &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {case}");
    }
}

#[tokio::test]
async fn draft_is_not_listed_until_published() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::register(&app, "devstudio", "dev@example.com", "developer").await;

    let (_, body) = common::post_json_auth(
        &app,
        "/api/games",
        &json!({
            "title": "Hidden Gem",
            "description": "Not ready yet.",
            "genre": "Puzzle",
        }),
        &token,
    )
    .await;
    let game_id = body["data"]["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::get(&app, "/api/games").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 0);

    // Owner self-publishes
    let (status, _) = common::put_json_auth(
        &app,
        &format!("/api/games/{game_id}"),
        &json!({ "status": "published" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = common::get(&app, "/api/games").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Hidden Gem");
    assert_eq!(body["data"][0]["developer_name"], "devstudio");
}

#[tokio::test]
async fn non_owner_update_is_forbidden_regardless_of_payload() {
    let (app, _db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;
    let (other, _) = common::register(&app, "other_dev", "other@example.com", "developer").await;
    let game_id = common::create_published_game(&app, &owner, "Contested Game").await;

    for payload in [
        json!({ "title": "Hijacked" }),
        json!({ "status": "published" }),
        json!({ "status": "archived" }),
    ] {
        let (status, _) =
            common::put_json_auth(&app, &format!("/api/games/{game_id}"), &payload, &other).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "payload {payload}");
    }
}

#[tokio::test]
async fn owner_cannot_archive_own_game() {
    let (app, _db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;
    let game_id = common::create_published_game(&app, &owner, "My Game").await;

    let (status, _) = common::put_json_auth(
        &app,
        &format!("/api/games/{game_id}"),
        &json!({ "status": "archived" }),
        &owner,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_archive_any_game() {
    let (app, db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;
    let game_id = common::create_published_game(&app, &owner, "Soon Archived").await;
    let admin = common::create_admin(&db, "moderator", "admin@example.com").await;

    let (status, _) = common::put_json_auth(
        &app,
        &format!("/api/games/{game_id}"),
        &json!({ "status": "archived" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Archived games leave the public catalog
    let (_, body) = common::get(&app, "/api/games").await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn detail_fetch_increments_views_each_time() {
    let (app, _db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;
    let game_id = common::create_published_game(&app, &owner, "Counted Game").await;

    for expected in 1..=3_i64 {
        let (status, body) = common::get(&app, &format!("/api/games/{game_id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "published");
        assert_eq!(body["data"]["views_count"], expected);
    }
}

#[tokio::test]
async fn update_with_invalid_status_is_rejected() {
    let (app, _db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;
    let game_id = common::create_published_game(&app, &owner, "Valid Game").await;

    let (status, _) = common::put_json_auth(
        &app,
        &format!("/api/games/{game_id}"),
        &json!({ "status": "deleted" }),
        &owner,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_game_is_not_found() {
    let (app, _db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;

    let id = uuid::Uuid::new_v4();
    let (status, _) = common::get(&app, &format!("/api/games/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::put_json_auth(
        &app,
        &format!("/api/games/{id}"),
        &json!({ "title": "Ghost" }),
        &owner,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_deletes_game() {
    let (app, _db) = common::test_app().await;
    let (owner, _) = common::register(&app, "owner_dev", "owner@example.com", "developer").await;
    let game_id = common::create_published_game(&app, &owner, "Short Lived").await;

    let (status, _) = common::delete_auth(&app, &format!("/api/games/{game_id}"), &owner).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::get(&app, &format!("/api/games/{game_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_supports_filters_and_search() {
    let (app, _db) = common::test_app().await;
    let (dev, _) = common::register(&app, "devstudio", "dev@example.com", "developer").await;

    for (title, genre) in [
        ("Neon Sky Racer", "Racing"),
        ("Dungeon Loop", "RPG"),
        ("Pixel Defense Squad", "Strategy"),
    ] {
        let (_, body) = common::post_json_auth(
            &app,
            "/api/games",
            &json!({
                "title": title,
                "description": "A test game.",
                "genre": genre,
            }),
            &dev,
        )
        .await;
        let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
        common::put_json_auth(
            &app,
            &format!("/api/games/{id}"),
            &json!({ "status": "published" }),
            &dev,
        )
        .await;
    }

    let (_, body) = common::get(&app, "/api/games?genre=RPG").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Dungeon Loop");

    let (_, body) = common::get(&app, "/api/games?search=Pixel").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Pixel Defense Squad");

    let (_, body) = common::get(&app, "/api/games?sort=name&limit=2").await;
    assert_eq!(body["data"][0]["title"], "Dungeon Loop");
    assert_eq!(body["pagination"]["total_pages"], 2);

    let (status, _) = common::get(&app, "/api/games?sort=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rating_sort_orders_by_average_with_unrated_last() {
    let (app, _db) = common::test_app().await;
    let (dev, _) = common::register(&app, "devstudio", "dev@example.com", "developer").await;
    let (player, _) = common::register(&app, "player01", "p@example.com", "player").await;

    let acclaimed = common::create_published_game(&app, &dev, "Acclaimed Game").await;
    let middling = common::create_published_game(&app, &dev, "Middling Game").await;
    common::create_published_game(&app, &dev, "Unrated Game").await;

    common::post_json_auth(
        &app,
        "/api/ratings",
        &json!({ "game_id": acclaimed, "rating": 5 }),
        &player,
    )
    .await;
    common::post_json_auth(
        &app,
        "/api/ratings",
        &json!({ "game_id": middling, "rating": 3 }),
        &player,
    )
    .await;

    let (status, body) = common::get(&app, "/api/games?sort=rating").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], "Acclaimed Game");
    assert_eq!(body["data"][1]["title"], "Middling Game");
    assert_eq!(body["data"][2]["title"], "Unrated Game");
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn genres_list_is_seeded() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::get(&app, "/api/games/genres/list").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["data"]
        .as_array()
        .map(|genres| {
            genres
                .iter()
                .filter_map(|g| g["name"].as_str())
                .collect()
        })
        .unwrap_or_default();
    assert!(names.contains(&"Action"));
    assert!(names.contains(&"RPG"));
}
