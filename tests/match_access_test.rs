use reqwest::Method;
use serde_json::{json, Value};

mod common;
use common::utils::{
    authed_get, authed_send, create_admin_and_login, create_user_and_login, sample_match, save_match,
    spawn_app,
};

#[tokio::test]
async fn users_only_see_their_teams_matches() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let toulouse = create_user_and_login(&test_app.address, Some("Toulouse")).await;

    save_match(&test_app.address, &admin, &sample_match("Toulouse", "Paris")).await;
    save_match(&test_app.address, &admin, &sample_match("Lyon", "toulouse")).await;
    save_match(&test_app.address, &admin, &sample_match("Paris", "Lyon")).await;

    let visible: Value = authed_get(&test_app.address, "/matches", &toulouse).await.json().await.unwrap();
    assert_eq!(visible.as_array().unwrap().len(), 2);

    let everything: Value = authed_get(&test_app.address, "/matches", &admin).await.json().await.unwrap();
    assert_eq!(everything.as_array().unwrap().len(), 3);

    let summary: Value = authed_get(&test_app.address, "/stats/summary", &toulouse).await.json().await.unwrap();
    assert_eq!(summary["total_matches"], 2);
}

#[tokio::test]
async fn user_without_team_sees_nothing() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let teamless = create_user_and_login(&test_app.address, None).await;
    save_match(&test_app.address, &admin, &sample_match("Toulouse", "Paris")).await;

    let visible: Value = authed_get(&test_app.address, "/matches", &teamless).await.json().await.unwrap();
    assert_eq!(visible, json!([]));

    let response = authed_send(
        &test_app.address,
        Method::POST,
        "/matches",
        &teamless,
        Some(&sample_match("Toulouse", "Paris")),
    )
    .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn other_teams_matches_are_forbidden() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let toulouse = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let match_id = save_match(&test_app.address, &admin, &sample_match("Paris", "Lyon")).await;
    let path = format!("/matches/{}", match_id);

    let response = authed_get(&test_app.address, &path, &toulouse).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_send(
        &test_app.address,
        Method::PUT,
        &path,
        &toulouse,
        Some(&sample_match("Paris", "Lyon")),
    )
    .await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_send(&test_app.address, Method::DELETE, &path, &toulouse, None).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_get(&test_app.address, &format!("{}/export", path), &toulouse).await;
    assert_eq!(response.status().as_u16(), 403);

    let still_there: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(still_there, 1);
}

#[tokio::test]
async fn users_cannot_record_matches_of_other_teams() {
    let test_app = spawn_app().await;
    let toulouse = create_user_and_login(&test_app.address, Some("Toulouse")).await;

    let response = authed_send(
        &test_app.address,
        Method::POST,
        "/matches",
        &toulouse,
        Some(&sample_match("Paris", "Lyon")),
    )
    .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn moving_a_match_away_from_own_team_is_forbidden() {
    let test_app = spawn_app().await;
    let toulouse = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let match_id = save_match(&test_app.address, &toulouse, &sample_match("Toulouse", "Paris")).await;

    let response = authed_send(
        &test_app.address,
        Method::PUT,
        &format!("/matches/{}", match_id),
        &toulouse,
        Some(&sample_match("Paris", "Lyon")),
    )
    .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn listing_filters_combine_with_the_scope() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;

    let mut older = sample_match("Toulouse", "Paris");
    older["season_id"] = json!("2023");
    older["date"] = json!("2023-04-01");
    save_match(&test_app.address, &admin, &older).await;
    save_match(&test_app.address, &admin, &sample_match("Toulouse", "Lyon")).await;
    save_match(&test_app.address, &admin, &sample_match("Paris", "Lyon")).await;

    let season: Value = authed_get(&test_app.address, "/matches?season=2023", &admin).await.json().await.unwrap();
    assert_eq!(season.as_array().unwrap().len(), 1);

    let team: Value = authed_get(&test_app.address, "/matches?team=lyon", &admin).await.json().await.unwrap();
    assert_eq!(team.as_array().unwrap().len(), 2);

    let range: Value = authed_get(&test_app.address, "/matches?from=2024-01-01&to=2024-12-31", &admin)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(range.as_array().unwrap().len(), 2);

    let limited: Value = authed_get(&test_app.address, "/matches?limit=1", &admin).await.json().await.unwrap();
    assert_eq!(limited.as_array().unwrap().len(), 1);
    // Newest first
    assert_eq!(limited[0]["date"], "2024-05-04");
    assert_eq!(limited[0]["away_club"], "Lyon");
}

#[tokio::test]
async fn client_player_ids_cannot_attach_lines_to_another_club() {
    let test_app = spawn_app().await;
    let paris = create_user_and_login(&test_app.address, Some("Paris")).await;
    let toulouse = create_user_and_login(&test_app.address, Some("Toulouse")).await;

    let mut body = sample_match("Paris", "Lyon");
    body["player_stats"] = json!([{ "player_name": "Zed", "goals": 7, "behinds": 6, "points": 48 }]);
    save_match(&test_app.address, &paris, &body).await;
    let zed: i64 = sqlx::query_scalar("SELECT id FROM players WHERE name = 'Zed'")
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();

    let mut forged = sample_match("Toulouse", "Lyon");
    forged["player_stats"] =
        json!([{ "player_id": zed, "player_name": "Mine", "goals": 7, "behinds": 6, "points": 48 }]);
    let toulouse_match = save_match(&test_app.address, &toulouse, &forged).await;

    let linked: i64 = sqlx::query_scalar("SELECT player_id FROM player_stats WHERE match_id = ?")
        .bind(toulouse_match)
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_ne!(linked, zed);
    let owner: String = sqlx::query_scalar("SELECT club FROM players WHERE id = ?")
        .bind(linked)
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(owner, "Toulouse");

    let totals: Value = authed_get(&test_app.address, &format!("/players/{}/totals", zed), &paris)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(totals["games"], 1);
    assert_eq!(totals["points"], 48);
}

#[tokio::test]
async fn team_scope_folds_non_ascii_club_names() {
    let test_app = spawn_app().await;
    let etoile = create_user_and_login(&test_app.address, Some("étoile")).await;

    let match_id = save_match(&test_app.address, &etoile, &sample_match("ÉTOILE", "Lyon")).await;

    let visible: Value = authed_get(&test_app.address, "/matches", &etoile).await.json().await.unwrap();
    assert_eq!(visible.as_array().unwrap().len(), 1);

    let response = authed_get(&test_app.address, &format!("/matches/{}", match_id), &etoile).await;
    assert_eq!(response.status().as_u16(), 200);

    let summary: Value = authed_get(&test_app.address, "/stats/summary", &etoile).await.json().await.unwrap();
    assert_eq!(summary["total_matches"], 1);
}
