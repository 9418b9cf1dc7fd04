use reqwest::Method;
use serde_json::{json, Value};

mod common;
use common::utils::{
    authed_get, authed_send, create_admin_and_login, create_user_and_login, home_player_lines,
    sample_match, save_match, spawn_app,
};

async fn add_players(address: &str, session: &common::utils::TestSession, names: &[&str]) -> Value {
    let response = authed_send(
        address,
        Method::POST,
        "/players",
        session,
        Some(&json!({ "names": names })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.unwrap()
}

fn player_id(roster: &Value, name: &str) -> i64 {
    roster
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .and_then(|p| p["id"].as_i64())
        .expect("player not in roster")
}

#[tokio::test]
async fn upsert_adds_only_missing_names_to_own_club() {
    let test_app = spawn_app().await;
    let session = create_user_and_login(&test_app.address, Some("Toulouse")).await;

    add_players(&test_app.address, &session, &["Lucas", " Hugo "]).await;
    let roster = add_players(&test_app.address, &session, &["Lucas", "Nathan", ""]).await;

    let names: Vec<&str> = roster.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Hugo", "Lucas", "Nathan"]);
    assert!(roster.as_array().unwrap().iter().all(|p| p["club"] == "Toulouse"));

    let count: Value = authed_get(&test_app.address, "/players/count", &session).await.json().await.unwrap();
    assert_eq!(count["count"], 3);
}

#[tokio::test]
async fn users_cannot_touch_other_clubs() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let toulouse = create_user_and_login(&test_app.address, Some("Toulouse")).await;

    let response = authed_send(
        &test_app.address,
        Method::POST,
        "/players",
        &admin,
        Some(&json!({ "names": ["Arthur"], "club": "Paris" })),
    )
    .await;
    let paris: Value = response.json().await.unwrap();
    let arthur = player_id(&paris, "Arthur");

    let response = authed_get(&test_app.address, "/players?club=Paris", &toulouse).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_get(&test_app.address, &format!("/players/{}", arthur), &toulouse).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_send(
        &test_app.address,
        Method::PATCH,
        &format!("/players/{}", arthur),
        &toulouse,
        Some(&json!({ "name": "Arthur B" })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn rename_clash_is_a_conflict() {
    let test_app = spawn_app().await;
    let session = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let roster = add_players(&test_app.address, &session, &["Lucas", "Hugo"]).await;
    let hugo = player_id(&roster, "Hugo");

    let response = authed_send(
        &test_app.address,
        Method::PATCH,
        &format!("/players/{}", hugo),
        &session,
        Some(&json!({ "name": "Lucas" })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 409);

    let response = authed_send(
        &test_app.address,
        Method::PATCH,
        &format!("/players/{}", hugo),
        &session,
        Some(&json!({ "name": " Hugo M " })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let renamed: Value = response.json().await.unwrap();
    assert_eq!(renamed["data"]["name"], "Hugo M");

    let response = authed_send(
        &test_app.address,
        Method::PATCH,
        &format!("/players/{}", hugo),
        &session,
        Some(&json!({ "name": "   " })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn deactivated_players_leave_the_default_listing() {
    let test_app = spawn_app().await;
    let session = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let roster = add_players(&test_app.address, &session, &["Lucas", "Hugo"]).await;
    let hugo = player_id(&roster, "Hugo");

    let response = authed_send(
        &test_app.address,
        Method::POST,
        &format!("/players/{}/deactivate", hugo),
        &session,
        None,
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);

    let active: Value = authed_get(&test_app.address, "/players", &session).await.json().await.unwrap();
    assert_eq!(active.as_array().unwrap().len(), 1);
    let all: Value = authed_get(&test_app.address, "/players?include_inactive=true", &session)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let search: Value = authed_get(&test_app.address, "/players/search?q=hu", &session).await.json().await.unwrap();
    assert_eq!(search, json!([]));

    authed_send(
        &test_app.address,
        Method::POST,
        &format!("/players/{}/reactivate", hugo),
        &session,
        None,
    )
    .await;
    let search: Value = authed_get(&test_app.address, "/players/search?q=hu", &session).await.json().await.unwrap();
    assert_eq!(search[0]["name"], "Hugo");
}

#[tokio::test]
async fn only_admins_delete_players() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let session = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let roster = add_players(&test_app.address, &session, &["Lucas"]).await;
    let lucas = player_id(&roster, "Lucas");

    let response = authed_send(&test_app.address, Method::DELETE, &format!("/players/{}", lucas), &session, None).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_send(&test_app.address, Method::DELETE, &format!("/players/{}", lucas), &admin, None).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = authed_get(&test_app.address, &format!("/players/{}", lucas), &admin).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn player_matches_and_totals() {
    let test_app = spawn_app().await;
    let session = create_user_and_login(&test_app.address, Some("Toulouse")).await;

    let mut first = sample_match("Toulouse", "Paris");
    first["player_stats"] = home_player_lines();
    save_match(&test_app.address, &session, &first).await;

    let mut second = sample_match("Lyon", "Toulouse");
    second["season_id"] = json!("2025");
    second["date"] = json!("2025-04-12");
    second["player_stats"] = json!([
        { "player_name": "Lucas", "goals": 3, "behinds": 2, "points": 20 },
        { "player_name": "Jules", "goals": 3, "behinds": 0, "points": 18 }
    ]);
    save_match(&test_app.address, &session, &second).await;

    let roster: Value = authed_get(&test_app.address, "/players", &session).await.json().await.unwrap();
    let lucas = player_id(&roster, "Lucas");

    let matches: Value = authed_get(&test_app.address, &format!("/players/{}/matches", lucas), &session)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(matches.as_array().unwrap().len(), 2);
    assert_eq!(matches[0]["season_id"], "2025");

    let totals: Value = authed_get(&test_app.address, &format!("/players/{}/totals", lucas), &session)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(totals["goals"], 7);
    assert_eq!(totals["behinds"], 4);
    assert_eq!(totals["points"], 46);
    assert_eq!(totals["games"], 2);

    let season: Value = authed_get(&test_app.address, &format!("/players/{}/totals?season=2024", lucas), &session)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(season["points"], 26);
    assert_eq!(season["games"], 1);
}

#[tokio::test]
async fn roster_lookups_fold_non_ascii_club_and_names() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let etoile = create_user_and_login(&test_app.address, Some("étoile")).await;

    let response = authed_send(
        &test_app.address,
        Method::POST,
        "/players",
        &admin,
        Some(&json!({ "names": ["Élodie"], "club": "ÉTOILE" })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let roster = add_players(&test_app.address, &etoile, &["Élodie", "Zoé"]).await;
    assert_eq!(roster.as_array().unwrap().len(), 2);

    let count: Value = authed_get(&test_app.address, "/players/count", &etoile).await.json().await.unwrap();
    assert_eq!(count["count"], 2);

    let search: Value = authed_get(&test_app.address, "/players/search?q=%C3%89LO", &etoile)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(search.as_array().unwrap().len(), 1);
    assert_eq!(search[0]["name"], "Élodie");
}
