use serde_json::Value;

mod common;
use common::utils::{
    authed_get, create_admin_and_login, create_user_and_login, home_player_lines,
    sample_match, save_match, spawn_app,
};

#[tokio::test]
async fn matches_export_as_csv_with_a_header_row() {
    let test_app = spawn_app().await;
    let user = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let id = save_match(&test_app.address, &user, &sample_match("Toulouse", "Paris")).await;

    let response = authed_get(&test_app.address, "/matches/export?format=csv", &user).await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/csv"));
    assert!(response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .contains("matches.csv"));

    let body = response.text().await.unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("ID,Date,Season,Home,Away,Home Points,Away Points,Venue"));
    assert_eq!(
        lines.next(),
        Some(format!("{},2024-05-04,2024,Toulouse,Paris,48,38,Stade des Argoulets", id).as_str())
    );
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn match_bundle_carries_totals() {
    let test_app = spawn_app().await;
    let user = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let mut body = sample_match("Toulouse", "Paris");
    body["player_stats"] = home_player_lines();
    let id = save_match(&test_app.address, &user, &body).await;

    let response = authed_get(&test_app.address, &format!("/matches/{}/export", id), &user).await;
    assert_eq!(response.status().as_u16(), 200);
    let bundle: Value = response.json().await.unwrap();

    assert_eq!(bundle["match"][0]["Home Points"], 48);
    let quarters = bundle["quarters"].as_array().unwrap();
    assert_eq!(quarters.len(), 5);
    assert_eq!(quarters[4]["Q"], "Total");
    assert_eq!(quarters[4]["Toulouse P"], 48);
    assert_eq!(quarters[4]["Paris P"], 38);

    let players = bundle["players"].as_array().unwrap();
    assert_eq!(players.len(), 4);
    assert_eq!(players[3]["Player"], "Total Toulouse");
    assert_eq!(players[3]["Points"], 48);
}

#[tokio::test]
async fn single_parts_export_as_csv_but_the_bundle_does_not() {
    let test_app = spawn_app().await;
    let user = create_user_and_login(&test_app.address, Some("Toulouse")).await;
    let id = save_match(&test_app.address, &user, &sample_match("Toulouse", "Paris")).await;

    let response = authed_get(
        &test_app.address,
        &format!("/matches/{}/export?format=csv&part=quarters", id),
        &user,
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Q,Toulouse G,Toulouse B,Toulouse P,Paris G,Paris B,Paris P");
    assert_eq!(lines[1], "1,2,1,13,1,2,8");
    assert_eq!(lines[5], "Total,7,6,48,5,8,38");

    let response = authed_get(
        &test_app.address,
        &format!("/matches/{}/export?format=csv&part=bundle", id),
        &user,
    )
    .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn users_export_is_admin_only() {
    let test_app = spawn_app().await;
    let admin = create_admin_and_login(&test_app.address).await;
    let user = create_user_and_login(&test_app.address, Some("Paris")).await;

    let response = authed_get(&test_app.address, "/admin/users/export?format=csv", &user).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = authed_get(&test_app.address, "/admin/users/export?format=csv", &admin).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "ID,Email,Team,Admin,Created At");
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().any(|l| l.contains(&user.email) && l.contains(",Paris,false,")));
}
