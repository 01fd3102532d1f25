//! Built-in command integration tests.
//!
//! Each test drives a command through the router and checks both the JSON
//! response and the resulting store state.

use axum::http::StatusCode;

use rest_dispatch::store::{hash_password, BanStore, PlayerDirectory, UserStore, WorldState};

use super::test_utils::{get, get_with_token, post_form, test_server, TEST_TOKEN};

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_status_reports_players() {
    let server = test_server();
    let (_, json) = get(&server.router, "/status").await;

    assert_eq!(json["port"], "7777");
    assert_eq!(json["playercount"], "2");
    assert_eq!(json["players"], "Alice, Griefer");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_info() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/users/read/Alice/info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["group"], "admin");
    assert_eq!(json["id"], "1");
}

#[tokio::test]
async fn test_user_info_missing_is_400() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/users/read/Ghost/info").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "The specified user account does not exist.");
}

#[tokio::test]
async fn test_user_update_via_form_body() {
    let server = test_server();
    let (status, json) = post_form(
        &server.router,
        "/users/update/Bob",
        &format!("token={}&password=n3w&group=vip", TEST_TOKEN),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["password-response"], "Password updated successfully.");
    assert_eq!(json["group-response"], "Group updated successfully.");

    let bob = server.users.get_user_by_name("Bob").unwrap().unwrap();
    assert_eq!(bob.group, "vip");
    assert_eq!(bob.password_hash, hash_password("n3w"));
}

#[tokio::test]
async fn test_user_update_without_parameters() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/users/update/Bob").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No parameters were passed.");
}

#[tokio::test]
async fn test_user_path_value_beats_query_value() {
    let server = test_server();
    // `user` in the query must not redirect the update to Alice
    let (status, _) = get_with_token(&server.router, "/users/update/Bob?user=Alice&group=vip").await;
    assert_eq!(status, StatusCode::OK);

    let alice = server.users.get_user_by_name("Alice").unwrap().unwrap();
    let bob = server.users.get_user_by_name("Bob").unwrap().unwrap();
    assert_eq!(alice.group, "admin");
    assert_eq!(bob.group, "vip");
}

#[tokio::test]
async fn test_user_destroy_twice() {
    let server = test_server();

    let (status, json) = get_with_token(&server.router, "/users/destroy/Bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "User deleted successfully.");

    let (status, json) = get_with_token(&server.router, "/users/destroy/Bob").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "The specified user account does not exist.");
}

#[tokio::test]
async fn test_active_user_list() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/users/activelist").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["activeusers"], "Alice");
}

// =============================================================================
// Bans
// =============================================================================

#[tokio::test]
async fn test_ban_lifecycle() {
    let server = test_server();

    let (status, json) = get_with_token(
        &server.router,
        "/bans/create?ip=1.2.3.4&name=Spammer&reason=chat%20spam",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Ban created successfully.");

    let (status, json) = get_with_token(&server.router, "/bans/read/Spammer/info?type=name").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ip"], "1.2.3.4");
    assert_eq!(json["reason"], "chat spam");

    let (status, json) = get_with_token(&server.router, "/bans/destroy/1.2.3.4?type=ip").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Ban deleted successfully.");

    let (status, json) = get_with_token(&server.router, "/bans/destroy/1.2.3.4?type=ip").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "The specified ban does not exist.");
    assert!(server.bans.bans().is_empty());
}

#[tokio::test]
async fn test_ban_create_without_target() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/bans/create?reason=x").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Required parameters were missing from this API endpoint."
    );
}

#[tokio::test]
async fn test_ban_read_invalid_type() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/bans/read/Spammer/info?type=uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid Type");
}

// =============================================================================
// World
// =============================================================================

#[tokio::test]
async fn test_world_read() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/world/read").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Integration World");
    assert_eq!(json["size"], "8400*2400");
    assert_eq!(json["daytime"], true);
    assert_eq!(json["bloodmoon"], false);
}

#[tokio::test]
async fn test_world_meteor() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/world/meteor").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Meteor has been spawned.");
    assert_eq!(server.world.meteor_count(), 1);
}

#[tokio::test]
async fn test_world_bloodmoon() {
    let server = test_server();

    let (status, json) = get_with_token(&server.router, "/world/bloodmoon/true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Blood Moon has been set to true");
    assert!(server.world.snapshot().blood_moon);

    let (status, json) = get_with_token(&server.router, "/world/bloodmoon/sometimes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Unable to parse parameter.");
    assert!(server.world.snapshot().blood_moon);
}

// =============================================================================
// Players
// =============================================================================

#[tokio::test]
async fn test_player_list() {
    let server = test_server();
    let (_, json) = get_with_token(&server.router, "/lists/players").await;
    assert_eq!(json["players"], "Alice, Griefer");
}

#[tokio::test]
async fn test_player_read() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/players/read/griefer").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nickname"], "Griefer");
    assert_eq!(json["username"], "");
    assert_eq!(json["ip"], "10.0.0.66");
    assert_eq!(json["position"], "1024,300");
    assert_eq!(json["inventory"], "Iron Broadsword");
    assert_eq!(json["buffs"], "3");
}

#[tokio::test]
async fn test_player_read_not_found() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/players/read/Nobody").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Name Nobody was not found");
}

#[tokio::test]
async fn test_player_kick_with_reason() {
    let server = test_server();
    let (status, json) =
        get_with_token(&server.router, "/players/Griefer/kick?reason=be%20nice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Player Griefer was kicked");
    assert_eq!(
        server.players.kicks(),
        vec![("Griefer".to_string(), "be nice".to_string())]
    );
    assert_eq!(server.players.active_players().len(), 1);
}

#[tokio::test]
async fn test_player_ban() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/players/Griefer/ban").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Player Griefer was banned");

    let ban = server.bans.get_ban_by_ip("10.0.0.66").unwrap().unwrap();
    assert_eq!(ban.name, "Griefer");
    assert_eq!(ban.reason, "Banned via web");
    assert!(server.players.find_players("Griefer").is_empty());
}
