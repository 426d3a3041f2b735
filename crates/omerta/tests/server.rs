//! Integration tests for the Omerta server: full connection flow over
//! real WebSockets, both channels, from join to win.
//!
//! The question service is pointed at an unroutable address with a short
//! timeout, so every round lands on the fallback question unless a test
//! spawns the stub service.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use omerta::OmertaServer;
use omerta_question::QuestionConfig;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port, with question fetches failing fast
/// so rounds use the fallback question. Returns the address.
async fn start_server() -> String {
    start_server_with_question("http://127.0.0.1:1/question").await
}

async fn start_server_with_question(url: &str) -> String {
    let server = OmertaServer::builder()
        .bind("127.0.0.1:0")
        .question_config(QuestionConfig {
            url: url.to_string(),
            timeout: Duration::from_millis(200),
        })
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// One-shot HTTP stub standing in for the question service.
async fn spawn_question_stub(id: &str, text: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub should bind");
    let addr = listener.local_addr().expect("stub addr");
    let body = json!({ "id": id, "text": text }).to_string();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
            });
        }
    });

    format!("http://{addr}/question")
}

async fn connect_player(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/"))
        .await
        .expect("player should connect");
    ws
}

async fn connect_control(addr: &str) -> ClientWs {
    let (ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/control"))
            .await
            .expect("control should connect");
    ws
}

async fn send(ws: &mut ClientWs, event: serde_json::Value) {
    let bytes = serde_json::to_vec(&event).expect("encode");
    ws.send(Message::Binary(bytes.into())).await.expect("send");
}

async fn recv_event(ws: &mut ClientWs) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("websocket error");
    serde_json::from_slice(&msg.into_data()).expect("decode")
}

/// Reads frames until one with the given type tag arrives.
async fn recv_until(ws: &mut ClientWs, event_type: &str) -> serde_json::Value {
    for _ in 0..50 {
        let event = recv_event(ws).await;
        if event["type"] == event_type {
            return event;
        }
    }
    panic!("no {event_type} event within 50 frames");
}

/// Reads frames until a room_state listing `count` players arrives.
async fn recv_roster(ws: &mut ClientWs, count: usize) -> serde_json::Value {
    for _ in 0..50 {
        let event = recv_event(ws).await;
        if event["type"] == "room_state"
            && event["players"].as_array().map(Vec::len) == Some(count)
        {
            return event;
        }
    }
    panic!("no room_state with {count} players within 50 frames");
}

/// Asserts nothing arrives on the socket for `ms` milliseconds.
async fn expect_silence(ws: &mut ClientWs, ms: u64) {
    let result =
        tokio::time::timeout(Duration::from_millis(ms), ws.next()).await;
    match result {
        Err(_) => {} // timed out: nothing arrived
        Ok(frame) => panic!("expected silence, got {frame:?}"),
    }
}

/// Consumes the welcome event and returns the assigned player id.
async fn welcome(ws: &mut ClientWs) -> u64 {
    let event = recv_event(ws).await;
    assert_eq!(event["type"], "welcome");
    event["id"].as_u64().expect("welcome id")
}

/// Connects `count` players, joins them all, and drains every socket up
/// to the room_state showing the full roster. Returns (socket, id) pairs.
async fn roster_of(addr: &str, count: usize) -> Vec<(ClientWs, u64)> {
    let mut players = Vec::new();
    for i in 0..count {
        let mut ws = connect_player(addr).await;
        let id = welcome(&mut ws).await;
        send(&mut ws, json!({ "type": "join", "name": format!("player-{i}") }))
            .await;
        players.push((ws, id));
    }
    for (ws, _) in &mut players {
        recv_roster(ws, count).await;
    }
    players
}

/// Drains the start-of-game push set (role_info, mcq_question,
/// room_state, in that order) on every player socket. Returns the roles
/// in player order.
async fn drain_start(players: &mut [(ClientWs, u64)]) -> Vec<String> {
    let mut roles = Vec::new();
    for (ws, _) in players.iter_mut() {
        let info = recv_event(ws).await;
        assert_eq!(info["type"], "role_info");
        roles.push(info["role"].as_str().expect("role").to_owned());

        let question = recv_event(ws).await;
        assert_eq!(question["type"], "mcq_question");

        let state = recv_event(ws).await;
        assert_eq!(state["type"], "room_state");
        assert_eq!(state["phase"], "night");
    }
    roles
}

fn index_of(roles: &[String], role: &str) -> usize {
    roles
        .iter()
        .position(|r| r == role)
        .unwrap_or_else(|| panic!("no {role} among {roles:?}"))
}

// =========================================================================
// Connection and lobby
// =========================================================================

#[tokio::test]
async fn test_player_connect_receives_welcome() {
    let addr = start_server().await;
    let mut ws = connect_player(&addr).await;

    let id = welcome(&mut ws).await;
    assert!(id > 0);
}

#[tokio::test]
async fn test_control_connect_receives_welcome_then_empty_state() {
    let addr = start_server().await;
    let mut control = connect_control(&addr).await;

    welcome(&mut control).await;
    let state = recv_event(&mut control).await;
    assert_eq!(state["type"], "control_state");
    assert!(state["activeRoom"].is_null());
    assert_eq!(state["waitingCount"], 0);
    assert_eq!(state["waitingPlayers"], json!([]));
}

#[tokio::test]
async fn test_first_join_becomes_host() {
    let addr = start_server().await;
    let mut ws = connect_player(&addr).await;
    let id = welcome(&mut ws).await;

    send(&mut ws, json!({ "type": "join", "name": "Ana" })).await;

    let state = recv_event(&mut ws).await;
    assert_eq!(state["type"], "room_state");
    assert_eq!(state["roomId"], 1);
    assert_eq!(state["phase"], "lobby");
    assert_eq!(state["nightRound"], 0);
    assert_eq!(state["doctorEnabled"], false);

    let players = state["players"].as_array().expect("players");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["id"], id);
    assert_eq!(players[0]["name"], "Ana");
    assert_eq!(players[0]["alive"], true);
    assert_eq!(players[0]["isHost"], true);
}

#[tokio::test]
async fn test_join_without_name_gets_default() {
    let addr = start_server().await;
    let mut ws = connect_player(&addr).await;
    welcome(&mut ws).await;

    send(&mut ws, json!({ "type": "join" })).await;

    let state = recv_event(&mut ws).await;
    assert_eq!(state["type"], "room_state");
    assert_eq!(state["players"][0]["name"], "Player");
}

#[tokio::test]
async fn test_join_updates_control_state() {
    let addr = start_server().await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await; // initial control_state

    let mut ws = connect_player(&addr).await;
    welcome(&mut ws).await;
    send(&mut ws, json!({ "type": "join", "name": "Ana" })).await;
    recv_roster(&mut ws, 1).await;

    let state = recv_event(&mut control).await;
    assert_eq!(state["type"], "control_state");
    assert_eq!(state["activeRoom"]["players"][0]["name"], "Ana");
    assert_eq!(state["waitingCount"], 0);
}

#[tokio::test]
async fn test_second_join_on_same_connection_ignored() {
    let addr = start_server().await;
    let mut ws = connect_player(&addr).await;
    welcome(&mut ws).await;

    send(&mut ws, json!({ "type": "join", "name": "Ana" })).await;
    recv_roster(&mut ws, 1).await;

    // Same connection joining again is refused without a reply.
    send(&mut ws, json!({ "type": "join", "name": "Imposter" })).await;
    expect_silence(&mut ws, 300).await;
}

// =========================================================================
// Starting a game
// =========================================================================

#[tokio::test]
async fn test_start_game_deals_roles_and_asks_question() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;

    // Each player gets role_info, then the question, then the night
    // roster, in that order.
    let (ws, id) = &mut players[0];
    let info = recv_event(ws).await;
    assert_eq!(info["type"], "role_info");

    let question = recv_event(ws).await;
    assert_eq!(question["type"], "mcq_question");
    assert_eq!(question["questionId"], "q-1");
    assert_eq!(
        question["text"],
        "Who is most likely to survive a zombie apocalypse?"
    );
    let options = question["options"].as_array().expect("options");
    assert_eq!(options.len(), 3);
    assert!(options.iter().any(|o| o["id"] == *id));
    assert!(options.iter().all(|o| o["alive"] == true));

    let state = recv_event(ws).await;
    assert_eq!(state["type"], "room_state");
    assert_eq!(state["phase"], "night");
    assert_eq!(state["nightRound"], 1);

    // Exactly one godfather, no doctor while the toggle is off.
    let mut roles = vec![info["role"].as_str().expect("role").to_owned()];
    for (ws, _) in players.iter_mut().skip(1) {
        let info = recv_until(ws, "role_info").await;
        roles.push(info["role"].as_str().expect("role").to_owned());
    }
    assert_eq!(roles.iter().filter(|r| *r == "godfather").count(), 1);
    assert_eq!(roles.iter().filter(|r| *r == "doctor").count(), 0);
    assert_eq!(roles.iter().filter(|r| *r == "villager").count(), 2);

    let state = recv_until(&mut control, "control_state").await;
    assert_eq!(state["activeRoom"]["phase"], "night");
}

#[tokio::test]
async fn test_start_below_minimum_is_silently_refused() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 2).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    expect_silence(&mut control, 300).await;
    expect_silence(&mut players[0].0, 300).await;

    // The lobby is still live: a third player joins and start succeeds.
    let mut ws3 = connect_player(&addr).await;
    let id3 = welcome(&mut ws3).await;
    send(&mut ws3, json!({ "type": "join", "name": "Cara" })).await;
    recv_roster(&mut ws3, 3).await;
    players.push((ws3, id3));
    for (ws, _) in players.iter_mut().take(2) {
        recv_roster(ws, 3).await;
    }
    let _ = recv_until(&mut control, "control_state").await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let roles = drain_start(&mut players).await;
    assert_eq!(roles.iter().filter(|r| *r == "godfather").count(), 1);
}

// =========================================================================
// Night resolution
// =========================================================================

#[tokio::test]
async fn test_night_kill_resolves_to_day() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 4).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let roles = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    let gf = index_of(&roles, "godfather");
    let victim_idx = (0..players.len())
        .find(|&i| i != gf)
        .expect("someone to kill");
    let victim = players[victim_idx].1;

    // The kill itself produces no broadcast.
    send(&mut players[gf].0, json!({ "type": "night_kill", "targetId": victim }))
        .await;
    expect_silence(&mut players[gf].0, 300).await;

    send(&mut control, json!({ "type": "control_end_night" })).await;

    for (ws, _) in players.iter_mut() {
        let result = recv_event(ws).await;
        assert_eq!(result["type"], "night_result");
        assert_eq!(result["roomId"], 1);
        assert_eq!(result["killedId"], victim);
        assert!(result["winner"].is_null());

        let change = recv_event(ws).await;
        assert_eq!(change["type"], "phase_change");
        assert_eq!(change["phase"], "day");

        let state = recv_event(ws).await;
        assert_eq!(state["type"], "room_state");
        assert_eq!(state["phase"], "day");
        let dead = state["players"]
            .as_array()
            .expect("players")
            .iter()
            .find(|p| p["id"] == victim)
            .expect("victim in roster");
        assert_eq!(dead["alive"], false);
    }

    let state = recv_until(&mut control, "control_state").await;
    assert_eq!(state["activeRoom"]["phase"], "day");
}

#[tokio::test]
async fn test_kill_that_tips_the_balance_ends_the_game() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let roles = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    let gf = index_of(&roles, "godfather");
    let victim_idx = index_of(&roles, "villager");
    let victim = players[victim_idx].1;

    send(&mut players[gf].0, json!({ "type": "night_kill", "targetId": victim }))
        .await;
    send(&mut control, json!({ "type": "control_end_night" })).await;

    // One mafia against one villager: mafia wins. No phase_change
    // follows a decided game; the ended phase arrives via room_state.
    for (ws, _) in players.iter_mut() {
        let result = recv_event(ws).await;
        assert_eq!(result["type"], "night_result");
        assert_eq!(result["killedId"], victim);
        assert_eq!(result["winner"], "mafia");

        let state = recv_event(ws).await;
        assert_eq!(state["type"], "room_state");
        assert_eq!(state["phase"], "ended");
    }

    let state = recv_until(&mut control, "control_state").await;
    assert_eq!(state["activeRoom"]["phase"], "ended");
}

#[tokio::test]
async fn test_doctor_save_nullifies_the_kill() {
    let addr = start_server().await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(
        &mut control,
        json!({ "type": "control_set_doctor_enabled", "enabled": true }),
    )
    .await;
    let state = recv_event(&mut control).await;
    assert_eq!(state["type"], "control_state");
    assert_eq!(state["activeRoom"]["doctorEnabled"], true);

    let mut players = roster_of(&addr, 3).await;
    for _ in 0..3 {
        let _ = recv_until(&mut control, "control_state").await;
    }

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let roles = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    let gf = index_of(&roles, "godfather");
    let doctor = index_of(&roles, "doctor");
    let victim = players[index_of(&roles, "villager")].1;

    send(&mut players[gf].0, json!({ "type": "night_kill", "targetId": victim }))
        .await;
    send(
        &mut players[doctor].0,
        json!({ "type": "night_save", "targetId": victim }),
    )
    .await;
    send(&mut control, json!({ "type": "control_end_night" })).await;

    for (ws, _) in players.iter_mut() {
        let result = recv_event(ws).await;
        assert_eq!(result["type"], "night_result");
        assert!(result["killedId"].is_null());
        assert!(result["winner"].is_null());

        let change = recv_event(ws).await;
        assert_eq!(change["type"], "phase_change");
        assert_eq!(change["phase"], "day");

        let state = recv_event(ws).await;
        assert_eq!(state["type"], "room_state");
        let all_alive = state["players"]
            .as_array()
            .expect("players")
            .iter()
            .all(|p| p["alive"] == true);
        assert!(all_alive);
    }
}

#[tokio::test]
async fn test_kill_from_non_godfather_is_ignored() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let roles = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    let villager = index_of(&roles, "villager");
    let gf_id = players[index_of(&roles, "godfather")].1;

    // A villager has no kill. The attempt is dropped and the night
    // resolves with nobody dead.
    send(
        &mut players[villager].0,
        json!({ "type": "night_kill", "targetId": gf_id }),
    )
    .await;
    send(&mut control, json!({ "type": "control_end_night" })).await;

    let result = recv_event(&mut players[villager].0).await;
    assert_eq!(result["type"], "night_result");
    assert!(result["killedId"].is_null());
    assert!(result["winner"].is_null());
}

// =========================================================================
// Question rounds
// =========================================================================

#[tokio::test]
async fn test_question_comes_from_the_service_when_it_answers() {
    let url = spawn_question_stub("q-custom-7", "Who laughs last?").await;
    let addr = start_server_with_question(&url).await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;

    let (ws, _) = &mut players[0];
    let question = recv_until(ws, "mcq_question").await;
    assert_eq!(question["questionId"], "q-custom-7");
    assert_eq!(question["text"], "Who laughs last?");
}

#[tokio::test]
async fn test_next_night_brings_a_fresh_question() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 4).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let roles = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    let gf = index_of(&roles, "godfather");
    let victim_idx = (0..players.len())
        .find(|&i| i != gf)
        .expect("someone to kill");
    let victim = players[victim_idx].1;

    send(&mut players[gf].0, json!({ "type": "night_kill", "targetId": victim }))
        .await;
    send(&mut control, json!({ "type": "control_end_night" })).await;
    for (ws, _) in players.iter_mut() {
        recv_until(ws, "room_state").await;
    }
    let _ = recv_until(&mut control, "control_state").await;

    send(&mut control, json!({ "type": "control_start_next_night" })).await;

    // The dead stay wired in: assert on the victim's own socket.
    let (ws, _) = &mut players[victim_idx];
    let change = recv_event(ws).await;
    assert_eq!(change["type"], "phase_change");
    assert_eq!(change["phase"], "night");

    let question = recv_event(ws).await;
    assert_eq!(question["type"], "mcq_question");
    assert_eq!(question["questionId"], "q-2");

    let state = recv_event(ws).await;
    assert_eq!(state["type"], "room_state");
    assert_eq!(state["phase"], "night");
    assert_eq!(state["nightRound"], 2);
}

#[tokio::test]
async fn test_mcq_answer_is_accepted_without_a_broadcast() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let _ = drain_start(&mut players).await;

    let target = players[1].1;
    send(
        &mut players[0].0,
        json!({ "type": "mcq_answer", "questionId": "q-1", "targetId": target }),
    )
    .await;
    expect_silence(&mut players[0].0, 300).await;

    send(&mut players[0].0, json!({ "type": "ping" })).await;
    let event = recv_event(&mut players[0].0).await;
    assert_eq!(event["type"], "pong");
}

// =========================================================================
// Waiting pool and reset
// =========================================================================

#[tokio::test]
async fn test_late_join_parks_in_the_waiting_pool() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let _ = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    // Joining mid-game lands in the pool, not the roster.
    let mut late1 = connect_player(&addr).await;
    welcome(&mut late1).await;
    send(&mut late1, json!({ "type": "join", "name": "Late-1" })).await;
    let count = recv_event(&mut late1).await;
    assert_eq!(count["type"], "waiting_count");
    assert_eq!(count["count"], 1);

    // A second late joiner bumps the count for everyone waiting.
    let mut late2 = connect_player(&addr).await;
    welcome(&mut late2).await;
    send(&mut late2, json!({ "type": "join", "name": "Late-2" })).await;
    let count = recv_event(&mut late2).await;
    assert_eq!(count["count"], 2);
    let count = recv_event(&mut late1).await;
    assert_eq!(count["type"], "waiting_count");
    assert_eq!(count["count"], 2);

    // One control_state per join; the second carries the full pool.
    let _ = recv_until(&mut control, "control_state").await;
    let state = recv_until(&mut control, "control_state").await;
    assert_eq!(state["waitingCount"], 2);
    let names: Vec<&str> = state["waitingPlayers"]
        .as_array()
        .expect("waiting players")
        .iter()
        .map(|p| p["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Late-1", "Late-2"]);
}

#[tokio::test]
async fn test_reset_clears_the_room_and_the_pool() {
    let addr = start_server().await;
    let mut players = roster_of(&addr, 3).await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    send(&mut control, json!({ "type": "control_start_game" })).await;
    let _ = drain_start(&mut players).await;
    let _ = recv_until(&mut control, "control_state").await;

    let mut late = connect_player(&addr).await;
    welcome(&mut late).await;
    send(&mut late, json!({ "type": "join", "name": "Late" })).await;
    recv_until(&mut late, "waiting_count").await;
    for (ws, _) in players.iter_mut() {
        recv_until(ws, "room_state").await;
    }
    let _ = recv_until(&mut control, "control_state").await;

    send(&mut control, json!({ "type": "control_reset_game" })).await;
    let state = recv_event(&mut control).await;
    assert_eq!(state["type"], "control_state");
    assert!(state["activeRoom"].is_null());
    assert_eq!(state["waitingCount"], 0);

    // Former players are forgotten: the same connection can join fresh
    // and becomes the new host.
    send(&mut players[0].0, json!({ "type": "join", "name": "Again" })).await;
    let state = recv_event(&mut players[0].0).await;
    assert_eq!(state["type"], "room_state");
    assert_eq!(state["phase"], "lobby");
    assert_eq!(state["players"][0]["name"], "Again");
    assert_eq!(state["players"][0]["isHost"], true);

    // The ex-waiting player is out of the pool and hears nothing.
    expect_silence(&mut late, 300).await;
}

// =========================================================================
// Robustness
// =========================================================================

#[tokio::test]
async fn test_unparseable_player_frames_are_ignored() {
    let addr = start_server().await;
    let mut ws = connect_player(&addr).await;
    welcome(&mut ws).await;

    // Garbage bytes, an unknown tag, and a control-only command: all
    // dropped without an answer.
    ws.send(Message::Binary(b"not json".to_vec().into()))
        .await
        .expect("send");
    send(&mut ws, json!({ "type": "launch_missiles" })).await;
    send(&mut ws, json!({ "type": "control_start_game" })).await;

    send(&mut ws, json!({ "type": "ping" })).await;
    let event = recv_event(&mut ws).await;
    assert_eq!(event["type"], "pong");
}

#[tokio::test]
async fn test_player_command_without_prefix_is_not_a_control_command() {
    let addr = start_server().await;
    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;

    // "start_game" without the control_ prefix does not decode.
    send(&mut control, json!({ "type": "start_game" })).await;
    expect_silence(&mut control, 300).await;

    send(&mut control, json!({ "type": "ping" })).await;
    let event = recv_event(&mut control).await;
    assert_eq!(event["type"], "pong");
}

#[tokio::test]
async fn test_ping_pong_on_both_channels() {
    let addr = start_server().await;

    let mut ws = connect_player(&addr).await;
    welcome(&mut ws).await;
    send(&mut ws, json!({ "type": "ping" })).await;
    assert_eq!(recv_event(&mut ws).await["type"], "pong");

    let mut control = connect_control(&addr).await;
    welcome(&mut control).await;
    let _ = recv_event(&mut control).await;
    send(&mut control, json!({ "type": "ping" })).await;
    assert_eq!(recv_event(&mut control).await["type"], "pong");
}
