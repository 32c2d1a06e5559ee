// Tests for output formatting
//
// Human renderings are checked line by line; machine formats only need to
// round through serde.

use super::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_players() -> Vec<Player> {
    serde_json::from_value(json!([
        {"_id": "p1", "name": "Lio", "nickname": "Pulga", "rating": 1200.4, "gamesPlayed": 12},
        {"_id": "p2", "name": "Dibu", "contextMembership": {"membershipId": "m2", "rating": 1105.0}}
    ]))
    .unwrap()
}

#[test]
fn test_players_human_table() {
    let rendered = OutputFormat::Human.format_players(&sample_players()).unwrap();
    let lines = rendered.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ID"));
    assert!(lines[0].contains("RATING"));
    assert!(lines[1].contains("┼"));
    assert!(lines[2].contains("Pulga"));
    assert!(lines[2].contains("1200"));
    assert!(lines[3].contains("1105"));
    assert!(lines[3].contains("-"));
}

#[test]
fn test_empty_listings() {
    assert_eq!(OutputFormat::Human.format_players(&[]).unwrap(), "No players.\n");
    assert_eq!(OutputFormat::Human.format_groups(&[]).unwrap(), "No groups.\n");
    assert_eq!(OutputFormat::Human.format_matches(&[]).unwrap(), "No matches.\n");
}

#[test]
fn test_players_json_keeps_wire_names() {
    let rendered = OutputFormat::Json.format_players(&sample_players()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value[0]["_id"], "p1");
    assert_eq!(value[1]["contextMembership"]["rating"], 1105.0);
}

#[test]
fn test_groups_human_roles() {
    let groups: Vec<Group> = serde_json::from_value(json!([
        {"_id": "g1", "name": "Grupo A", "players": ["p1", "p2"], "isOwner": true},
        {"_id": "g2", "name": "Jueves", "description": "5v5", "isMember": true}
    ]))
    .unwrap();

    let rendered = OutputFormat::Human.format_groups(&groups).unwrap();
    assert!(rendered.contains("owner"));
    assert!(rendered.contains("member"));
    assert!(rendered.contains("5v5"));
}

#[test]
fn test_matches_human_score_and_status() {
    let matches: Vec<Match> = serde_json::from_value(json!([{
        "_id": "m1",
        "groupId": "g1",
        "participants": ["p1", "p2", "p3", "p4"],
        "status": "finalized",
        "scheduledAt": "2024-01-01T10:00:00.000Z",
        "result": {"scoreA": 3, "scoreB": 2}
    }]))
    .unwrap();

    let rendered = OutputFormat::Human.format_matches(&matches).unwrap();
    assert!(rendered.contains("2024-01-01 10:00"));
    assert!(rendered.contains("finalized"));
    assert!(rendered.contains("3 - 2"));
}

#[test]
fn test_teams_human() {
    let teams = vec![
        Team {
            name: "A".to_string(),
            players: vec!["p1".to_string(), "p2".to_string()],
            score: 14.5,
        },
        Team {
            name: "B".to_string(),
            players: vec!["p3".to_string()],
            score: 13.0,
        },
    ];

    let rendered = OutputFormat::Human.format_teams(&teams).unwrap();
    assert_eq!(rendered, "A (score 14.5)\n  - p1\n  - p2\nB (score 13.0)\n  - p3\n");
}

#[test]
fn test_writer_quiet_suppresses_messages_but_not_data() {
    let (mut out, buffer) = writer(OutputFormat::Human, true);
    out.info("hidden").unwrap();
    out.success("hidden too").unwrap();
    out.data(&json!({"ok": true})).unwrap();

    let contents = buffer.contents();
    assert!(!contents.contains("hidden"));
    assert!(contents.contains("\"ok\": true"));
}

#[test]
fn test_writer_machine_formats_skip_messages() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.info("Signing in").unwrap();
    out.section("Players").unwrap();
    out.data(&json!({"token": "abc"})).unwrap();

    assert_eq!(buffer.contents(), "{\"token\":\"abc\"}\n");
}

#[test]
fn test_writer_plain_prefixes() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.info("Signing in").unwrap();
    out.warning("Session expired").unwrap();
    out.section("Teams").unwrap();

    let contents = buffer.contents();
    assert!(contents.contains("INFO: Signing in"));
    assert!(contents.contains("WARNING: Session expired"));
    assert!(contents.contains("=== Teams ==="));
}

#[test]
fn test_writer_table() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.table(
        &["KEY", "VALUE"],
        vec![vec!["base_url".to_string(), "http://localhost:3000/api".to_string()]],
    )
    .unwrap();

    let contents = buffer.contents();
    assert!(contents.starts_with("KEY"));
    assert!(contents.contains("base_url │ http://localhost:3000/api"));
}

#[test]
fn test_spinner_disabled_for_custom_writer() {
    let (out, _buffer) = writer(OutputFormat::Human, false);
    assert!(out.spinner("Loading").is_none());
}

#[test]
fn test_quiet_mode_never_shows_progress() {
    assert!(!progress_enabled(true));

    let out = OutputWriter::new(OutputFormat::Human, false, true);
    assert!(out.spinner("Loading").is_none());
}
