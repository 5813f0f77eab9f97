//! Integration tests for the hold, heartbeat, commit, list, and sweep commands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_hold_prints_seat_view() {
    let env = TestEnv::new();
    env.init();

    let view = env.json({
        let mut cmd = env.as_client("tok1");
        cmd.args(["hold", "1"]);
        cmd
    });
    assert_eq!(view["id"], 1);
    assert_eq!(view["label"], "A1");
    assert_eq!(view["status"], "HELD");
    assert_eq!(view["heldByMe"], true);
    assert!(view["holdExpiresAt"].is_string());
}

#[test]
fn test_full_flow_across_clients() {
    let env = TestEnv::new();
    env.init();

    env.as_client("tok1").args(["hold", "1"]).assert().success();

    let body = env.error_body(
        {
            let mut cmd = env.as_client("tok2");
            cmd.args(["hold", "1"]);
            cmd
        },
        1,
    );
    assert_eq!(body["code"], "SEAT_HELD_BY_OTHERS");
    assert_eq!(body["message"], "Seat(1) is held by another client.");

    let view = env.json({
        let mut cmd = env.as_client("tok1");
        cmd.args(["heartbeat", "1"]);
        cmd
    });
    assert_eq!(view["heldByMe"], true);

    let summary = env.json({
        let mut cmd = env.as_client("tok1");
        cmd.args(["commit", "1", "--name", "Kim", "--phone", "010-0000-0000"]);
        cmd
    });
    assert_eq!(summary["seatId"], 1);
    assert_eq!(summary["name"], "Kim");
    assert!(summary["reservedAt"].is_string());

    let body = env.error_body(
        {
            let mut cmd = env.as_client("tok3");
            cmd.args(["hold", "1"]);
            cmd
        },
        1,
    );
    assert_eq!(body["code"], "SEAT_ALREADY_RESERVED");
}

#[test]
fn test_retried_commit_prints_same_summary() {
    let env = TestEnv::new();
    env.init();
    env.as_client("tok1").args(["hold", "2"]).assert().success();

    let commit = || {
        let mut cmd = env.as_client("tok1");
        cmd.args(["commit", "2", "--name", "Kim", "--phone", "010-0000-0000"]);
        cmd
    };
    let first = env.json(commit());
    let second = env.json(commit());
    assert_eq!(first, second);

    let conn = rusqlite::Connection::open(env.database_path()).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_list_json_marks_own_holds() {
    let env = TestEnv::new();
    env.init();
    env.as_client("tok1").args(["hold", "3"]).assert().success();

    let seats = env.json({
        let mut cmd = env.as_client("tok1");
        cmd.args(["list", "--format", "json"]);
        cmd
    });
    let seats = seats.as_array().unwrap();
    assert_eq!(seats.len(), 9);
    assert_eq!(seats[2]["heldByMe"], true);
    assert_eq!(seats[0]["status"], "AVAILABLE");

    let anonymous = env.json({
        let mut cmd = env.command();
        cmd.args(["list", "--format", "json"]);
        cmd
    });
    assert_eq!(anonymous[2]["status"], "HELD");
    assert_eq!(anonymous[2]["heldByMe"], false);
}

#[test]
fn test_list_table() {
    let env = TestEnv::new();
    env.init();

    env.command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID\tLABEL\tSTATUS"))
        .stdout(predicate::str::contains("1\tA1\tAVAILABLE\t-\t-"));
}

#[test]
fn test_sweep_with_short_ttl() {
    let env = TestEnv::new();
    env.init();

    env.as_client("tok1")
        .env("SEATHOLD_HOLD_TTL_SECONDS", "1")
        .args(["hold", "1"])
        .assert()
        .success();
    std::thread::sleep(std::time::Duration::from_millis(1100));

    env.command()
        .arg("sweep")
        .assert()
        .success()
        .stdout("1\n");
    env.command()
        .arg("sweep")
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_reservations_csv() {
    let env = TestEnv::new();
    env.init();
    env.as_client("tok1").args(["hold", "1"]).assert().success();
    env.as_client("tok1")
        .args(["commit", "1", "--name", "Kim", "--phone", "010-0000-0000"])
        .assert()
        .success();

    env.command()
        .args(["reservations", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,seat_id,name,phone,reserved_at"))
        .stdout(predicate::str::contains(",1,Kim,010-0000-0000,"));
}

#[test]
fn test_forced_failure_releases_seat() {
    let env = TestEnv::new();
    env.init();
    env.as_client("tok1").args(["hold", "1"]).assert().success();

    let body = env.error_body(
        {
            let mut cmd = env.as_client("tok1");
            cmd.env("SEATHOLD_FAILURE_RATE", "1")
                .args(["commit", "1", "--name", "Kim", "--phone", "010-0000-0000"]);
            cmd
        },
        1,
    );
    assert_eq!(body["code"], "INTENTIONAL_FAILURE");

    let seats = env.json({
        let mut cmd = env.command();
        cmd.args(["list", "--format", "json"]);
        cmd
    });
    assert_eq!(seats[0]["status"], "AVAILABLE");
}
