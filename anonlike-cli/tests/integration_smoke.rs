//! Smoke tests for the anonlike binary

use assert_cmd::Command;
use predicates::prelude::*;

fn anonlike() -> Command {
    let mut cmd = Command::cargo_bin("anonlike").unwrap();
    cmd.env_remove("SUPABASE_DB_URL")
        .env_remove("DATABASE_URL")
        .env_remove("LIKE_RESPONSE_STYLE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_serve() {
    anonlike()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_serve_help() {
    anonlike()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--style"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let dir = std::env::temp_dir();

    anonlike()
        .current_dir(dir)
        .arg("serve")
        .arg("--bind")
        .arg("127.0.0.1:0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_DB_URL"));
}

#[test]
fn test_serve_rejects_unknown_style() {
    anonlike()
        .arg("serve")
        .arg("--style")
        .arg("loud")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown response style"));
}
