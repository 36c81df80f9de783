//! Binary-level tests for argument handling and exit codes

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

fn linear_mcp() -> Result<Command> {
    let mut cmd = Command::cargo_bin("linear-mcp")?;
    cmd.env_remove("LINEAR_API_KEY").env("NO_COLOR", "1");
    Ok(cmd)
}

#[test]
fn test_no_subcommand_prints_help() -> Result<()> {
    linear_mcp()?
        .assert()
        .success()
        .stdout(predicate::str::contains("serve").and(predicate::str::contains("stale")));
    Ok(())
}

#[test]
fn test_stale_help_lists_flags() -> Result<()> {
    linear_mcp()?
        .args(["stale", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--months")
                .and(predicate::str::contains("--include-archived"))
                .and(predicate::str::contains("--no-initiative-only"))
                .and(predicate::str::contains("--limit")),
        );
    Ok(())
}

#[test]
fn test_stale_without_api_key_fails() -> Result<()> {
    linear_mcp()?
        .arg("stale")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("LINEAR_API_KEY"));
    Ok(())
}

#[test]
fn test_stale_rejects_unknown_format() -> Result<()> {
    linear_mcp()?
        .args(["stale", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
    Ok(())
}
