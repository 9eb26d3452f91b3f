use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn board_cmd(file: &NamedTempFile) -> Command {
    let mut cmd = Command::new(cargo_bin!("prizeboard"));
    cmd.arg(file.path()).arg("--guard").arg("judge");
    cmd
}

#[test]
fn test_award_flow() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, caller, id, amount, link, description").unwrap();
    writeln!(file, "submit, alice, , , github.com/a/1,").unwrap();
    writeln!(file, "submit, bob, , , github.com/b/1,").unwrap();
    writeln!(file, "fund, carol, , 100.0, ,").unwrap();
    writeln!(file, "award, judge, 0, 40.0, ,").unwrap();

    // Expected: submission 0 finalized, submission 1 untouched, pool at 60.
    board_cmd(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("0,alice,github.com/a/1"))
        .stdout(predicate::str::contains(",true"))
        .stdout(predicate::str::contains("1,bob,github.com/b/1"))
        .stderr(predicate::str::contains("pool balance: 60"));
}

#[test]
fn test_double_award_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, caller, id, amount, link, description").unwrap();
    writeln!(file, "submit, alice, , , github.com/a/1,").unwrap();
    writeln!(file, "fund, carol, , 100.0, ,").unwrap();
    writeln!(file, "award, judge, 0, 10.0, ,").unwrap();
    writeln!(file, "award, judge, 0, 10.0, ,").unwrap(); // Same submission again

    // Expected: only the first award is paid, so 100 - 10 = 90 remains.
    board_cmd(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("already finalized"))
        .stderr(predicate::str::contains("pool balance: 90"));
}

#[test]
fn test_award_exceeding_pool_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, caller, id, amount, link, description").unwrap();
    writeln!(file, "submit, alice, , , github.com/a/1,").unwrap();
    writeln!(file, "fund, carol, , 30.0, ,").unwrap();
    writeln!(file, "award, judge, 0, 31.0, ,").unwrap(); // One over

    // Expected: submission stays pending and the pool keeps its 30.
    board_cmd(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("insufficient funds"))
        .stdout(predicate::str::contains(",false"))
        .stdout(predicate::str::contains(",true").not())
        .stderr(predicate::str::contains("pool balance: 30"));
}

#[test]
fn test_award_unknown_submission_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, caller, id, amount, link, description").unwrap();
    writeln!(file, "fund, carol, , 50.0, ,").unwrap();
    writeln!(file, "award, judge, 999, 10.0, ,").unwrap(); // Non-existent id

    board_cmd(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("pool balance: 50"));
}

#[test]
fn test_withdraw_flow() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, caller, id, amount, link, description").unwrap();
    writeln!(file, "fund, carol, , 100.0, ,").unwrap();
    writeln!(file, "withdraw, mallory, , 25.0, ,").unwrap(); // Rejected
    writeln!(file, "withdraw, judge, , 25.0, ,").unwrap();

    // Expected: only the guard's withdrawal lands, 100 - 25 = 75.
    board_cmd(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("not the guard"))
        .stderr(predicate::str::contains("pool balance: 75"));
}
