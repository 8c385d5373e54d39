use assert_cmd::prelude::*;
use assert_fs::{
    fixture::{FileWriteStr, PathChild},
    TempDir,
};
use std::process::Command;

// We check the --help output in order to confirm that the clap cli is setup correctly.
// Any arguments that are incorrectly set up will cause clap to panic regardless of the
// arguments or options provided.
#[test]
fn check_clap_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bookrank")?;

    cmd.arg("--help");
    cmd.assert().success();

    Ok(())
}

fn stdout_of(cmd: &mut Command) -> Result<String, Box<dyn std::error::Error>> {
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(String::from_utf8(output)?)
}

fn stderr_on_failure(cmd: &mut Command) -> Result<String, Box<dyn std::error::Error>> {
    let output = cmd.assert().code(2).get_output().stderr.clone();
    Ok(String::from_utf8(output)?)
}

fn credential_dir() -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    dir.child("id").write_str("AKIAEXAMPLE\n")?;
    dir.child("key").write_str("secret\n")?;
    Ok(dir)
}

fn bookrank_with(dir: &TempDir) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bookrank")?;
    cmd.arg("--id-file")
        .arg(dir.child("id").path())
        .arg("--key-file")
        .arg(dir.child("key").path());
    Ok(cmd)
}

#[test]
fn validate_isbn13_shows_isbn10() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bookrank")?;

    cmd.args(["validate-isbn", "978-0-306-40615-7"]);
    let stdout = stdout_of(&mut cmd)?;
    assert!(stdout.contains("ISBN: 9780306406157"));
    assert!(stdout.contains("ISBN10: 0306406152"));

    Ok(())
}

#[test]
fn validate_isbn_suggests_correction() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bookrank")?;

    cmd.args(["validate-isbn", "1573980136"]);
    let stdout = stdout_of(&mut cmd)?;
    assert!(stdout.contains("Corrected ISBN: 1573980137"));

    Ok(())
}

#[test]
fn encode_prints_signed_url() -> Result<(), Box<dyn std::error::Error>> {
    let dir = credential_dir()?;
    let mut cmd = bookrank_with(&dir)?;

    cmd.args(["encode", "1-57398-013-7"]);
    let stdout = stdout_of(&mut cmd)?;
    assert!(stdout.starts_with("http://webservices.amazon.com/onca/xml?"));
    assert!(stdout.contains("AWSAccessKeyId=AKIAEXAMPLE"));
    assert!(stdout.contains("ItemId=1573980137"));
    assert!(stdout.contains("&Signature="));

    Ok(())
}

#[test]
fn invalid_isbn_exits_with_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = credential_dir()?;
    let mut cmd = bookrank_with(&dir)?;

    cmd.args(["encode", "12345"]);
    assert!(stderr_on_failure(&mut cmd)?.contains("wrong length"));

    Ok(())
}

#[test]
fn quiet_batch_needs_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = credential_dir()?;
    let list = dir.child("isbns.txt");
    list.write_str("1573980137\n")?;
    let mut cmd = bookrank_with(&dir)?;

    cmd.arg("batch").arg(list.path()).arg("--quiet");
    assert!(stderr_on_failure(&mut cmd)?.contains("nothing to do"));

    Ok(())
}

#[test]
fn verify_reports_missing_credential_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut cmd = bookrank_with(&dir)?;

    cmd.arg("verify");
    assert!(stderr_on_failure(&mut cmd)?.contains("Cannot find amazon id file"));

    Ok(())
}
