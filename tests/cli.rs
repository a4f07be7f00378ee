mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_cli_groups_lists_sorted_groups() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("pack.zip");
    common::sample_pack(&archive)?;

    let mut cmd = Command::cargo_bin("modpack-loader")?;
    cmd.arg("groups").arg(&archive);
    cmd.assert().success().stdout("alpha\nbeta\ngamma\n");

    Ok(())
}

#[test]
fn test_cli_install_replaces_mandatory_content() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("pack.zip");
    common::sample_pack(&archive)?;
    let game = dir.path().join("game");

    // Leftovers from a previous install: stale mods go, user files stay.
    fs::create_dir_all(game.join("mods"))?;
    fs::write(game.join("mods/old.jar"), b"old")?;
    fs::write(game.join("servers.dat"), b"keep me")?;

    let mut cmd = Command::cargo_bin("modpack-loader")?;
    cmd.arg("install")
        .arg(&archive)
        .arg("--groups")
        .arg("beta,nonexistent")
        .arg("--dest")
        .arg(&game)
        .arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Done!"));

    assert!(!game.join("mods/old.jar").exists());
    assert_eq!(fs::read(game.join("mods/foo.jar"))?, b"foo-jar-bytes");
    assert_eq!(fs::read(game.join("shaderpacks/fancy.zip"))?, b"shaders");
    assert!(!game.join("config").exists());
    assert_eq!(fs::read(game.join("servers.dat"))?, b"keep me");
    // Local archives are used in place, never deleted.
    assert!(archive.exists());

    Ok(())
}

#[test]
fn test_cli_plan_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("pack.zip");
    common::sample_pack(&archive)?;
    let game = dir.path().join("game");

    let mut cmd = Command::cargo_bin("modpack-loader")?;
    cmd.arg("plan").arg(&archive).arg("--all").arg("--dest").arg(&game);
    cmd.assert().success().stdout(
        predicate::str::contains("modpack/optional/alpha/config/settings.json -> ")
            .and(predicate::str::contains("modpack/mods/foo.jar -> "))
            .and(predicate::str::contains("5 files"))
            .and(predicate::str::contains("readme.txt").not()),
    );
    assert!(!game.exists());

    Ok(())
}

#[test]
fn test_cli_missing_archive_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let mut cmd = Command::cargo_bin("modpack-loader")?;
    cmd.arg("install")
        .arg(dir.path().join("missing.zip"))
        .arg("--dest")
        .arg(dir.path().join("game"))
        .arg("--quiet");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot open archive"));

    Ok(())
}

#[test]
fn test_cli_menu_installs_local_archive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let game = dir.path().join("game");
    fs::create_dir_all(&game)?;
    common::sample_pack(&game.join("test.zip"))?;

    // The catalog pack's file name matches the archive already on disk, so the
    // menu offers it as item 2 (local) after the remote item 1.
    let catalog = dir.path().join("packs.json");
    fs::write(&catalog, r#"{"packs":[{"name":"Test pack","url":"http://127.0.0.1:9/test.zip"}]}"#)?;

    let mut cmd = Command::cargo_bin("modpack-loader")?;
    cmd.arg("--dest")
        .arg(&game)
        .arg("--catalog")
        .arg(&catalog)
        .write_stdin("7\n\n2\n1,9\n\n");
    cmd.assert().success().stdout(
        predicate::str::contains("1) Test pack")
            .and(predicate::str::contains("test.zip (local)"))
            .and(predicate::str::contains("Invalid input."))
            .and(predicate::str::contains("Number out of range: 9"))
            .and(predicate::str::contains("Done!")),
    );

    assert_eq!(fs::read_to_string(game.join("config/settings.json"))?, "{\"alpha\":true}");
    assert!(!game.join("options.txt").exists());

    Ok(())
}
