//! End-to-end tests for `soundboard export` and `soundboard import`.

mod fixtures;
use fixtures::*;

use std::fs;

/// A store with profile "Work" holding one sound bound to F2.
fn env_with_work_profile() -> TestEnv {
    let env = TestEnv::new();
    let horn = env.wav("horn.wav");
    env.run_ok(&["profile", "create", "Work"]);
    env.run_ok(&["sound", "add", "Horn", horn.to_str().unwrap(), "--key", "F2"]);
    env
}

#[test]
fn test_export_writes_single_profile() {
    let env = env_with_work_profile();
    let out = env.dir.path().join("work.json");

    env.run_ok(&["export", "--profile", "Work", out.to_str().unwrap()]);

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["version"], 1);
    let profiles = doc["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], "Work");
    assert_eq!(profiles[0]["sounds"][0]["name"], "Horn");
    assert_eq!(profiles[0]["sounds"][0]["key"], "F2");
}

#[test]
fn test_export_unknown_profile_fails() {
    let env = TestEnv::new();
    let out = env.dir.path().join("x.json");
    let output = env.run(&["export", "--profile", "Nope", out.to_str().unwrap()]);
    assert_exit(&output, 1, "unknown profile");
    assert!(!out.exists());
}

#[test]
fn test_import_into_other_store() {
    let source = env_with_work_profile();
    let out = source.dir.path().join("work.json");
    source.run_ok(&["export", "--profile", "Work", out.to_str().unwrap()]);

    let target = TestEnv::new();
    let stdout = target.run_ok(&["import", out.to_str().unwrap()]);
    assert!(stdout.contains("Imported 1 profile(s): Work"), "{stdout}");

    let result = target.run_json(&["profile", "list", "--json"]);
    assert_eq!(result["active"], "Work");
    let sounds = target.run_json(&["sound", "list", "--json"]);
    assert_eq!(sounds["sounds"][0]["key"], "F2");
}

#[test]
fn test_import_existing_profile_needs_overwrite() {
    let env = env_with_work_profile();
    let out = env.dir.path().join("work.json");
    env.run_ok(&["export", "--profile", "Work", out.to_str().unwrap()]);
    env.run_ok(&["sound", "remove", "Horn", "--profile", "Work"]);

    let output = env.run(&["import", out.to_str().unwrap()]);
    assert_exit(&output, 1, "profile exists");

    env.run_ok(&["import", out.to_str().unwrap(), "--overwrite"]);
    let sounds = env.run_json(&["sound", "list", "--profile", "Work", "--json"]);
    assert_eq!(sounds["count"], 1);
}

#[test]
fn test_import_rejects_missing_sound_files() {
    let env = env_with_work_profile();
    let out = env.dir.path().join("work.json");
    env.run_ok(&["export", "--profile", "Work", out.to_str().unwrap()]);
    fs::remove_file(env.dir.path().join("horn.wav")).unwrap();

    let target = TestEnv::new();
    let output = target.run(&["import", out.to_str().unwrap()]);
    assert_exit(&output, 1, "sound file no longer exists");

    let result = target.run_json(&["profile", "list", "--json"]);
    assert_eq!(result["count"], 1, "nothing is imported on failure");
}

#[test]
fn test_import_missing_file_is_io_error() {
    let env = TestEnv::new();
    let missing = env.dir.path().join("nope.json");
    let output = env.run(&["import", missing.to_str().unwrap()]);
    assert_exit(&output, 2, "unreadable import file");
}

#[test]
fn test_import_legacy_flat_document() {
    let env = TestEnv::new();
    let horn = env.wav("horn.wav");
    let legacy = env.dir.path().join("legacy.json");
    let doc = serde_json::json!({
        "Memes": {
            "Horn": {"file": horn.to_str().unwrap(), "key": "F3"}
        }
    });
    fs::write(&legacy, doc.to_string()).unwrap();

    env.run_ok(&["import", legacy.to_str().unwrap()]);

    let sounds = env.run_json(&["sound", "list", "--profile", "Memes", "--json"]);
    assert_eq!(sounds["sounds"][0]["name"], "Horn");
    assert_eq!(sounds["sounds"][0]["key"], "F3");
}
