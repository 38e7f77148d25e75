//! End-to-end tests for `soundboard profile` commands.

mod fixtures;
use fixtures::*;

use std::fs;

#[test]
fn test_profile_list_fresh_store() {
    let env = TestEnv::new();
    let result = env.run_json(&["profile", "list", "--json"]);

    assert_eq!(result["active"], "Default");
    assert_eq!(result["count"], 1);
    assert_eq!(result["profiles"][0]["name"], "Default");
    assert_eq!(result["profiles"][0]["sounds"], 0);
    assert_eq!(result["profiles"][0]["active"], true);
}

#[test]
fn test_profile_create_activates_and_persists() {
    let env = TestEnv::new();
    let stdout = env.run_ok(&["profile", "create", "Work"]);
    assert!(stdout.contains("Created profile 'Work'"), "{stdout}");

    let result = env.run_json(&["profile", "list", "--json"]);
    assert_eq!(result["active"], "Work");
    let names: Vec<&str> = result["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Default", "Work"]);

    let store = env.store_json();
    assert_eq!(store["version"], 1);
    assert_eq!(store["active"], "Work");
}

#[test]
fn test_profile_create_duplicate_fails() {
    let env = TestEnv::new();
    env.run_ok(&["profile", "create", "Work"]);

    let output = env.run(&["profile", "create", "Work"]);
    assert_exit(&output, 1, "duplicate profile is a validation error");
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
}

#[test]
fn test_profile_create_blank_name_fails() {
    let env = TestEnv::new();
    let output = env.run(&["profile", "create", "   "]);
    assert_exit(&output, 1, "blank profile name is rejected");
}

#[test]
fn test_profile_delete_default_is_protected() {
    let env = TestEnv::new();
    let output = env.run(&["profile", "delete", "Default"]);

    assert_exit(&output, 1, "Default cannot be deleted");
    assert!(String::from_utf8_lossy(&output.stderr).contains("protected"));
}

#[test]
fn test_profile_delete_active_falls_back_to_default() {
    let env = TestEnv::new();
    env.run_ok(&["profile", "create", "Work"]);

    let stdout = env.run_ok(&["profile", "delete", "Work"]);
    assert!(stdout.contains("Active profile: Default"), "{stdout}");

    let result = env.run_json(&["profile", "list", "--json"]);
    assert_eq!(result["count"], 1);
    assert_eq!(result["active"], "Default");
}

#[test]
fn test_profile_delete_missing_fails() {
    let env = TestEnv::new();
    let output = env.run(&["profile", "delete", "Nope"]);
    assert_exit(&output, 1, "unknown profile");
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_profile_use_switches_active() {
    let env = TestEnv::new();
    env.run_ok(&["profile", "create", "Work"]);
    env.run_ok(&["profile", "create", "Games"]);

    env.run_ok(&["profile", "use", "Work"]);
    let result = env.run_json(&["profile", "list", "--json"]);
    assert_eq!(result["active"], "Work");

    let output = env.run(&["profile", "use", "Nope"]);
    assert_exit(&output, 1, "unknown profile");
}

#[test]
fn test_corrupt_store_starts_fresh_and_is_kept() {
    let env = TestEnv::new();
    fs::write(env.store_path(), "{ this is not json").unwrap();

    let result = env.run_json(&["profile", "list", "--json"]);
    assert_eq!(result["count"], 1);
    assert_eq!(result["active"], "Default");

    let backup = env.store_path().with_extension("json.corrupt");
    assert_eq!(fs::read_to_string(backup).unwrap(), "{ this is not json");
}

#[test]
fn test_unwritable_store_is_io_error() {
    let env = TestEnv::new();
    // A directory where the store file should be cannot be read or replaced
    fs::create_dir_all(env.store_path()).unwrap();

    let output = env.run(&["profile", "create", "Work"]);
    assert_exit(&output, 2, "store I/O failure");
}
