//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the soundboard binary
pub fn soundboard_bin() -> String {
    std::env::var("CARGO_BIN_EXE_soundboard")
        .unwrap_or_else(|_| "target/debug/soundboard".to_string())
}

/// An isolated config directory and profile store for one test.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("profiles.json")
    }

    /// Command with an isolated config directory, the test store and no audio device.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(soundboard_bin());
        cmd.env("SOUNDBOARD_CONFIG_DIR", self.config_dir());
        cmd.env("SOUNDBOARD_AUDIO", "null");
        cmd.env_remove("RUST_LOG");
        cmd.arg("--store").arg(self.store_path());
        cmd.args(args);
        cmd
    }

    /// Runs a command and returns its output.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }

    /// Runs a command that must succeed and returns its stdout.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert_eq!(
            output.status.code(),
            Some(0),
            "{args:?} should succeed. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Runs a command with `--json` output and parses it.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_ok(args);
        serde_json::from_str(&stdout).expect("Should parse JSON output")
    }

    /// Writes a short silent WAV clip and returns its path.
    pub fn wav(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        write_wav(&path, 0.05);
        path
    }

    /// The store document as JSON.
    pub fn store_json(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.store_path()).expect("store should exist");
        serde_json::from_str(&content).expect("store should be valid JSON")
    }
}

/// Writes a mono 16-bit WAV of `seconds` silence at 8 kHz.
pub fn write_wav(path: &Path, seconds: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    let samples = (8000.0 * seconds) as usize;
    for _ in 0..samples {
        writer.write_sample(0i16).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// Asserts the exit code and echoes stderr on failure.
pub fn assert_exit(output: &Output, code: i32, context: &str) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "{context}. stdout: {} stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}
