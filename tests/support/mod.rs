#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

/// Throwaway data directory for one test
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("todos.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.dir.path().join("users.json")
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join(".todo.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn read_tasks_json(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.tasks_file()).expect("read todos.json");
        serde_json::from_str(&raw).expect("parse todos.json")
    }

    /// `todo` with `--home` pointing here and no credentials from the environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todo").expect("binary");
        cmd.env_remove("TODO_HOME")
            .env_remove("TODO_USER")
            .env_remove("TODO_PASSWORD")
            .env_remove("RUST_LOG")
            .arg("--home")
            .arg(self.path());
        cmd
    }

    /// `todo` logged in as `user`
    pub fn cmd_as(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--user").arg(user).arg("--password").arg(password);
        cmd
    }

    pub fn register(&self, user: &str, password: &str) {
        self.cmd_as(user, password).arg("register").assert().success();
    }

    /// Run with `--json` and return the `data` member of the envelope
    pub fn json_data(&self, user: &str, password: &str, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd_as(user, password)
            .arg("--json")
            .args(args)
            .output()
            .expect("run todo");
        assert!(
            output.status.success(),
            "todo {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        let envelope: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("json envelope");
        envelope["data"].clone()
    }
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}
