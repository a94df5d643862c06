//! Shared harness for the `tft` end-to-end tests.
//!
//! Every run gets a pinned environment: a private `HOME`, a global config
//! carrying a fixed identity, and no user or system ignore files.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

pub fn tft_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tft"))
}

/// A scratch area holding a `home/` and a `work/` directory.
pub struct Sandbox {
    root: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("home")).unwrap();
        std::fs::create_dir(root.path().join("work")).unwrap();
        std::fs::write(
            root.path().join("home/gitconfig"),
            "[user]\n\tname = Test Tagger\n\temail = tagger@example.com\n",
        )
        .unwrap();
        Self { root }
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    fn command(&self, dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(tft_bin());
        cmd.args(args)
            .current_dir(dir)
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env("GIT_CONFIG_GLOBAL", self.home().join("gitconfig"))
            .env("TZ", "UTC")
            .env("LC_ALL", "C")
            .env_remove("TFT_LOG");
        cmd
    }

    /// Run `tft` in `dir`.
    pub fn tft_in(&self, dir: &Path, args: &[&str]) -> CommandResult {
        let output = self
            .command(dir, args)
            .output()
            .expect("failed to run tft");
        result(output)
    }

    /// Run `tft` in the work directory.
    pub fn tft(&self, args: &[&str]) -> CommandResult {
        self.tft_in(&self.work(), args)
    }

    /// Run `tft` in the work directory with `input` on stdin.
    pub fn tft_stdin(&self, args: &[&str], input: &[u8]) -> CommandResult {
        let mut child = self
            .command(&self.work(), args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn tft");
        child.stdin.take().unwrap().write_all(input).unwrap();
        result(child.wait_with_output().unwrap())
    }

    /// Store `payload` as an object of type `kind` and return its id.
    pub fn store(&self, kind: &str, payload: &[u8]) -> String {
        let r = self.tft_stdin(&["hash-object", "-w", "-t", kind, "--stdin"], payload);
        assert_eq!(r.exit_code, 0, "hash-object failed: {}", r.stderr);
        r.stdout.trim().to_string()
    }

    /// Point `refs/<name>` at `oid` by writing the ref file directly.
    pub fn set_ref(&self, name: &str, oid: &str) {
        let path = self.work().join(".git").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, format!("{oid}\n")).unwrap();
    }
}

fn result(output: std::process::Output) -> CommandResult {
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Raw tree payload from `(mode, name, hex id)` triples, already sorted.
pub fn tree_payload(entries: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (mode, name, hex) in entries {
        out.extend_from_slice(format!("{mode} {name}\0").as_bytes());
        for i in (0..40).step_by(2) {
            out.push(u8::from_str_radix(&hex[i..i + 2], 16).unwrap());
        }
    }
    out
}

/// A commit payload with a fixed author and committer.
pub fn commit_payload(tree: &str, parents: &[&str], message: &str) -> Vec<u8> {
    let mut out = format!("tree {tree}\n");
    for p in parents {
        out.push_str(&format!("parent {p}\n"));
    }
    out.push_str("author Test Author <author@example.com> 1234567890 +0000\n");
    out.push_str("committer Test Author <author@example.com> 1234567890 +0000\n");
    out.push('\n');
    out.push_str(message);
    out.into_bytes()
}
