//! Embeds a human-readable version string as `BUILD_INFO_HUMAN`.
//!
//! The string is `{CARGO_PKG_VERSION} ({git}) {rustc --version}` where
//! `{git}` is `git describe --tags --dirty` when a tag exists, otherwise
//! `v{CARGO_PKG_VERSION}-{timestamp}-{short sha}[+dirty]`. Clean builds use
//! the commit timestamp, dirty builds and builds outside git use the build
//! time.

use std::process::Command;

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    for path in ["src", "build.rs", "Cargo.toml", "Cargo.lock"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let version = env!("CARGO_PKG_VERSION");
    let build_info = [
        Some(version.to_string()),
        Some(format!("({})", git_version(version))),
        run("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={build_info}");
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git(args: &[&str]) -> Option<String> {
    run("git", args)
}

/// `None` outside a git checkout. `.cargo-ok` is written by
/// `cargo install --git` and does not count as a local change.
fn is_dirty() -> Option<bool> {
    git(&["status", "--porcelain"])
        .map(|status| status.lines().any(|line| line.get(3..) != Some(".cargo-ok")))
        .or_else(|| git(&["rev-parse", "--git-dir"]).map(|_| false))
}

fn git_version(version: &str) -> String {
    if let Some(described) = git(&["describe", "--tags", "--dirty"]) {
        return described;
    }

    let sha = git(&["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let dirty = is_dirty();
    let timestamp = match dirty {
        Some(false) => git(&["log", "-1", "--format=%ct"])
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
    .unwrap_or_else(Utc::now)
    .format(TIMESTAMP_FORMAT);
    let suffix = if dirty == Some(true) { "+dirty" } else { "" };

    format!("v{version}-{timestamp}-{sha}{suffix}")
}
