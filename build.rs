// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=KAMERAKU_VERSION");

    // Packagers without a git checkout set the version explicitly
    let version = match std::env::var("KAMERAKU_VERSION") {
        Ok(v) => v,
        Err(_) => describe_version(),
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Turn `git describe` output into `<tag>-<hash>` or `<tag>-dirty-<hash>`.
fn describe_version() -> String {
    let described = git(&["describe", "--tags", "--always", "--match", "v*"]);
    let hash = git(&["rev-parse", "--short", "HEAD"]);

    let Some(described) = described else {
        return hash.unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    // "0.1.0-5-gabcdef1" means five commits after the tag
    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() == 3 {
        let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
        return format!("{}-dirty-{}", parts[2], hash);
    }

    match hash {
        Some(hash) if hash != described => format!("{}-{}", described, hash),
        _ => described.to_string(),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
