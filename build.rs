use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    let version = match git_describe() {
        Some(described) => release_version(&described),
        None => {
            let manifest = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
            format!("{}+{}", manifest, build_time())
        }
    };
    println!("cargo:rustc-env=SIMP_VERSION={}", version);
}

/// `git describe` of HEAD, or `None` outside a usable checkout.
fn git_describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Tag `v0.3.1` becomes `0.3.1`; uncommitted builds get a build-time suffix.
fn release_version(described: &str) -> String {
    let version = described.trim_start_matches('v');
    if version.ends_with("-dirty") {
        format!("{}.{}", version, build_time())
    } else {
        version.to_string()
    }
}

fn build_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
