use std::env;
use std::process::Command;

fn main() {
    for var in ["RAINGRID_BUILD", "GITHUB_SHA", "CARGO_ENCODED_RUSTFLAGS"] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let build_id = env::var("RAINGRID_BUILD")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(target_label);
    println!("cargo:rustc-env=RAINGRID_BUILD={build_id}");

    let sha = git_head_sha()
        .or_else(|| env::var("GITHUB_SHA").ok().and_then(|v| short_sha(&v)))
        .unwrap_or_default();
    println!("cargo:rustc-env=RAINGRID_GIT_SHA={sha}");
}

fn short_sha(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let short = raw.get(..raw.len().min(7))?;
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

fn git_head_sha() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    short_sha(&String::from_utf8(out.stdout).ok()?)
}

/// `os-arch`, plus the x86-64 micro-architecture level on linux.
fn target_label() -> String {
    let os = match env::var("CARGO_CFG_TARGET_OS").as_deref() {
        Ok("macos") => "darwin".to_string(),
        Ok(other) => other.to_string(),
        Err(_) => "unknown".to_string(),
    };
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    let features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();

    if arch != "x86_64" || os != "linux" {
        return format!("{os}-{arch}");
    }
    let level = if features.contains("avx512f") {
        "v4"
    } else if features.contains("avx2") {
        "v3"
    } else if features.contains("sse4.2") {
        "v2"
    } else {
        "v1"
    };
    format!("{os}-{arch}-{level}")
}
