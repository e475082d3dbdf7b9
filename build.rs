use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = capture("git", &["rev-parse", "--short", "HEAD"])
        .filter(|out| !out.is_empty())
        .unwrap_or_else(unknown);
    println!("cargo:rustc-env=FINANCE_CORE_BUILD_HASH={hash}");

    let status = match capture("git", &["status", "--porcelain"]) {
        Some(out) if out.is_empty() => "clean".to_string(),
        Some(_) => "dirty".to_string(),
        None => unknown(),
    };
    println!("cargo:rustc-env=FINANCE_CORE_BUILD_STATUS={status}");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=FINANCE_CORE_BUILD_TIMESTAMP={timestamp}");

    println!("cargo:rustc-env=FINANCE_CORE_BUILD_TARGET={}", cargo_var("TARGET"));
    println!("cargo:rustc-env=FINANCE_CORE_BUILD_PROFILE={}", cargo_var("PROFILE"));

    let rustc = capture("rustc", &["--version"])
        .filter(|out| !out.is_empty())
        .unwrap_or_else(unknown);
    println!("cargo:rustc-env=FINANCE_CORE_BUILD_RUSTC={rustc}");
}

fn unknown() -> String {
    "unknown".to_string()
}

fn cargo_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| format!("unknown-{}", name.to_lowercase()))
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}
