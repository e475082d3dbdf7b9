//! Build metadata captured by `build.rs` at compile time.

/// Crate version from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short hash of the commit the binary was built from.
pub const GIT_HASH: &str = or_unknown(option_env!("FINANCE_CORE_BUILD_HASH"));

/// `clean` or `dirty` working tree at build time.
pub const GIT_STATUS: &str = or_unknown(option_env!("FINANCE_CORE_BUILD_STATUS"));

pub const BUILT_AT: &str = or_unknown(option_env!("FINANCE_CORE_BUILD_TIMESTAMP"));
pub const TARGET: &str = or_unknown(option_env!("FINANCE_CORE_BUILD_TARGET"));
pub const PROFILE: &str = or_unknown(option_env!("FINANCE_CORE_BUILD_PROFILE"));
pub const RUSTC: &str = or_unknown(option_env!("FINANCE_CORE_BUILD_RUSTC"));

/// Builds outside the repository (for example from a crates.io tarball)
/// have no git context, so every field falls back to `unknown`.
const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(text) => text,
        None => "unknown",
    }
}
