//! Compile-time build information, generated by build.rs.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string for `flappy --version`.
pub fn version_line() -> String {
    format!(
        "flappy {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}
