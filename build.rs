// Stamps the sign-agent version into the binary as SIGN_VERSION.
//
// Local builds use the package version unchanged. The release job sets
// SIGN_PATCH_VERSION to its run number, so every deployed image reports a
// distinct version from `/version` and `sign-agent --version` while
// Cargo.toml only tracks major.minor.

use std::env;

fn stamped_version(package_version: &str, patch_override: Option<String>) -> String {
    let mut segments = package_version.splitn(3, '.');
    let (Some(major), Some(minor), Some(patch)) =
        (segments.next(), segments.next(), segments.next())
    else {
        panic!("sign-agent version must be major.minor.patch, got {package_version}");
    };

    let patch = patch_override
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| patch.to_string());
    format!("{major}.{minor}.{patch}")
}

fn main() {
    let package_version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");
    let version = stamped_version(&package_version, env::var("SIGN_PATCH_VERSION").ok());

    println!("cargo:rustc-env=SIGN_VERSION={version}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=SIGN_PATCH_VERSION");
}
