use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Read version from a VERSION file next to Cargo.toml
    let version = if let Ok(v) = env::var("EMBEDGEN_VERSION") {
        // Use environment variable if set
        v
    } else {
        let version_file = Path::new("VERSION");
        if version_file.exists() {
            fs::read_to_string(version_file)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(package_version)
        } else {
            package_version()
        }
    };

    // Pass version to the build
    println!("cargo:rustc-env=EMBEDGEN_VERSION={}", version);
    println!("cargo:rerun-if-changed=VERSION");
    println!("cargo:rerun-if-env-changed=EMBEDGEN_VERSION");
}

fn package_version() -> String {
    env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.1".to_string())
}
