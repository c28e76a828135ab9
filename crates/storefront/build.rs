//! Stamps the stylesheet's content hash into the binary as `CSS_HASH`.
//!
//! `base.html` links `main.css?v=<hash>`, so a deploy that changes the CSS
//! busts browser caches and one that doesn't leaves them warm.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

const STYLESHEET: &str = "static/css/main.css";

fn main() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), STYLESHEET].iter().collect();
    println!("cargo:rerun-if-changed={}", path.display());

    let version = std::fs::read(&path).map_or_else(
        |err| {
            println!("cargo:warning=cannot hash {STYLESHEET}: {err}");
            "dev".to_owned()
        },
        |css| {
            let digest = Sha256::digest(&css);
            digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
        },
    );

    println!("cargo:rustc-env=CSS_HASH={version}");
}
