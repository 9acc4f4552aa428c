use std::fs;
use std::path::Path;

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/api.rs");
    println!("cargo:rerun-if-changed=src/services/lightning_service.rs");
    println!("cargo:rerun-if-changed=src/services/batch_runner.rs");
    println!("cargo:rerun-if-changed=src/normalize/geocode.rs");

    // Replaced by `cargo run --bin generate-openapi`
    let openapi_path = Path::new("openapi.json");
    if openapi_path.exists() {
        return Ok(());
    }

    let placeholder = format!(
        r#"{{
  "openapi": "3.0.3",
  "info": {{ "title": "{}", "version": "{}" }},
  "paths": {{}}
}}
"#,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    fs::write(openapi_path, placeholder)
}
