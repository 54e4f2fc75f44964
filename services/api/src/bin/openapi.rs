//! services/api/src/bin/openapi.rs
//!
//! Exports the Eco Tracker OpenAPI document without starting the server.
//! Usage: `openapi [OUTPUT]`, where OUTPUT defaults to `openapi.json`.

use eco_api_lib::{error::ApiError, web::rest::write_api_doc};
use std::path::PathBuf;

fn main() -> Result<(), ApiError> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let documented = write_api_doc(&output)?;
    println!(
        "Wrote {} Eco Tracker API paths to {}",
        documented,
        output.display()
    );
    Ok(())
}
