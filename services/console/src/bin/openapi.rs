//! services/console/src/bin/openapi.rs
//!
//! Writes the console's OpenAPI document: sign-in and session state,
//! document upload with job polling and cancellation, and the notification
//! feed. The resource passthrough routes (bank accounts, invoices, entities,
//! counterparts, dashboard) are not described.
//!
//! Usage: `openapi [OUTPUT]`, where `OUTPUT` defaults to `openapi.json`.

use console_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn write_document(output: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi();
    let operations = doc.paths.paths.len();
    std::fs::write(output, doc.to_pretty_json()?)?;
    Ok(operations)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let paths = write_document(&output)?;
    println!("Console OpenAPI document ({paths} paths) written to {output}");
    Ok(())
}
