//! OpenAPI Document Generator Binary
//!
//! Prints the Notes API OpenAPI document as JSON to stdout.
//!
//! Usage:
//!   cargo run -p notes-api --bin notes-openapi > openapi.json

use notes_api::ApiDoc;

fn main() {
    match ApiDoc::to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI document: {}", e);
            std::process::exit(1);
        }
    }
}
