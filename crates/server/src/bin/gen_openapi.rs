//! Print the OpenAPI document, or write it to the path given as the first argument.

use server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi().to_pretty_json()?;
    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, doc)?;
            eprintln!("wrote {path}");
        }
        None => println!("{doc}"),
    }
    Ok(())
}
