//! Structured extraction from a PDF passed on the command line.
//!
//! ```sh
//! OPENAI_API_KEY=... cargo run -p openai-client --example structured -- contract.pdf
//! ```

use base64::Engine;
use openai_client::{FileInput, OpenAIClient, StructuredRequest};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: structured <file.pdf>")?;
    let client = OpenAIClient::from_env()?;

    let schema = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": "Document title" },
            "parties": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Named parties to the agreement"
            },
            "signed": { "type": "boolean", "description": "Whether any signature is present" }
        },
        "required": ["title", "parties", "signed"],
        "additionalProperties": false
    });

    let bytes = std::fs::read(&path)?;
    let data_uri = format!("data:application/pdf;base64,{}", base64::engine::general_purpose::STANDARD.encode(&bytes));

    let request = StructuredRequest::with_files(
        "gpt-4o",
        "Extract document facts.",
        "Read the attached document.",
        vec![FileInput::new(path.clone(), data_uri)],
        schema,
    );

    match client.structured_output(request).await? {
        Some(response) => println!("Structured output: {}", response),
        None => println!("Model returned no content"),
    }

    Ok(())
}
