// Advisory Agreement Intake - API Core
//
// Scans a folder of signed advisory agreements, extracts a fixed field contract
// from each PDF through a multimodal model, classifies every document as IGO or
// NIGO, and generates synthetic filled agreements for testing the pipeline.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
