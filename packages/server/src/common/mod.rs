// Common utilities shared across the application

pub mod paths;

pub use paths::{is_within, normalize_lexically};
