// Business domains
pub mod advisory;
