//! Advisory domain actions - business logic behind the HTTP routes.
//!
//! Routes parse requests and render responses; everything in between lives here.

mod documents;
mod generate;
mod reference;
mod retrieve;

pub use documents::*;
pub use generate::*;
pub use reference::*;
pub use retrieve::*;
