pub mod document;
pub mod fields;
pub mod record;
pub mod template;

pub use document::*;
pub use fields::*;
pub use record::*;
pub use template::*;
