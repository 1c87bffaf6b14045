// HTTP routes
pub mod documents;
pub mod feedback;
pub mod generate;
pub mod health;
pub mod upload;
pub mod view_pdf;

pub use documents::*;
pub use feedback::*;
pub use generate::*;
pub use health::*;
pub use upload::*;
pub use view_pdf::*;
