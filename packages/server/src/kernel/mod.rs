//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod test_dependencies;
pub mod throttle;
pub mod traits;

pub use ai::{OpenAIDocumentAI, UnconfiguredAI};
pub use deps::ServerDeps;
pub use test_dependencies::TestDependencies;
pub use throttle::{ExtractionThrottle, ThrottlePermit, ThrottlePolicy};
pub use traits::*;
