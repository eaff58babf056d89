//! papersmith-common: Shared error type and network plumbing used across all papersmith crates.

pub mod error;
pub mod sandbox;

pub use error::{PapersmithError, Result};
pub use sandbox::SandboxClient;
