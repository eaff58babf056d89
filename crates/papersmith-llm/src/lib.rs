//! papersmith-llm: Generation service abstraction layer.
//! Implements the LlmBackend trait used by the section drafter and the
//! factory that turns configuration into a concrete backend.

pub mod backend;
pub mod router;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};
pub use router::{build_backend, BackendConfig, BackendKind};
