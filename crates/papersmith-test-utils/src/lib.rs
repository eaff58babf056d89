//! Fakes and fixtures shared by the papersmith integration tests.

pub mod fakes;
pub mod fixtures;

pub use fakes::{FailingSource, FetchOutcome, MapFetcher, ScriptedBackend, StaticSource};
pub use fixtures::{document, fragment_sentence, paper};
