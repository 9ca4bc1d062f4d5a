use actor_runtime::QueueError;
use core_types::AddressError;
use path_compiler::CompileError;
use thiserror::Error;

/// Rejection of an engine request at the call boundary.
///
/// Nothing that produced one of these ever reached the Command Queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid connection parameters: {0}")]
    Validation(#[from] AddressError),

    #[error("Path rejected: {0}")]
    Compile(#[from] CompileError),

    #[error("Request not queued: {0}")]
    Queue(#[from] QueueError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to start worker thread: {0}")]
    Spawn(String),
}
