//! Fatal simulation faults
//!
//! Every variant is a broken contract between the kernel and its callers or
//! between entity kinds, never a transient condition. `tick` hands the fault
//! back to the host unchanged; nothing retries.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A grid lookup landed outside the simulated world
    #[error("x = {x} maps to chunk {index}, outside the {chunk_count} chunks of the world")]
    OutOfWorldBounds {
        x: f32,
        index: i64,
        chunk_count: usize,
    },
    #[error("unknown edge selector '{0}'")]
    InvalidEdgeSelector(String),
    #[error("{kind} has no animation for key {key:?}")]
    AnimationKeyMissing {
        kind: &'static str,
        key: Option<&'static str>,
    },
    #[error("unknown spawn kind '{0}'")]
    InvalidSpawnKind(String),
    #[error("invalid settings: {0}")]
    Settings(String),
}
