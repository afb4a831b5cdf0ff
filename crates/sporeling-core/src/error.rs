//! Error types for configuration loading and rejected commands.
//!
//! Only `ConfigError` ever reaches a caller. The command errors are produced
//! inside a tick, logged at `debug`, and dropped.

use std::path::PathBuf;

use hecs::Entity;
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::PurchaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngagementError {
    #[error("{0:?} is already engaged")]
    AlreadyEngaged(Entity),
    #[error("engagement table full ({capacity} rows)")]
    TableFull { capacity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphError {
    #[error("a morph is already in progress")]
    AlreadyMorphing,
    #[error("{0} is not a morph target")]
    NotMorphable(ActorClass),
    #[error("already a {0}")]
    SameClass(ActorClass),
    #[error("no living player to morph")]
    NoPlayer,
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no living player")]
    NoPlayer,
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Morph(#[from] MorphError),
}
