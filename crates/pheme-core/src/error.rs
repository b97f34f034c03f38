//! Error types for graph edits, interactions and configuration files.

use thiserror::Error;

/// Failed edit or lookup on the social graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("character `{0}` already exists")]
    DuplicateCharacter(String),

    #[error("character `{0}` not found")]
    CharacterNotFound(String),

    #[error("no relationship from `{from}` to `{to}`")]
    RelationshipNotFound { from: String, to: String },

    #[error("character `{0}` cannot have a relationship with itself")]
    SelfRelationship(String),
}

/// Failed interaction trigger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("unknown interaction template `{0}`")]
    UnknownTemplate(String),

    #[error("unknown interaction scope `{0}`")]
    UnknownScope(String),

    #[error("`{0}` cannot interact with itself")]
    SelfInteraction(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failed to read a tuning or scenario file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failed to build a world from a scenario
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),
}
