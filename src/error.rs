//! Error types for preference, fairness and allocation operations

use crate::types::{AgentId, Item};
use thiserror::Error;

/// Errors that can occur while building preferences or evaluating allocations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
    #[error("Item not found: {0}")]
    ItemNotFound(Item),
    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),
    #[error("Cannot evaluate items without cardinal values")]
    NoCardinalValues,
    #[error("Unsupported agent count {0}: at most 3 agents are supported")]
    UnsupportedAgentCount(usize),
    #[error("{items} items cannot be split equally among {agents} agents")]
    IndivisibleInput { items: usize, agents: usize },
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
    #[error("Implication violated: {0}")]
    ImplicationViolated(String),
}

/// A specialized Result type for fair-division operations
pub type Result<T> = std::result::Result<T, Error>;
