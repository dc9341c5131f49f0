//! Error kinds raised by the battle domain

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ability catalog is empty")]
    EmptyCatalog,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Not allowed to access this resource")]
    Unauthorized,

    #[error("Cannot {action} while battle is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, BattleError>;
