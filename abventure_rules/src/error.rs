//! Errors raised by the story model.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// A story tried to define more items than fit in an inventory state.
    #[error("cannot define item {name:?}: all {} inventory slots are taken", crate::MAX_ITEMS)]
    RegistryFull { name: String },

    #[error("invalid item registry: {0}")]
    InvalidRegistry(String),

    /// A stored cell sits under an identifier that is not the hash of its name.
    #[error("cell {name:?} is stored under {key}, expected {expected}")]
    MisaddressedCell {
        name: String,
        key: crate::Ident,
        expected: crate::Ident,
    },

    #[error("invalid cell identifier {0:?}: expected 8 hexadecimal digits")]
    InvalidIdent(String),

    #[error("invalid navigation token {token:?}: {reason}")]
    InvalidToken { token: String, reason: String },
}
