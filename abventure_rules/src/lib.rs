//! # Abventure Rules
//!
//! The story model - everything a compiled story is made of, and nothing about
//! how it is parsed or rendered.
//!
//! - **ident**: name hashing used to address cells
//! - **inventory**: item definitions and the 64-bit possession mask
//! - **story**: cells, lines, the compiled story and navigation tokens

pub mod error;
pub mod ident;
pub mod inventory;
pub mod story;

pub use error::*;
pub use ident::*;
pub use inventory::*;
pub use story::*;
