//! # Abventure Core
//!
//! The engine half of Abventure. Story sources are compiled once into an
//! immutable [`Story`](abventure_rules::Story); any cell can then be rendered
//! for any inventory state, with all of the reader's progress carried in the
//! links the renderer writes.
//!
//! ## Core Components
//!
//! - **compiler**: line-oriented source to cell graph
//! - **renderer**: (story, cell, state) to markup and next navigation tokens
//! - **observer**: optional diagnostics for both

pub mod compiler;
pub mod observer;
pub mod renderer;

pub use compiler::*;
pub use observer::*;
pub use renderer::*;
