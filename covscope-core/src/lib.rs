//! covscope-core: state core for the covscope coverage explorer.
//!
//! Everything here is independent of the terminal: the binary crate hosts the
//! [`controller::ViewController`] behind a [`surface::RenderSurface`] of its own.

pub mod controller;
pub mod coverage;
pub mod db;
pub mod debounce;
pub mod error;
pub mod history;
pub mod link;
pub mod prefs;
pub mod report;
pub mod schema;
pub mod search;
pub mod selection;
pub mod state;
pub mod surface;
pub mod tree;
pub mod types;

pub use error::{CovscopeError, Result};
