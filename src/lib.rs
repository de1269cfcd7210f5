//! comptree: composite trees, cursors and builders.
//!
//! Layers, innermost first:
//! - [`domain`]: optional values, cursors, composite trees, lists, graphs,
//!   tree and maze builders
//! - [`application`]: tree documents and the tree service
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
