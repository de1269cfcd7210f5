//! Application layer: tree documents and services
//!
//! This layer maps documents onto domain trees and depends on I/O boundary traits.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod services;

pub use document::{NodeSpec, TreeDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
