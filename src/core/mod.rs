//! Core error types shared by the framework, authorization and bridge modules.

mod error;

pub use error::{Error, Result};
