//! Error and logging plumbing shared by every module

pub mod error;
pub mod logging;

pub use error::{Error, Result};
