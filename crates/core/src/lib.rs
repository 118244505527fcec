//! Core types, assignment logic, and validation for the Splitpage A/B gateway.

pub mod assignment;
pub mod error;
pub mod ids;
pub mod limits;
pub mod types;
pub mod validation;

pub use assignment::*;
pub use error::{Error, Result};
pub use types::*;
