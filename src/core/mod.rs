//! Rewind Protocol - Core Module
//!
//! Protocol constants and error types shared by every layer.

pub mod constants;
mod error;

pub use constants::*;
pub use error::{ClientError, ClientResult};
