//! SAT-based planning core: an incremental CNF store with live clause,
//! literal and variable indices, and the WalkSat and GSat local searches.

pub mod encoding;
pub mod error;
pub mod parser;
pub mod sat;
pub mod search;

pub use error::{Error, FormatError, Result};
