//! Formula representation: literals, clause arena, occurrence indices and
//! assignments.

mod assignment;
mod clause;
mod cnf;
mod literal;
mod occurlist;

pub use assignment::Assignment;
pub use clause::ClauseSlot;
pub use cnf::{Cnf, Valuation};
pub use literal::Literal;
