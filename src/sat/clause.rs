use std::collections::BTreeSet;
use std::fmt;

use super::literal::Literal;

// Removed slots stay in place so clause ids never shift
#[derive(Clone, PartialEq, Eq)]
pub enum ClauseSlot {
    Active(BTreeSet<Literal>),
    Removed,
}

impl ClauseSlot {
    pub fn literals(&self) -> Option<&BTreeSet<Literal>> {
        match self {
            ClauseSlot::Active(literals) => Some(literals),
            ClauseSlot::Removed => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ClauseSlot::Active(_))
    }

    pub fn first(&self) -> Option<Literal> {
        self.literals().and_then(|literals| literals.first().copied())
    }
}

impl fmt::Debug for ClauseSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseSlot::Active(literals) => {
                for lit in literals {
                    write!(f, "{:?},", lit)?;
                }
                Ok(())
            }
            ClauseSlot::Removed => write!(f, "<removed>"),
        }
    }
}
