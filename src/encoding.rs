//! Names to integers and back, for formulas produced by a planning encoder.
//!
//! Variables are numbered from 1 in the order their names first appear. A
//! clause token starting with [`NEGATION_PREFIX`] names the negative literal.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::error::{Error, Result};
use crate::sat::{Assignment, Cnf, Literal};

pub const NEGATION_PREFIX: &str = "NOT ";

#[derive(Clone, Debug, Default)]
pub struct Encoding {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Encoding {
    /// Later repeats of a name keep the number of its first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut encoding = Encoding::default();
        for name in names {
            let name = name.into();
            if !encoding.index.contains_key(&name) {
                encoding.names.push(name.clone());
                encoding.index.insert(name, encoding.names.len());
            }
        }
        encoding
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn variable(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name(&self, variable: usize) -> Option<&str> {
        self.names.get(variable.checked_sub(1)?).map(String::as_str)
    }

    pub fn literal(&self, token: &str) -> Result<Literal> {
        let negated = token
            .get(..NEGATION_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(NEGATION_PREFIX));
        let name = if negated {
            &token[NEGATION_PREFIX.len()..]
        } else {
            token
        };
        let variable = self
            .variable(name)
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))?;
        Ok(Literal {
            variable,
            polarity: !negated,
        })
    }

    pub fn to_cnf<C, T>(&self, clauses: impl IntoIterator<Item = C>) -> Result<Cnf>
    where
        C: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut cnf = Cnf::default();
        cnf.reserve_variables(self.len());
        for clause in clauses {
            let literals = clause
                .into_iter()
                .map(|token| self.literal(token.as_ref()))
                .collect::<Result<Vec<_>>>()?;
            cnf.add_clause(literals);
        }
        Ok(cnf)
    }

    /// Names among the first `action_count` variables that `assignment`
    /// makes true, in variable order.
    pub fn extract_plan(&self, assignment: &Assignment, action_count: usize) -> Vec<&str> {
        (0..action_count.min(assignment.len()))
            .filter(|&index| assignment.get(index))
            .filter_map(|index| self.names.get(index).map(String::as_str))
            .collect()
    }

    pub fn write_listing<C, T>(
        &self,
        writer: &mut impl Write,
        clauses: impl IntoIterator<Item = C>,
    ) -> io::Result<()>
    where
        C: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        writeln!(writer, "Variables: ")?;
        for name in &self.names {
            writeln!(writer, "{name}")?;
        }
        writeln!(writer, "\nClauses: ")?;
        for clause in clauses {
            let tokens: Vec<String> = clause.into_iter().map(|t| t.as_ref().to_string()).collect();
            writeln!(writer, "{}", tokens.join(" "))?;
        }
        Ok(())
    }
}
