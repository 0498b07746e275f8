use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::mem;
use std::path::Path;

use log::debug;

use crate::error::{Error, FormatError, Result};
use crate::sat::{Cnf, Literal};
use crate::search::Solution;

/// Largest variable id `load` accepts. The occurrence lists are dense, so
/// every id up to the largest one gets a slot.
pub const MAX_VARIABLE: usize = 1 << 24;

fn parse_problem_line(line: &str, number: usize) -> Result<(usize, usize), FormatError> {
    let malformed = || FormatError::MalformedProblemLine {
        line: number,
        text: line.to_string(),
    };
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 4
        || !parts[0].eq_ignore_ascii_case("p")
        || !parts[1].eq_ignore_ascii_case("cnf")
    {
        return Err(malformed());
    }
    let var_count = parts[2].parse::<usize>().map_err(|_| malformed())?;
    let clause_count = parts[3].parse::<usize>().map_err(|_| malformed())?;
    Ok((var_count, clause_count))
}

fn parse_literal(word: &str, number: usize) -> Result<i32, FormatError> {
    let lit = word.parse::<i32>().map_err(|_| FormatError::BadToken {
        line: number,
        token: word.to_string(),
    })?;
    let variable = lit.unsigned_abs() as usize;
    if variable > MAX_VARIABLE {
        return Err(FormatError::VariableOutOfRange {
            line: number,
            variable,
        });
    }
    Ok(lit)
}

fn read_clauses(
    line: &str,
    number: usize,
    clauses: &mut Vec<Vec<Literal>>,
    variables: &mut BTreeSet<usize>,
) -> Result<(), FormatError> {
    let mut clause = vec![];
    for word in line.split_whitespace() {
        match parse_literal(word, number)? {
            0 => clauses.push(mem::take(&mut clause)),
            lit => {
                let lit = Literal::new(lit.into());
                variables.insert(lit.variable);
                clause.push(lit);
            }
        }
    }
    if clause.is_empty() {
        Ok(())
    } else {
        Err(FormatError::UnterminatedClause { line: number })
    }
}

/// Reads a formula in DIMACS CNF.
///
/// Every line after the problem line holds clauses ended by `0`. Lines
/// starting with `c` are comments and a `%` line ends the input. The header
/// counts must match the distinct variables and the clauses actually read,
/// and no variable may exceed [`MAX_VARIABLE`].
pub fn load(reader: impl Read) -> Result<Cnf> {
    let mut header = None;
    let mut clauses = vec![];
    let mut variables = BTreeSet::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let line = line.trim();
        let Some(first) = line.chars().next() else {
            continue;
        };

        match first {
            'c' | 'C' => continue,
            // SATLIB benchmarks end with a `%` trailer
            '%' => break,
            'p' | 'P' => {
                if header.is_some() {
                    return Err(FormatError::DuplicateProblemLine { line: number }.into());
                }
                header = Some(parse_problem_line(line, number)?);
            }
            _ if header.is_none() => {
                let err = if first.is_ascii_digit() || first == '-' {
                    FormatError::ClauseBeforeProblemLine { line: number }
                } else {
                    FormatError::BadToken {
                        line: number,
                        token: line.split_whitespace().next().unwrap_or(line).to_string(),
                    }
                };
                return Err(err.into());
            }
            _ => read_clauses(line, number, &mut clauses, &mut variables)?,
        }
    }

    let (declared_vars, declared_clauses) = header.ok_or(FormatError::MissingProblemLine)?;
    if clauses.len() != declared_clauses || variables.len() != declared_vars {
        return Err(FormatError::CountMismatch {
            declared_vars,
            declared_clauses,
            found_vars: variables.len(),
            found_clauses: clauses.len(),
        }
        .into());
    }

    let mut cnf = Cnf::default();
    cnf.reserve_variables(declared_vars);
    for clause in clauses {
        cnf.add_clause(clause);
    }
    debug!("loaded {} variables, {} clauses", declared_vars, cnf.clause_count());
    Ok(cnf)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Cnf> {
    let file = File::open(path.as_ref())?;
    load(file)
}

/// Writes the active clauses of `cnf`, literals in ascending order.
pub fn save(cnf: &Cnf, writer: impl Write) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "p cnf {} {}", cnf.variable_count(), cnf.active_clause_count())?;
    for (_, literals) in cnf.clauses() {
        for lit in literals {
            write!(writer, "{lit} ")?;
        }
        writeln!(writer, "0")?;
    }
    writer.flush()
}

pub fn save_file(cnf: &Cnf, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    save(cnf, file).map_err(Error::from)
}

pub fn write_solution(writer: &mut impl Write, solution: &Solution) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "c Solved by satplan.")?;

    let solution_str = match solution {
        Solution::Sat { .. } => "SATISFIABLE",
        Solution::Unknown => "UNKNOWN",
    };
    writeln!(writer, "s {solution_str}")?;

    if let Solution::Sat { model } = solution {
        const PER_LINE: usize = 10;
        for chunk in model.model().chunks(PER_LINE) {
            let chunk_str = chunk
                .iter()
                .fold(String::new(), |str, lit| str + &lit.to_string() + " ");
            writeln!(writer, "v {chunk_str}")?;
        }
        writeln!(writer, "v 0")?;
    }
    writer.flush()
}
