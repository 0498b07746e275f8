use std::collections::BTreeSet;
use std::mem;

use log::trace;

use super::clause::ClauseSlot;
use super::literal::Literal;
use super::occurlist::OccurLists;

/// Something that can answer "which value does variable `v` have", possibly
/// leaving some variables unassigned.
pub trait Valuation {
    fn num_vars(&self) -> usize;
    fn value(&self, variable: usize) -> Option<bool>;
}

impl Valuation for [Option<bool>] {
    fn num_vars(&self) -> usize {
        self.len()
    }

    fn value(&self, variable: usize) -> Option<bool> {
        self.get(variable.checked_sub(1)?).copied().flatten()
    }
}

impl Valuation for Vec<Option<bool>> {
    fn num_vars(&self) -> usize {
        self.len()
    }

    fn value(&self, variable: usize) -> Option<bool> {
        self.as_slice().value(variable)
    }
}

/// A formula in conjunctive normal form with live occurrence indices.
///
/// Clause ids are positions in the arena and never change. Every mutation
/// keeps the literal/variable occurrence lists, the unit, empty and pure sets
/// in sync with the active clauses. Simplification is destructive: clone
/// first when the unsimplified formula is still needed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cnf {
    clauses: Vec<ClauseSlot>,
    occurrences: OccurLists,
    unit_clauses: BTreeSet<usize>,
    empty_clauses: BTreeSet<usize>,
    pure_literals: BTreeSet<Literal>,
    satisfied_clauses: BTreeSet<usize>,
    assignment: Vec<Option<bool>>,
}

impl Cnf {
    pub fn new<I, C>(clauses: I) -> Cnf
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i64>,
    {
        let mut cnf = Cnf::default();
        for clause in clauses {
            cnf.add_clause(clause.into_iter().map(Literal::new));
        }
        cnf
    }

    /// Appends a clause and returns its id. Duplicate literals collapse.
    pub fn add_clause(&mut self, literals: impl IntoIterator<Item = Literal>) -> usize {
        let id = self.clauses.len();
        self.clauses.push(ClauseSlot::Active(BTreeSet::new()));
        self.refresh_clause(id);
        for lit in literals {
            self.add_literal_to_clause(id, lit);
        }
        id
    }

    pub fn reserve_variables(&mut self, variable: usize) {
        self.occurrences.grow(variable);
        if self.assignment.len() < variable {
            self.assignment.resize(variable, None);
        }
    }

    fn add_literal_to_clause(&mut self, id: usize, lit: Literal) {
        self.reserve_variables(lit.variable);
        let ClauseSlot::Active(literals) = &mut self.clauses[id] else {
            return;
        };
        if literals.insert(lit) {
            self.occurrences.add_clause_to_lit(id, lit);
            self.refresh_purity(lit.variable);
            self.refresh_clause(id);
        }
    }

    fn refresh_clause(&mut self, id: usize) {
        match self.clauses[id].literals().map(BTreeSet::len) {
            Some(0) => {
                self.unit_clauses.remove(&id);
                self.empty_clauses.insert(id);
            }
            Some(1) => {
                self.unit_clauses.insert(id);
                self.empty_clauses.remove(&id);
            }
            _ => {
                self.unit_clauses.remove(&id);
                self.empty_clauses.remove(&id);
            }
        }
    }

    fn refresh_purity(&mut self, variable: usize) {
        for lit in [Literal::positive(variable), Literal::positive(variable).negate()] {
            if self.occurrences.contains(lit) && !self.occurrences.contains(lit.negate()) {
                self.pure_literals.insert(lit);
            } else {
                self.pure_literals.remove(&lit);
            }
        }
    }

    fn remove_clause(&mut self, id: usize) {
        let ClauseSlot::Active(literals) = mem::replace(&mut self.clauses[id], ClauseSlot::Removed)
        else {
            return;
        };
        for lit in literals {
            self.occurrences.remove_clause_from_lit(id, lit);
            self.refresh_purity(lit.variable);
        }
        self.unit_clauses.remove(&id);
        self.empty_clauses.remove(&id);
        self.satisfied_clauses.insert(id);
    }

    fn remove_literal_from_clauses(&mut self, lit: Literal) {
        for id in self.occurrences.take(lit) {
            if let ClauseSlot::Active(literals) = &mut self.clauses[id] {
                literals.remove(&lit);
            }
            self.occurrences.detach_variable(id, lit);
            self.refresh_clause(id);
        }
        self.refresh_purity(lit.variable);
    }

    /// Commits `lit` to true: clauses holding it are satisfied and removed,
    /// then `-lit` is struck from the rest.
    ///
    /// Returns false when some clause became empty. Panics when the variable
    /// is outside `1..=num_vars()` or already committed to the other value.
    pub fn set_literal(&mut self, lit: Literal) -> bool {
        assert!(
            (1..=self.num_vars()).contains(&lit.variable),
            "variable {} out of range 1..={}",
            lit.variable,
            self.num_vars()
        );
        let committed = &mut self.assignment[lit.variable - 1];
        assert!(
            committed.map_or(true, |value| value == lit.polarity),
            "variable {} already committed to the opposite value",
            lit.variable
        );
        trace!("set literal {}", lit);
        *committed = Some(lit.polarity);

        // Satisfied clauses must go before -lit is struck, or they would shrink.
        let satisfied: Vec<usize> = self.occurrences.get(lit).iter().copied().collect();
        for id in satisfied {
            self.remove_clause(id);
        }
        self.remove_literal_from_clauses(lit.negate());

        self.empty_clauses.is_empty()
    }

    pub fn set_variable(&mut self, variable: usize, value: bool) -> bool {
        self.set_literal(Literal { variable, polarity: value })
    }

    fn next_unit_literal(&self) -> Option<Literal> {
        self.unit_clauses
            .iter()
            .find_map(|&id| self.clauses[id].first())
    }

    /// Unit propagation to a fixpoint. Stops at the first conflict.
    pub fn resolve_unit_clauses(&mut self) -> bool {
        while let Some(lit) = self.next_unit_literal() {
            if !self.set_literal(lit) {
                return false;
            }
        }
        self.empty_clauses.is_empty()
    }

    pub fn resolve_pure_literals(&mut self) -> bool {
        while let Some(&lit) = self.pure_literals.first() {
            if !self.set_literal(lit) {
                return false;
            }
        }
        self.empty_clauses.is_empty()
    }

    /// True when every active clause has a literal made true by `valuation`.
    pub fn check_assignment<V: Valuation + ?Sized>(&self, valuation: &V) -> bool {
        self.evaluate(valuation).is_none()
    }

    /// Ids of the active clauses `valuation` leaves unsatisfied, in id order.
    /// Empty iff `check_assignment` holds.
    pub fn unsatisfied_clauses<V: Valuation + ?Sized>(&self, valuation: &V) -> Vec<usize> {
        self.evaluate(valuation).unwrap_or_default()
    }

    fn evaluate<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<Vec<usize>> {
        let mut remaining = self.active_clause_count();
        if remaining == 0 {
            return None;
        }
        let mut satisfied = vec![false; self.clauses.len()];
        for variable in 1..=valuation.num_vars().min(self.num_vars()) {
            let Some(value) = valuation.value(variable) else {
                continue;
            };
            let lit = Literal {
                variable,
                polarity: value,
            };
            for &id in self.occurrences.get(lit) {
                if !satisfied[id] {
                    satisfied[id] = true;
                    remaining -= 1;
                    if remaining == 0 {
                        return None;
                    }
                }
            }
        }
        Some(
            self.clauses
                .iter()
                .enumerate()
                .filter(|(id, slot)| slot.is_active() && !satisfied[*id])
                .map(|(id, _)| id)
                .collect(),
        )
    }

    pub fn num_vars(&self) -> usize {
        self.occurrences.num_vars()
    }

    pub fn variables(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.num_vars()).filter(|&variable| !self.occurrences.of_variable(variable).is_empty())
    }

    pub fn variable_count(&self) -> usize {
        self.variables().count()
    }

    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        (1..=self.num_vars())
            .flat_map(|variable| {
                let lit = Literal::positive(variable);
                [lit.negate(), lit]
            })
            .filter(|&lit| self.occurrences.contains(lit))
    }

    pub fn literal_count(&self) -> usize {
        self.literals().count()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn active_clause_count(&self) -> usize {
        self.clauses.len() - self.satisfied_clauses.len()
    }

    pub fn slot(&self, id: usize) -> &ClauseSlot {
        &self.clauses[id]
    }

    pub fn clause(&self, id: usize) -> Option<&BTreeSet<Literal>> {
        self.clauses.get(id).and_then(ClauseSlot::literals)
    }

    pub fn clauses(&self) -> impl Iterator<Item = (usize, &BTreeSet<Literal>)> {
        self.clauses
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.literals().map(|literals| (id, literals)))
    }

    pub fn clauses_with_literal(&self, lit: Literal) -> Option<&BTreeSet<usize>> {
        self.occurrences
            .contains(lit)
            .then(|| self.occurrences.get(lit))
    }

    pub fn clauses_with_variable(&self, variable: usize) -> Option<&BTreeSet<usize>> {
        (1..=self.num_vars())
            .contains(&variable)
            .then(|| self.occurrences.of_variable(variable))
            .filter(|clauses| !clauses.is_empty())
    }

    pub fn unit_clauses(&self) -> &BTreeSet<usize> {
        &self.unit_clauses
    }

    pub fn empty_clauses(&self) -> &BTreeSet<usize> {
        &self.empty_clauses
    }

    pub fn pure_literals(&self) -> &BTreeSet<Literal> {
        &self.pure_literals
    }

    pub fn satisfied_clauses(&self) -> &BTreeSet<usize> {
        &self.satisfied_clauses
    }

    /// Values committed so far by `set_literal`, indexed by variable - 1.
    pub fn assignment(&self) -> &[Option<bool>] {
        &self.assignment
    }
}
