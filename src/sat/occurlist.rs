use std::collections::BTreeSet;
use std::mem;

use super::literal::Literal;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccurLists {
    positive: Vec<BTreeSet<usize>>, // positive[k]: clauses containing +k
    negative: Vec<BTreeSet<usize>>, // negative[k]: clauses containing -k
    either: Vec<BTreeSet<usize>>,   // either[k]: clauses containing +k or -k
}

impl OccurLists {
    pub fn new(n: usize) -> OccurLists {
        OccurLists {
            positive: vec![BTreeSet::new(); n + 1],
            negative: vec![BTreeSet::new(); n + 1],
            either: vec![BTreeSet::new(); n + 1],
        }
    }

    pub fn num_vars(&self) -> usize {
        self.either.len().saturating_sub(1)
    }

    pub fn grow(&mut self, variable: usize) {
        if variable > self.num_vars() {
            self.positive.resize(variable + 1, BTreeSet::new());
            self.negative.resize(variable + 1, BTreeSet::new());
            self.either.resize(variable + 1, BTreeSet::new());
        }
    }

    pub fn get(&self, lit: Literal) -> &BTreeSet<usize> {
        if lit.polarity {
            &self.positive[lit.variable]
        } else {
            &self.negative[lit.variable]
        }
    }

    fn get_mut(&mut self, lit: Literal) -> &mut BTreeSet<usize> {
        if lit.polarity {
            &mut self.positive[lit.variable]
        } else {
            &mut self.negative[lit.variable]
        }
    }

    pub fn of_variable(&self, variable: usize) -> &BTreeSet<usize> {
        &self.either[variable]
    }

    pub fn contains(&self, lit: Literal) -> bool {
        lit.variable <= self.num_vars() && !self.get(lit).is_empty()
    }

    pub fn take(&mut self, lit: Literal) -> BTreeSet<usize> {
        mem::take(self.get_mut(lit))
    }

    pub fn add_clause_to_lit(&mut self, clause: usize, lit: Literal) {
        self.get_mut(lit).insert(clause);
        self.either[lit.variable].insert(clause);
    }

    /// Drops `clause` from the list of `lit`. The variable entry goes only
    /// once the clause holds neither polarity any more.
    pub fn remove_clause_from_lit(&mut self, clause: usize, lit: Literal) {
        self.get_mut(lit).remove(&clause);
        if !self.get(lit.negate()).contains(&clause) {
            self.either[lit.variable].remove(&clause);
        }
    }

    pub fn detach_variable(&mut self, clause: usize, lit: Literal) {
        if !self.get(lit.negate()).contains(&clause) {
            self.either[lit.variable].remove(&clause);
        }
    }
}
