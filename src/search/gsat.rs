use rand::seq::SliceRandom;
use rand::Rng;

use super::{choose_lowest, Candidate, LocalSearch, SearchParams, SearchState};
use crate::sat::{Assignment, Cnf, Literal};

/// GSat: score every variable flip by the unsatisfied clauses it leaves and
/// take a best one, or with probability `noise` a random-walk flip.
#[derive(Clone, Copy, Debug, Default)]
pub struct GSat {
    params: SearchParams,
}

impl GSat {
    pub fn new(params: SearchParams) -> Self {
        GSat { params }
    }
}

impl LocalSearch for GSat {
    fn name(&self) -> &'static str {
        "GSat"
    }

    fn params(&self) -> &SearchParams {
        &self.params
    }

    fn step<R: Rng + ?Sized>(
        &self,
        cnf: &Cnf,
        state: &mut SearchState,
        rng: &mut R,
    ) -> Option<Assignment> {
        let mut candidates = Vec::new();
        for variable in cnf.variables() {
            let candidate = Candidate::flip(cnf, &state.assignment, variable);
            if candidate.is_satisfying() {
                return Some(candidate.assignment);
            }
            candidates.push(candidate);
        }

        if rng.gen_bool(self.params.noise()) {
            let &clause = state.unsatisfied.choose(rng)?;
            let literals: Vec<Literal> = cnf.clause(clause)?.iter().copied().collect();
            let lit = literals.choose(rng)?;
            let candidate = Candidate::flip(cnf, &state.assignment, lit.variable);
            if candidate.is_satisfying() {
                return Some(candidate.assignment);
            }
            *state = candidate.into_state();
        } else {
            let scores: Vec<usize> = candidates.iter().map(|c| c.unsatisfied.len()).collect();
            let pick = choose_lowest(&scores, rng)?;
            *state = candidates.swap_remove(pick).into_state();
        }
        None
    }
}
