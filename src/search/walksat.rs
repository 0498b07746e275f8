use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{choose_lowest, Candidate, LocalSearch, SearchParams, SearchState};
use crate::sat::{Assignment, Cnf};

/// WalkSat: repair a random unsatisfied clause, preferring flips that break
/// nothing, otherwise a random or a least-breaking flip.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkSat {
    params: SearchParams,
}

impl WalkSat {
    pub fn new(params: SearchParams) -> Self {
        WalkSat { params }
    }
}

impl LocalSearch for WalkSat {
    fn name(&self) -> &'static str {
        "WalkSat"
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
        let &clause = state.unsatisfied.choose(rng)?;
        let variables: BTreeSet<usize> =
            cnf.clause(clause)?.iter().map(|lit| lit.variable).collect();

        let mut currently_unsatisfied = vec![false; cnf.clause_count()];
        for &id in &state.unsatisfied {
            currently_unsatisfied[id] = true;
        }

        let mut candidates = Vec::with_capacity(variables.len());
        let mut breaks = Vec::with_capacity(variables.len());
        for variable in variables {
            let candidate = Candidate::flip(cnf, &state.assignment, variable);
            if candidate.is_satisfying() {
                return Some(candidate.assignment);
            }
            // Break count: satisfied clauses this flip would falsify.
            breaks.push(
                candidate
                    .unsatisfied
                    .iter()
                    .filter(|&&id| !currently_unsatisfied[id])
                    .count(),
            );
            candidates.push(candidate);
        }

        let free: Vec<usize> = (0..breaks.len()).filter(|&i| breaks[i] == 0).collect();
        let pick = if let Some(&i) = free.choose(rng) {
            i
        } else if rng.gen_bool(self.params.noise()) {
            rng.gen_range(0..candidates.len())
        } else {
            choose_lowest(&breaks, rng)?
        };

        *state = candidates.swap_remove(pick).into_state();
        None
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::WalkSat;
    use crate::sat::{Assignment, Cnf};
    use crate::search::{LocalSearch, NoopObserver, SearchParams, SearchState};

    #[test]
    fn free_flip_is_taken() {
        // All false leaves clauses 0 and 2 unsatisfied. Flipping x1 or x3
        // falsifies a unit clause, flipping x2 or x4 breaks nothing.
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1], vec![3, 4], vec![-3]]);
        let state = SearchState::new(&cnf, Assignment::new(4));
        assert_eq!(state.unsatisfied, vec![0, 2]);

        let walksat = WalkSat::new(SearchParams::new(1.0, 1, 1).unwrap());
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut stepped = state.clone();
            assert!(walksat.step(&cnf, &mut stepped, &mut rng).is_none());
            let moved = (stepped.assignment.model(), stepped.unsatisfied);
            assert!(
                moved == (vec![-1, 2, -3, -4], vec![2]) || moved == (vec![-1, -2, -3, 4], vec![0]),
                "unexpected move {moved:?}"
            );
        }
    }

    #[test]
    fn satisfying_flip_is_returned() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-2]]);
        let mut state = SearchState::new(&cnf, Assignment::new(2));
        let mut rng = StdRng::seed_from_u64(9);
        let walksat = WalkSat::new(SearchParams::default());
        let model = walksat.step(&cnf, &mut state, &mut rng).unwrap();
        assert_eq!(model.model(), vec![1, -2]);
    }

    #[test]
    fn greedy_walk_without_noise_solves_a_chain() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 3], vec![-3, 4], vec![-4, -2], vec![2, 4]]);
        let walksat = WalkSat::new(SearchParams::new(0.0, 100, 200).unwrap());
        let mut rng = StdRng::seed_from_u64(4);
        let model = walksat.solve(&cnf, &mut rng, &mut NoopObserver).unwrap();
        assert!(cnf.check_assignment(&model));
    }
}
