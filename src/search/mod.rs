//! Incomplete stochastic local search over a fixed formula.
//!
//! Both solvers redraw a uniformly random assignment on every restart and
//! never touch the formula, so failing to find a model only means the budget
//! ran out. It is not a proof of unsatisfiability.

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::sat::{Assignment, Cnf};

mod gsat;
mod observer;
pub mod parallel;
mod walksat;

pub use gsat::GSat;
pub use observer::{LogObserver, MockSearchObserver, NoopObserver, SearchObserver};
pub use walksat::WalkSat;

#[derive(Debug)]
pub enum Solution {
    Sat { model: Assignment },
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams {
    noise: f64,
    max_flips: usize,
    max_restarts: usize,
}

impl SearchParams {
    pub fn new(noise: f64, max_flips: usize, max_restarts: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(Error::InvalidNoise(noise));
        }
        Ok(SearchParams {
            noise,
            max_flips,
            max_restarts,
        })
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn max_flips(&self) -> usize {
        self.max_flips
    }

    pub fn max_restarts(&self) -> usize {
        self.max_restarts
    }

    pub fn with_max_restarts(self, max_restarts: usize) -> Self {
        SearchParams {
            max_restarts,
            ..self
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            noise: 0.44,
            max_flips: 1000,
            max_restarts: 10000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchState {
    pub assignment: Assignment,
    pub unsatisfied: Vec<usize>,
}

impl SearchState {
    pub fn new(cnf: &Cnf, assignment: Assignment) -> Self {
        let unsatisfied = cnf.unsatisfied_clauses(&assignment);
        SearchState {
            assignment,
            unsatisfied,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied.is_empty()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Candidate {
    pub assignment: Assignment,
    pub unsatisfied: Vec<usize>,
}

impl Candidate {
    pub fn flip(cnf: &Cnf, current: &Assignment, variable: usize) -> Self {
        let assignment = current.flipped(variable);
        let unsatisfied = cnf.unsatisfied_clauses(&assignment);
        Candidate {
            assignment,
            unsatisfied,
        }
    }

    pub fn is_satisfying(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    pub fn into_state(self) -> SearchState {
        SearchState {
            assignment: self.assignment,
            unsatisfied: self.unsatisfied,
        }
    }
}

/// Position of a uniformly chosen minimum of `scores`.
pub(crate) fn choose_lowest<R: Rng + ?Sized>(scores: &[usize], rng: &mut R) -> Option<usize> {
    let min = scores.iter().min()?;
    let lowest: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, score)| *score == min)
        .map(|(index, _)| index)
        .collect();
    lowest.choose(rng).copied()
}

/// One inner step of a local search.
pub trait LocalSearch {
    fn name(&self) -> &'static str;

    fn params(&self) -> &SearchParams;

    /// Moves `state` by one flip. `state` has at least one unsatisfied
    /// clause on entry. Returns the first satisfying assignment met on the
    /// way, leaving `state` untouched in that case.
    fn step<R: Rng + ?Sized>(
        &self,
        cnf: &Cnf,
        state: &mut SearchState,
        rng: &mut R,
    ) -> Option<Assignment>;

    fn solve<R: Rng + ?Sized>(
        &self,
        cnf: &Cnf,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Option<Assignment>
    where
        Self: Sized,
    {
        search(self, cnf, rng, observer)
    }
}

/// The restart loop shared by every `LocalSearch`.
pub fn search<S, R>(
    strategy: &S,
    cnf: &Cnf,
    rng: &mut R,
    observer: &mut dyn SearchObserver,
) -> Option<Assignment>
where
    S: LocalSearch + ?Sized,
    R: Rng + ?Sized,
{
    let params = *strategy.params();
    observer.on_start(strategy.name(), &params);

    if !cnf.empty_clauses().is_empty() {
        warn!(
            "formula holds {} empty clauses, no flip can satisfy it",
            cnf.empty_clauses().len()
        );
        observer.on_exhausted(0);
        return None;
    }

    let mut restarts = 0;
    'restarts: while restarts < params.max_restarts() {
        if observer.stop() {
            break;
        }
        let restart = restarts;
        restarts += 1;

        let mut state = SearchState::new(cnf, Assignment::random(cnf.num_vars(), rng));
        if state.is_satisfied() {
            observer.on_solution(restart, 0);
            return Some(state.assignment);
        }
        observer.on_restart(restart, state.unsatisfied.len());

        for flip in 0..params.max_flips() {
            if let Some(model) = strategy.step(cnf, &mut state, rng) {
                observer.on_solution(restart, flip + 1);
                return Some(model);
            }
            if observer.stop() {
                break 'restarts;
            }
        }
    }

    observer.on_exhausted(restarts);
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    #[value(name = "walksat")]
    WalkSat,
    #[value(name = "gsat")]
    GSat,
}

impl Algorithm {
    pub fn solve<R: Rng + ?Sized>(
        self,
        cnf: &Cnf,
        params: &SearchParams,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Option<Assignment> {
        match self {
            Algorithm::WalkSat => WalkSat::new(*params).solve(cnf, rng, observer),
            Algorithm::GSat => GSat::new(*params).solve(cnf, rng, observer),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{choose_lowest, Algorithm, MockSearchObserver, SearchParams};
    use crate::error::Error;
    use crate::sat::Cnf;

    #[test]
    fn noise_must_be_a_probability() {
        assert!(matches!(SearchParams::new(1.5, 10, 10), Err(Error::InvalidNoise(_))));
        assert!(matches!(SearchParams::new(-0.1, 10, 10), Err(Error::InvalidNoise(_))));
        assert!(SearchParams::new(0.0, 10, 10).is_ok());
        assert!(SearchParams::new(1.0, 10, 10).is_ok());
    }

    #[test]
    fn lowest_ties_are_all_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let scores = [4, 1, 7, 1, 1];
        let mut seen = [false; 5];
        for _ in 0..100 {
            let index = choose_lowest(&scores, &mut rng).unwrap();
            assert_eq!(scores[index], 1);
            seen[index] = true;
        }
        assert_eq!(seen, [false, true, false, true, true]);
        assert_eq!(choose_lowest(&[], &mut rng), None);
    }

    #[test]
    fn observer_hears_every_restart_of_an_exhausted_search() {
        let cnf = Cnf::new(vec![vec![1], vec![-1]]);
        let params = SearchParams::new(0.5, 5, 3).unwrap();
        for algorithm in [Algorithm::WalkSat, Algorithm::GSat] {
            let mut observer = MockSearchObserver::new();
            observer.expect_on_start().times(1).return_const(());
            observer.expect_stop().return_const(false);
            observer.expect_on_restart().times(3).return_const(());
            observer.expect_on_solution().times(0);
            observer
                .expect_on_exhausted()
                .with(eq(3))
                .times(1)
                .return_const(());

            let mut rng = StdRng::seed_from_u64(11);
            assert!(algorithm.solve(&cnf, &params, &mut rng, &mut observer).is_none());
        }
    }

    #[test]
    fn stop_request_ends_the_search() {
        let cnf = Cnf::new(vec![vec![1], vec![-1]]);
        let params = SearchParams::new(0.5, 1000, 1000).unwrap();
        let mut observer = MockSearchObserver::new();
        observer.expect_on_start().return_const(());
        observer.expect_on_restart().times(1).return_const(());
        let mut calls = 0;
        // First check lets the restart begin, the one after the first flip stops it.
        observer.expect_stop().returning(move || {
            calls += 1;
            calls > 1
        });
        observer
            .expect_on_exhausted()
            .with(eq(1))
            .times(1)
            .return_const(());

        let mut rng = StdRng::seed_from_u64(2);
        assert!(Algorithm::WalkSat
            .solve(&cnf, &params, &mut rng, &mut observer)
            .is_none());
    }

    #[test]
    fn empty_clause_gives_up_at_once() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![]]);
        let mut observer = MockSearchObserver::new();
        observer.expect_on_start().return_const(());
        observer.expect_on_restart().times(0);
        observer
            .expect_on_exhausted()
            .with(eq(0))
            .times(1)
            .return_const(());

        let mut rng = StdRng::seed_from_u64(5);
        let params = SearchParams::default();
        assert!(Algorithm::GSat
            .solve(&cnf, &params, &mut rng, &mut observer)
            .is_none());
    }
}
