use log::{debug, info};

// For Testing
use mockall::automock;

use super::SearchParams;

/// Receives progress narration from a local search and may ask it to stop.
///
/// Every hook has an empty default so implementations pick what they need.
#[automock]
pub trait SearchObserver {
    fn on_start(&mut self, _algorithm: &str, _params: &SearchParams) {}
    fn on_restart(&mut self, _restart: usize, _unsatisfied: usize) {}
    fn on_solution(&mut self, _restart: usize, _flips: usize) {}
    /// Called when the budget ran out or the search was stopped.
    fn on_exhausted(&mut self, _restarts: usize) {}
    /// Checked before every restart and after every flip.
    fn stop(&self) -> bool {
        false
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

#[derive(Debug, Default, Clone)]
pub struct LogObserver {
    algorithm: String,
    max_flips: usize,
}

impl SearchObserver for LogObserver {
    fn on_start(&mut self, algorithm: &str, params: &SearchParams) {
        self.algorithm = algorithm.to_string();
        self.max_flips = params.max_flips();
        info!(
            "Performing {} with p = {}, max_flips = {}, max_restarts = {}",
            algorithm,
            params.noise(),
            params.max_flips(),
            params.max_restarts()
        );
    }

    fn on_restart(&mut self, restart: usize, unsatisfied: usize) {
        debug!("restart {}: {} unsatisfied clauses", restart, unsatisfied);
    }

    fn on_solution(&mut self, restart: usize, flips: usize) {
        info!(
            "Found satisfying assignment in {} flips after {} restarts",
            flips, restart
        );
    }

    fn on_exhausted(&mut self, restarts: usize) {
        info!(
            "No satisfying assignment found in {} searches with {} flips in each search",
            restarts, self.max_flips
        );
        info!(
            "This does not mean the problem is unsatisfiable as {} is not a complete search",
            self.algorithm
        );
    }
}
