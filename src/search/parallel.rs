use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::thread;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Algorithm, LogObserver, SearchObserver, SearchParams};
use crate::sat::{Assignment, Cnf};

// forwards to inner, stops once flag is raised
pub struct CancelObserver<'a, O> {
    inner: O,
    flag: &'a AtomicBool,
}

impl<'a, O: SearchObserver> CancelObserver<'a, O> {
    pub fn new(inner: O, flag: &'a AtomicBool) -> Self {
        CancelObserver { inner, flag }
    }
}

impl<O: SearchObserver> SearchObserver for CancelObserver<'_, O> {
    fn on_start(&mut self, algorithm: &str, params: &SearchParams) {
        self.inner.on_start(algorithm, params);
    }

    fn on_restart(&mut self, restart: usize, unsatisfied: usize) {
        self.inner.on_restart(restart, unsatisfied);
    }

    fn on_solution(&mut self, restart: usize, flips: usize) {
        self.inner.on_solution(restart, flips);
    }

    fn on_exhausted(&mut self, restarts: usize) {
        // a sibling found the model, failing here is not news
        if !self.flag.load(Ordering::Relaxed) {
            self.inner.on_exhausted(restarts);
        }
    }

    fn stop(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.inner.stop()
    }
}

// Never more workers than restarts, so the total stays within the budget.
fn split_restarts(max_restarts: usize, n: usize) -> (usize, usize) {
    let n = n.clamp(1, max_restarts.max(1));
    (n, max_restarts.div_ceil(n))
}

/// Races `n` workers over the shared formula and returns the first model.
///
/// Each worker owns its generator, seeded from `seed + worker` when a seed is
/// given, and runs its share of the restart budget. The other workers are
/// cancelled as soon as one succeeds.
pub fn solve(
    cnf: &Cnf,
    algorithm: Algorithm,
    params: SearchParams,
    n: Option<usize>,
    seed: Option<u64>,
) -> Option<Assignment> {
    let n = n.unwrap_or(
        thread::available_parallelism()
            .map(|val| val.get())
            .unwrap_or(2),
    );
    let (n, restarts) = split_restarts(params.max_restarts(), n);
    let worker_params = params.with_max_restarts(restarts);
    let found = AtomicBool::new(false);

    let (tx, rx) = channel::<Assignment>();

    thread::scope(|scope| {
        for worker in 0..n {
            let worker_tx = tx.clone();
            let found = &found;
            scope.spawn(move || {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker as u64)),
                    None => StdRng::from_entropy(),
                };
                let mut observer = CancelObserver::new(LogObserver::default(), found);
                if let Some(model) = algorithm.solve(cnf, &worker_params, &mut rng, &mut observer) {
                    debug!("worker {} found a model", worker);
                    found.store(true, Ordering::Relaxed);
                    let _ = worker_tx.send(model);
                }
            });
        }

        // receiver blocks as long as some transmitter is alive
        drop(tx);
        rx.recv().ok()
    })
}
