use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use satplan::{
    encoding::Encoding,
    parser,
    sat::{Assignment, Cnf},
    search::{parallel, Algorithm, NoopObserver, SearchParams},
};

const ALGORITHMS: [Algorithm; 2] = [Algorithm::WalkSat, Algorithm::GSat];

/// Random 3-SAT clauses all satisfied by a hidden assignment.
fn planted(num_vars: usize, num_clauses: usize, rng: &mut StdRng) -> Vec<Vec<i64>> {
    let hidden: Vec<bool> = (0..num_vars).map(|_| rng.gen()).collect();
    let mut clauses = vec![];
    while clauses.len() < num_clauses {
        let clause: Vec<i64> = sample(rng, num_vars, 3)
            .into_iter()
            .map(|index| {
                let variable = index as i64 + 1;
                if rng.gen() {
                    variable
                } else {
                    -variable
                }
            })
            .collect();
        let satisfied = clause
            .iter()
            .any(|&lit| hidden[lit.unsigned_abs() as usize - 1] == (lit > 0));
        if satisfied {
            clauses.push(clause);
        }
    }
    clauses
}

fn solve(algorithm: Algorithm, cnf: &Cnf, params: &SearchParams, seed: u64) -> Option<Assignment> {
    let mut rng = StdRng::seed_from_u64(seed);
    algorithm.solve(cnf, params, &mut rng, &mut NoopObserver)
}

#[test]
fn small_scenario_returns_a_model_of_the_formula() {
    let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 2], vec![1, -2]]);
    let params = SearchParams::new(0.5, 100, 100).unwrap();
    let allowed = [vec![1, 2], vec![-1, 2]];
    for algorithm in ALGORITHMS {
        for seed in 0..10 {
            if let Some(model) = solve(algorithm, &cnf, &params, seed) {
                assert!(cnf.check_assignment(&model));
                assert!(allowed.contains(&model.model()));
            }
        }
    }
}

#[test]
fn two_units_are_found_almost_always() {
    let cnf = Cnf::new(vec![vec![1], vec![2]]);
    let params = SearchParams::new(0.5, 10, 50).unwrap();
    for algorithm in ALGORITHMS {
        let successes = (0..100)
            .filter(|&seed| solve(algorithm, &cnf, &params, seed).is_some())
            .count();
        assert!(successes >= 95, "{algorithm:?} succeeded {successes} times");
    }
}

#[test]
fn contradiction_is_reported_as_failure() {
    let cnf = Cnf::new(vec![vec![1], vec![-1]]);
    for (flips, restarts) in [(0, 0), (0, 5), (1, 1), (20, 10)] {
        let params = SearchParams::new(0.3, flips, restarts).unwrap();
        for algorithm in ALGORITHMS {
            assert!(solve(algorithm, &cnf, &params, 1).is_none());
        }
    }
}

#[test]
fn planted_three_sat() {
    let mut rng = StdRng::seed_from_u64(2024);
    let params = SearchParams::new(0.5, 1000, 50).unwrap();
    for instance in 0..5 {
        let cnf = Cnf::new(planted(20, 60, &mut rng));
        for algorithm in ALGORITHMS {
            let model = solve(algorithm, &cnf, &params, instance)
                .unwrap_or_else(|| panic!("{algorithm:?} found no model for instance {instance}"));
            assert_eq!(model.len(), cnf.num_vars());
            assert!(cnf.check_assignment(&model));
        }
    }
}

#[test]
fn seeded_runs_repeat() {
    let mut rng = StdRng::seed_from_u64(8);
    let cnf = Cnf::new(planted(15, 45, &mut rng));
    let params = SearchParams::default();
    for algorithm in ALGORITHMS {
        let first = solve(algorithm, &cnf, &params, 99);
        let second = solve(algorithm, &cnf, &params, 99);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}

#[test]
fn parallel_workers_solve_planted_instances() {
    let mut rng = StdRng::seed_from_u64(31);
    let cnf = Cnf::new(planted(25, 80, &mut rng));
    let params = SearchParams::new(0.5, 1000, 40).unwrap();
    for algorithm in ALGORITHMS {
        let model = parallel::solve(&cnf, algorithm, params, Some(4), Some(5)).unwrap();
        assert!(cnf.check_assignment(&model));
    }
}

#[test]
fn loaded_file_is_solved() {
    let input = b"c small satlib style instance\n\
                  p cnf 4 5\n\
                  1 -2 3 0\n\
                  -1 2 0\n\
                  2 4 0\n\
                  -3 -4 0\n\
                  -1 -2 -4 0\n\
                  %\n\
                  0\n";
    let cnf = parser::load(&input[..]).unwrap();
    let params = SearchParams::new(0.44, 200, 100).unwrap();
    for algorithm in ALGORITHMS {
        let model = solve(algorithm, &cnf, &params, 3).unwrap();
        assert!(cnf.check_assignment(&model));
    }
}

#[test]
fn search_on_a_simplified_copy_solves_the_original() {
    let pristine = Cnf::new(vec![
        vec![1],
        vec![-1, 2],
        vec![-2, 3, 4],
        vec![-3, -4],
        vec![5, 6],
        vec![5, -6],
        vec![-4, 7],
    ]);
    let mut cnf = pristine.clone();
    assert!(cnf.resolve_unit_clauses());
    assert!(cnf.resolve_pure_literals());
    assert_eq!(cnf.num_vars(), pristine.num_vars());
    assert!(cnf.active_clause_count() < pristine.active_clause_count());

    let params = SearchParams::new(0.5, 100, 100).unwrap();
    for algorithm in ALGORITHMS {
        let mut model = solve(algorithm, &cnf, &params, 12).unwrap();
        model.apply_partial(cnf.assignment());
        assert!(pristine.check_assignment(&model));
    }
}

#[test]
fn named_encoding_round_trip_to_a_plan() {
    // One step: either pick up the block or wait; the goal needs it held.
    let encoding = Encoding::new(["pickup-1", "wait-1", "clear-0", "holding-0", "holding-1"]);
    let clauses = vec![
        vec!["clear-0"],
        vec!["NOT holding-0"],
        vec!["holding-1"],
        vec!["NOT pickup-1", "clear-0"],
        vec!["NOT pickup-1", "holding-1"],
        vec!["pickup-1", "wait-1"],
        vec!["NOT pickup-1", "NOT wait-1"],
        vec!["NOT holding-1", "holding-0", "pickup-1"],
    ];
    let cnf = encoding.to_cnf(clauses).unwrap();

    let params = SearchParams::default();
    for algorithm in ALGORITHMS {
        let model = solve(algorithm, &cnf, &params, 0).unwrap();
        assert_eq!(encoding.extract_plan(&model, 2), vec!["pickup-1"]);
    }
}
