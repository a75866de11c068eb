use std::sync::Arc;

use talaria_optimizer::solver::{
    events::{event_recorder::EventRecorder, search_event::SearchEvent},
    solver::{Solver, search_solutions},
    solver_params::SolverAcceptorStrategy,
};

mod setup;

#[test]
fn test_single_job_round_trip() {
    let problem = Arc::new(setup::create_test_problem(
        setup::create_locations(&[(0.0, 0.0), (1.0, 1.0)]),
        setup::create_services(&[1], 1.0),
        vec![],
        setup::create_vehicles(&[0], 10.0),
    ));

    let solutions = search_solutions(Arc::clone(&problem), 20, vec![]).unwrap();
    let best = &solutions[0];

    assert_eq!(best.routes.len(), 1);
    assert_eq!(best.served_jobs_count(), 1);
    assert!(best.unassigned_jobs.is_empty());
    assert!((best.cost - 2.0 * 2.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_clusters_go_to_distinct_vehicles() {
    //  Two depots, each one next to its own cluster of four jobs
    //
    //        (9,4) (10,4)  <- v0 depot at (10,5)
    //        (9,6) (10,6)
    //
    //  (-10,-4) (-9,-4)    <- v1 depot at (-10,-5)
    //  (-10,-6) (-9,-6)
    let locations = [
        (10.0, 5.0),
        (-10.0, -5.0),
        (9.0, 4.0),
        (10.0, 4.0),
        (9.0, 6.0),
        (10.0, 6.0),
        (-10.0, -4.0),
        (-9.0, -4.0),
        (-10.0, -6.0),
        (-9.0, -6.0),
    ];
    let job_locations = [2, 3, 4, 5, 6, 7, 8, 9];

    let two_vehicles = Arc::new(setup::create_test_problem(
        setup::create_locations(&locations),
        setup::create_services(&job_locations, 1.0),
        vec![],
        setup::create_vehicles(&[0, 1], 10.0),
    ));
    let one_vehicle = Arc::new(setup::create_test_problem(
        setup::create_locations(&locations),
        setup::create_services(&job_locations, 1.0),
        vec![],
        setup::create_vehicles(&[0], 10.0),
    ));

    let mut solver = Solver::from_arc(Arc::clone(&two_vehicles), setup::create_params(7, 300))
        .unwrap();
    let solutions = solver.solve().unwrap();
    let best = &solutions[0];

    assert_eq!(best.routes.len(), 2);
    assert!(best.unassigned_jobs.is_empty());
    for route in &best.routes {
        let clusters = route
            .activities
            .iter()
            .filter_map(|activity| activity.job_id.as_deref())
            .map(|job_id| two_vehicles.job_index(job_id).unwrap().get() < 4)
            .collect::<Vec<_>>();
        assert_eq!(clusters.len(), 4);
        assert!(clusters.iter().all(|&east| east == clusters[0]));
    }

    let mut single = Solver::from_arc(one_vehicle, setup::create_params(7, 300)).unwrap();
    let single_best = &single.solve().unwrap()[0];
    assert!(single_best.unassigned_jobs.is_empty());
    assert!(best.cost < single_best.cost);
}

#[test]
fn test_jobs_over_capacity_stay_unassigned() {
    let problem = Arc::new(setup::create_test_problem(
        setup::create_location_grid(2, 2),
        setup::create_services(&[1, 2, 3], 2.0),
        vec![],
        setup::create_vehicles(&[0], 3.0),
    ));

    let solutions = search_solutions(Arc::clone(&problem), 50, vec![]).unwrap();
    let best = &solutions[0];

    assert_eq!(best.served_jobs_count(), 1);
    assert_eq!(best.unassigned_jobs.len(), 2);
    assert!(best.unassigned_jobs.iter().all(|job| !job.reasons.is_empty()));
    setup::assert_capacity_holds(&problem, best);
}

#[test]
fn test_solutions_cover_every_job_within_capacity() {
    let problem = Arc::new(setup::create_test_problem(
        setup::create_location_grid(4, 4),
        setup::create_services(&[1, 2, 5, 7, 9, 10, 13, 15], 2.0),
        setup::create_shipments(&[(3, 12), (6, 11), (14, 4)], 3.0),
        setup::create_vehicles(&[0, 0], 6.0),
    ));

    let mut solver =
        Solver::from_arc(Arc::clone(&problem), setup::create_params(11, 200)).unwrap();
    let solutions = solver.solve().unwrap();

    assert!(!solutions.is_empty());
    for solution in &solutions {
        setup::assert_covers_every_job(&problem, solution);
        setup::assert_capacity_holds(&problem, solution);
    }
    assert!(
        solutions
            .windows(2)
            .all(|pair| pair[0].cost <= pair[1].cost)
    );
}

fn accepted_costs(seed: u64) -> Vec<f64> {
    let problem = setup::create_test_problem(
        setup::create_location_grid(5, 5),
        setup::create_services(&[1, 3, 6, 8, 11, 14, 17, 19, 22, 24], 1.0),
        setup::create_shipments(&[(2, 20), (4, 15)], 1.0),
        setup::create_vehicles(&[0, 12], 5.0),
    );

    let recorder = Arc::new(EventRecorder::only(vec!["acceptance_decision"]));
    let mut solver = Solver::new(problem, setup::create_params(seed, 100)).unwrap();
    solver.subscribe(recorder.clone());
    solver.solve().unwrap();

    recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SearchEvent::AcceptanceDecision {
                cost,
                accepted: true,
                ..
            } => Some(cost),
            _ => None,
        })
        .collect()
}

#[test]
fn test_same_seed_same_accepted_costs() {
    let first = accepted_costs(42);
    let second = accepted_costs(42);

    assert!(!first.is_empty());
    assert_eq!(
        first.iter().map(|cost| cost.to_bits()).collect::<Vec<_>>(),
        second.iter().map(|cost| cost.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn test_greedy_best_cost_never_increases() {
    let problem = setup::create_test_problem(
        setup::create_location_grid(4, 4),
        setup::create_services(&[1, 2, 4, 6, 9, 11, 13, 14], 1.0),
        vec![],
        setup::create_vehicles(&[0, 15], 5.0),
    );

    let mut params = setup::create_params(3, 150);
    params.solver_acceptor = SolverAcceptorStrategy::Greedy;

    let recorder = Arc::new(EventRecorder::only(vec!["new_best_solution"]));
    let mut solver = Solver::new(problem, params).unwrap();
    solver.subscribe(recorder.clone());
    let solutions = solver.solve().unwrap();

    let best_costs = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SearchEvent::NewBestSolution { cost, .. } => Some(cost),
            _ => None,
        })
        .collect::<Vec<_>>();

    assert!(!best_costs.is_empty());
    assert!(best_costs.windows(2).all(|pair| pair[1] <= pair[0]));
    assert_eq!(best_costs.last().copied(), Some(solutions[0].cost));
}
