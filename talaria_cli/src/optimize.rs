use std::{fs::File, io::BufReader, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Args;
use comfy_table::Table;
use indicatif::ProgressBar;
use talaria_optimizer::{
    json::vehicle_routing_problem_input::VehicleRoutingProblemInput,
    solver::{solution::solution::Solution, solver::Solver},
};
use tracing::info;

use crate::search_args::SearchArgs;

#[derive(Args)]
pub struct OptimizeArgs {
    /// The problem to optimize
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Where to write the best solution as JSON
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    #[command(flatten)]
    search: SearchArgs,
}

pub fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let f = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let input: VehicleRoutingProblemInput = serde_json::from_reader(BufReader::new(f))?;
    let problem = input.into_problem()?;

    let mut solver = Solver::new(problem, args.search.solver_params()?)?;

    let loading_bar = Arc::new(ProgressBar::new_spinner());
    loading_bar.set_message("running...");
    let closure_loading_bar = Arc::clone(&loading_bar);
    solver.on_best_solution(move |best_solution| {
        closure_loading_bar.set_message(format!(
            "running... routes = {}, cost = {:.2}, unassigned = {}",
            best_solution.solution.non_empty_routes_count(),
            best_solution.cost,
            best_solution.solution.unassigned_jobs().len(),
        ));
    });

    let solutions = solver.solve()?;
    loading_bar.finish_and_clear();

    let Some(best_solution) = solutions.first() else {
        info!("No solution found");
        return Ok(());
    };

    info!(
        "Finished: routes = {}, cost = {:.2}, unassigned = {}",
        best_solution.routes.len(),
        best_solution.cost,
        best_solution.unassigned_jobs.len(),
    );
    println!("{}", routes_table(best_solution));

    if let Some(out) = args.out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out, serde_json::to_string_pretty(best_solution)?)?;
        info!("Solution written to {}", out.display());
    }

    Ok(())
}

fn routes_table(solution: &Solution) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Vehicle", "Jobs", "Distance", "Duration", "Cost"]);

    for route in &solution.routes {
        let jobs = route
            .activities
            .iter()
            .filter(|activity| activity.job_id.is_some())
            .count();

        table.add_row(vec![
            route.vehicle_id.clone(),
            jobs.to_string(),
            format!("{:.2}", route.distance),
            format!("{:.2}", route.duration),
            format!("{:.2}", route.cost),
        ]);
    }

    table
}
