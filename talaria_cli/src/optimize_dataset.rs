use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use talaria_optimizer::{
    json::vehicle_routing_problem_input::VehicleRoutingProblemInput, solver::solver::Solver,
};
use tracing::{info, warn};

use crate::{file_utils::read_json_files, search_args::SearchArgs};

#[derive(Args)]
pub struct OptimizeDatasetArgs {
    /// A problem file or a folder of problem files
    #[arg(short, long)]
    dataset: PathBuf,

    #[command(flatten)]
    search: SearchArgs,
}

pub fn run(args: OptimizeDatasetArgs) -> Result<(), anyhow::Error> {
    info!("Optimizing dataset {:?}", args.dataset);
    let paths = if args.dataset.is_file() {
        vec![args.dataset]
    } else {
        read_json_files(&args.dataset)?
    };

    let params = args.search.solver_params()?;

    let mut table = Table::new();
    table.set_header(vec!["Problem", "Routes", "Unassigned", "Cost"]);

    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        let problem = match VehicleRoutingProblemInput::from_json(&content)
            .map_err(anyhow::Error::from)
            .and_then(|input| input.into_problem().map_err(anyhow::Error::from))
        {
            Ok(problem) => problem,
            Err(error) => {
                warn!("Skipping {}: {error}", path.display());
                continue;
            }
        };

        let mut solver = Solver::new(problem, params.clone())?;
        let solutions = solver.solve()?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match solutions.first() {
            Some(best_solution) => {
                table.add_row(vec![
                    name,
                    best_solution.routes.len().to_string(),
                    best_solution.unassigned_jobs.len().to_string(),
                    format!("{:.2}", best_solution.cost),
                ]);
            }
            None => info!("No solution found for {name}"),
        }
    }

    println!("{table}");

    Ok(())
}
