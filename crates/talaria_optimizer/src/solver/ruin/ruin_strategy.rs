use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    problem::job::JobIdx,
    solver::{events::search_event::SearchEvent, solution::working_solution::WorkingSolution},
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    ruin_context::RuinContext, ruin_radial::RuinRadial, ruin_random::RuinRandom,
    ruin_solution::RuinSolution, ruin_worst::RuinWorst,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuinStrategy {
    Random,
    Radial,
    Worst,
}

impl RuinStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            RuinStrategy::Random => "random",
            RuinStrategy::Radial => "radial",
            RuinStrategy::Worst => "worst",
        }
    }
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "RuinRandom"),
            Self::Radial => write!(f, "RuinRadial"),
            Self::Worst => write!(f, "RuinWorst"),
        }
    }
}

impl RuinSolution for RuinStrategy {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let events = context.events;
        let problem = context.problem;
        events.emit(|| SearchEvent::RuinStarted {
            strategy: self.name(),
            count: context.num_jobs_to_remove,
        });

        let mut removed = match self {
            RuinStrategy::Random => RuinRandom.ruin_solution(solution, context),
            RuinStrategy::Radial => RuinRadial.ruin_solution(solution, context),
            RuinStrategy::Worst => RuinWorst.ruin_solution(solution, context),
        };

        // Breaks left alone in a route go back to the unassigned jobs
        if !events.is_empty() {
            for (route_id, route) in solution.routes().iter().enumerate_idx() {
                if route.has_only_breaks(problem) {
                    for job_id in route.job_ids() {
                        events.emit(|| SearchEvent::JobRemoved { job_id, route_id });
                    }
                }
            }
        }
        removed.extend(solution.prune());

        events.emit(|| SearchEvent::RuinEnded {
            removed: removed.len(),
        });

        removed
    }
}
