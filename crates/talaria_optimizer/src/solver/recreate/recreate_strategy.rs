use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::solver::solution::working_solution::WorkingSolution;

use super::{
    best_insertion::{BestInsertion, BestInsertionSortStrategy},
    recreate_context::RecreateContext,
    recreate_solution::RecreateSolution,
    regret_insertion::RegretInsertion,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecreateStrategy {
    BestInsertion(BestInsertionSortStrategy),
    RegretInsertion(usize),
}

impl Serialize for RecreateStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestInsertion(sort_strategy) => write!(f, "BestInsertion({sort_strategy})"),
            Self::RegretInsertion(k) => write!(f, "RegretInsertion({k})"),
        }
    }
}

impl RecreateSolution for RecreateStrategy {
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: &mut RecreateContext) {
        match self {
            RecreateStrategy::BestInsertion(sort_strategy) => {
                BestInsertion::new(*sort_strategy).recreate_solution(solution, context)
            }
            RecreateStrategy::RegretInsertion(k) => {
                RegretInsertion::new(*k).recreate_solution(solution, context)
            }
        }
    }
}
