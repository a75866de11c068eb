use serde::Serialize;

use crate::problem::travel_cost_matrix::Cost;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentCost {
    pub id: String,
    /// Weighted cost of the component.
    pub cost: Cost,
}

/// Breakdown of a solution cost per registered component, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostAnalysis {
    pub total: Cost,
    pub components: Vec<ComponentCost>,
}

impl CostAnalysis {
    pub fn component(&self, id: &str) -> Option<Cost> {
        self.components
            .iter()
            .find(|component| component.id == id)
            .map(|component| component.cost)
    }
}
