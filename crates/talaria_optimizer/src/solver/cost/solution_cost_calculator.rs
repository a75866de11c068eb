use tracing::debug;

use crate::solver::{
    cost::{
        cost_analysis::{ComponentCost, CostAnalysis},
        cost_component::CostComponent,
        missed_break_cost::MissedBreakComponent,
        route_cost_components::{
            ActivityCostComponent, TransportCostComponent, VehicleFixedCostComponent,
        },
        unassigned_penalty::{UnassignedPenaltyComponent, UnassignedPenaltyParams},
    },
    solution::working_solution::WorkingSolution,
    solver_error::SolverError,
    state::state_manager::StateManager,
};

struct WeightedComponent {
    component: Box<dyn CostComponent>,
    weight: f64,
}

/// Weighted sum of cost components.
///
/// Components are registered during setup; once sealed, the set of components and their order
/// no longer change.
#[derive(Default)]
pub struct SolutionCostCalculator {
    components: Vec<WeightedComponent>,
    sealed: bool,
}

impl SolutionCostCalculator {
    /// Transport, activity, vehicle fixed cost, unassigned jobs and missed breaks, all weighted 1.
    pub fn with_default_components(penalty: &UnassignedPenaltyParams) -> Self {
        let components: Vec<Box<dyn CostComponent>> = vec![
            Box::new(TransportCostComponent),
            Box::new(ActivityCostComponent),
            Box::new(VehicleFixedCostComponent),
            Box::new(UnassignedPenaltyComponent::new(penalty.clone())),
            Box::new(MissedBreakComponent::new(penalty.missed_break_factor)),
        ];

        SolutionCostCalculator {
            components: components
                .into_iter()
                .map(|component| WeightedComponent {
                    component,
                    weight: 1.0,
                })
                .collect(),
            sealed: false,
        }
    }

    pub fn register(
        &mut self,
        component: Box<dyn CostComponent>,
        weight: f64,
    ) -> Result<(), SolverError> {
        if self.sealed {
            return Err(SolverError::CalculatorSealed(component.id().to_owned()));
        }

        if !weight.is_finite() || weight < 0.0 {
            return Err(SolverError::InvalidWeight(weight));
        }

        if self
            .components
            .iter()
            .any(|registered| registered.component.id() == component.id())
        {
            return Err(SolverError::DuplicateCostComponent(
                component.id().to_owned(),
            ));
        }

        debug!("Registered cost component {} with weight {}", component.id(), weight);
        self.components.push(WeightedComponent { component, weight });

        Ok(())
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .map(|registered| registered.component.id())
    }

    /// Cost of a solution whose routes have all been refreshed.
    pub fn calculate(&self, states: &StateManager, solution: &WorkingSolution) -> CostAnalysis {
        let components = self
            .components
            .iter()
            .map(|registered| ComponentCost {
                id: registered.component.id().to_owned(),
                cost: registered.weight * registered.component.solution_cost(states, solution),
            })
            .collect::<Vec<_>>();

        CostAnalysis {
            total: components.iter().map(|component| component.cost).sum(),
            components,
        }
    }
}
