use crate::{
    problem::{job::JobIdx, travel_cost_matrix::Cost, vehicle::VehicleIdx},
    solver::solution::{
        route::WorkingSolutionRoute, route_id::RouteIdx, working_solution::WorkingSolution,
    },
};

/// Insertion of a job served by a single activity: services and breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleInsertion {
    pub route_id: RouteIdx,
    pub job_index: JobIdx,
    /// The activity is inserted before the activity currently at `position`.
    pub position: usize,
    /// Vehicle of the route once the job is inserted.
    pub vehicle_id: VehicleIdx,
    pub cost: Cost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentInsertion {
    pub route_id: RouteIdx,
    pub job_index: JobIdx,

    /// Position of the pickup
    pub pickup_position: usize,

    /// This is the position before the pickup has been inserted
    pub delivery_position: usize,

    pub vehicle_id: VehicleIdx,
    pub cost: Cost,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    Single(SingleInsertion),
    Shipment(ShipmentInsertion),
}

impl Insertion {
    pub fn job_idx(&self) -> JobIdx {
        match self {
            Insertion::Single(ctx) => ctx.job_index,
            Insertion::Shipment(ctx) => ctx.job_index,
        }
    }

    pub fn route_id(&self) -> RouteIdx {
        match self {
            Insertion::Single(ctx) => ctx.route_id,
            Insertion::Shipment(ctx) => ctx.route_id,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        match self {
            Insertion::Single(ctx) => ctx.vehicle_id,
            Insertion::Shipment(ctx) => ctx.vehicle_id,
        }
    }

    pub fn cost(&self) -> Cost {
        match self {
            Insertion::Single(ctx) => ctx.cost,
            Insertion::Shipment(ctx) => ctx.cost,
        }
    }

    /// First and last insertion positions, both relative to the route before insertion.
    pub fn positions(&self) -> (usize, usize) {
        match self {
            Insertion::Single(ctx) => (ctx.position, ctx.position),
            Insertion::Shipment(ctx) => (ctx.pickup_position, ctx.delivery_position),
        }
    }

    pub fn route<'a>(&self, solution: &'a WorkingSolution) -> &'a WorkingSolutionRoute {
        solution.route(self.route_id())
    }
}
