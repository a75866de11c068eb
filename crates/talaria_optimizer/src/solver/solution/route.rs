use fxhash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    problem::{
        job::JobIdx,
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        insertion::Insertion,
        solution::tour_activity::{ActivityKind, TourActivity},
        state::route_states::RouteStates,
    },
};

/// Ordered activities of one vehicle, always framed by its `Start` and `End` activities.
///
/// Positions index into the activity list. Inserting "at" a position places the new activity
/// before the one currently there, so valid insertion positions are `1..=end_position()`.
#[derive(Debug, Clone)]
pub struct WorkingSolutionRoute {
    vehicle_id: VehicleIdx,
    activities: Vec<TourActivity>,
    jobs: FxHashSet<JobIdx>,
    states: RouteStates,
}

impl WorkingSolutionRoute {
    pub fn empty(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let vehicle = problem.vehicle(vehicle_id);
        WorkingSolutionRoute {
            vehicle_id,
            activities: vec![TourActivity::start(vehicle), TourActivity::end(vehicle)],
            jobs: FxHashSet::default(),
            states: RouteStates::default(),
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn vehicle<'a>(&self, problem: &'a VehicleRoutingProblem) -> &'a Vehicle {
        problem.vehicle(self.vehicle_id)
    }

    /// Number of job activities, `Start` and `End` excluded.
    pub fn len(&self) -> usize {
        self.activities.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn has_only_breaks(&self, problem: &VehicleRoutingProblem) -> bool {
        !self.is_empty() && self.jobs.iter().all(|&job_id| problem.job(job_id).is_break())
    }

    pub fn contains_job(&self, job_id: JobIdx) -> bool {
        self.jobs.contains(&job_id)
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Jobs of the route in the order of their first activity.
    pub fn job_ids(&self) -> impl Iterator<Item = JobIdx> + '_ {
        self.activities
            .iter()
            .filter_map(|activity| match activity.kind() {
                ActivityKind::DeliverShipment(_) => None,
                kind => kind.job_id(),
            })
    }

    pub fn activities(&self) -> &[TourActivity] {
        &self.activities
    }

    pub fn activity(&self, position: usize) -> &TourActivity {
        &self.activities[position]
    }

    pub fn end_position(&self) -> usize {
        self.activities.len() - 1
    }

    pub fn job_positions(&self, job_id: JobIdx) -> SmallVec<[usize; 2]> {
        self.activities
            .iter()
            .enumerate()
            .filter(|(_, activity)| activity.job_id() == Some(job_id))
            .map(|(position, _)| position)
            .collect()
    }

    pub fn states(&self) -> &RouteStates {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut RouteStates {
        &mut self.states
    }

    pub(crate) fn activities_and_states_mut(
        &mut self,
    ) -> (&mut Vec<TourActivity>, &mut RouteStates) {
        (&mut self.activities, &mut self.states)
    }

    pub fn insert(&mut self, problem: &VehicleRoutingProblem, insertion: &Insertion) {
        let (position, delivery_position) = insertion.positions();
        self.insert_job(problem, insertion.job_idx(), position, delivery_position);
    }

    /// Inserts the activities of a job. The first activity goes before `position`; the delivery
    /// of a shipment goes before `delivery_position`, both relative to the route before insertion.
    pub fn insert_job(
        &mut self,
        problem: &VehicleRoutingProblem,
        job_id: JobIdx,
        position: usize,
        delivery_position: usize,
    ) {
        debug_assert!(position >= 1 && position <= self.end_position());
        debug_assert!(delivery_position >= position && delivery_position <= self.end_position());

        let mut activities = TourActivity::for_job(problem, job_id);
        if activities.len() == 2
            && let Some(delivery) = activities.pop()
        {
            self.activities.insert(delivery_position, delivery);
        }

        if let Some(first) = activities.pop() {
            self.activities.insert(position, first);
        }

        self.jobs.insert(job_id);
        self.states.mark_dirty();
    }

    /// Removes every activity of the job, returns whether the job was in the route.
    pub fn remove_job(&mut self, job_id: JobIdx) -> bool {
        if !self.jobs.remove(&job_id) {
            return false;
        }

        self.activities
            .retain(|activity| activity.job_id() != Some(job_id));
        self.states.mark_dirty();

        true
    }

    /// Moves the route to another vehicle, keeping its jobs in order.
    pub fn set_vehicle(&mut self, problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) {
        let vehicle = problem.vehicle(vehicle_id);
        let end_position = self.end_position();

        self.activities[0] = TourActivity::start(vehicle);
        self.activities[end_position] = TourActivity::end(vehicle);
        self.vehicle_id = vehicle_id;
        self.states.mark_dirty();
    }

    pub fn is_identical(&self, other: &WorkingSolutionRoute) -> bool {
        self.vehicle_id == other.vehicle_id
            && self.activities.len() == other.activities.len()
            && self
                .activities
                .iter()
                .zip(&other.activities)
                .all(|(a, b)| a.kind() == b.kind())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{
            amount::Amount,
            service::ServiceBuilder,
            shipment::{ShipmentBuilder, ShipmentTask},
            vehicle::VehicleBuilder,
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        test_utils,
    };

    use super::*;

    fn create_problem() -> VehicleRoutingProblem {
        let mut shipment = ShipmentBuilder::new("shipment", ShipmentTask::new(4), ShipmentTask::new(5));
        shipment.set_demand(Amount::from_vec(vec![1.0]));

        let mut v1 = VehicleBuilder::new("v1", 0);
        v1.set_capacity(Amount::from_vec(vec![5.0]));
        let mut v2 = VehicleBuilder::new("v2", 8);
        v2.set_capacity(Amount::from_vec(vec![5.0]));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(3, 3))
            .add_service(ServiceBuilder::new("s1", 1).build())
            .add_service(ServiceBuilder::new("s2", 2).build())
            .add_shipment(shipment.build())
            .add_vehicle(v1.build())
            .add_vehicle(v2.build());
        builder.build().unwrap()
    }

    #[test]
    fn test_insert_service() {
        let problem = create_problem();
        let mut route = WorkingSolutionRoute::empty(&problem, 0.into());
        assert!(route.is_empty());
        assert_eq!(route.end_position(), 1);

        route.insert_job(&problem, 0.into(), 1, 1);
        route.insert_job(&problem, 1.into(), 1, 1);

        assert_eq!(route.len(), 2);
        assert!(route.states().is_dirty());
        assert_eq!(
            route.job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(1), JobIdx::new(0)]
        );
    }

    #[test]
    fn test_insert_shipment_keeps_pickup_before_delivery() {
        let problem = create_problem();
        let mut route = WorkingSolutionRoute::empty(&problem, 0.into());
        route.insert_job(&problem, 0.into(), 1, 1);
        route.insert_job(&problem, 1.into(), 2, 2);

        // Pickup before s1, delivery before s2
        route.insert_job(&problem, 2.into(), 1, 2);
        let kinds = route
            .activities()
            .iter()
            .map(|activity| activity.kind())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::Start,
                ActivityKind::PickupShipment(2.into()),
                ActivityKind::PickupService(0.into()),
                ActivityKind::DeliverShipment(2.into()),
                ActivityKind::PickupService(1.into()),
                ActivityKind::End,
            ]
        );

        assert_eq!(route.job_positions(2.into()).to_vec(), vec![1, 3]);
        assert_eq!(route.num_jobs(), 3);
    }

    #[test]
    fn test_insert_shipment_adjacent() {
        let problem = create_problem();
        let mut route = WorkingSolutionRoute::empty(&problem, 0.into());
        route.insert_job(&problem, 2.into(), 1, 1);

        assert_eq!(route.activity(1).kind(), ActivityKind::PickupShipment(2.into()));
        assert_eq!(route.activity(2).kind(), ActivityKind::DeliverShipment(2.into()));
    }

    #[test]
    fn test_remove_job_removes_both_legs() {
        let problem = create_problem();
        let mut route = WorkingSolutionRoute::empty(&problem, 0.into());
        route.insert_job(&problem, 0.into(), 1, 1);
        route.insert_job(&problem, 2.into(), 1, 2);

        assert!(route.remove_job(2.into()));
        assert!(!route.remove_job(2.into()));
        assert_eq!(route.len(), 1);
        assert!(route.job_positions(2.into()).is_empty());
    }

    #[test]
    fn test_set_vehicle() {
        let problem = create_problem();
        let mut route = WorkingSolutionRoute::empty(&problem, 0.into());
        route.insert_job(&problem, 0.into(), 1, 1);

        route.set_vehicle(&problem, 1.into());
        assert_eq!(route.vehicle_id(), VehicleIdx::new(1));
        assert_eq!(route.activity(0).location_id(), Some(8.into()));
        assert_eq!(route.activity(2).location_id(), Some(8.into()));
        assert_eq!(route.len(), 1);
    }
}
