use std::sync::LazyLock;

use fxhash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    define_index_newtype,
    problem::{
        amount::{Capacity, ZERO_AMOUNT}, break_job::BreakJob, location::LocationIdx, service::Service,
        shipment::Shipment, skill::Skill,
    },
};

define_index_newtype!(JobIdx, Job);

static NO_SKILLS: LazyLock<FxHashSet<Skill>> = LazyLock::new(FxHashSet::default);

#[derive(Debug)]
pub enum Job {
    Service(Service),
    Shipment(Shipment),
    Break(BreakJob),
}

impl Job {
    pub fn external_id(&self) -> &str {
        match self {
            Job::Service(service) => service.external_id(),
            Job::Shipment(shipment) => shipment.external_id(),
            Job::Break(break_job) => break_job.external_id(),
        }
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        match self {
            Job::Service(service) => service.skills(),
            Job::Shipment(shipment) => shipment.skills(),
            Job::Break(_) => &NO_SKILLS,
        }
    }

    pub fn demand(&self) -> &Capacity {
        match self {
            Job::Service(service) => service.demand(),
            Job::Shipment(shipment) => shipment.demand(),
            Job::Break(_) => &ZERO_AMOUNT,
        }
    }

    /// 1 (most important) to 4. Breaks are always 1.
    pub fn priority(&self) -> u8 {
        match self {
            Job::Service(service) => service.priority(),
            Job::Shipment(shipment) => shipment.priority(),
            Job::Break(_) => 1,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Job::Break(_))
    }

    pub fn is_shipment(&self) -> bool {
        matches!(self, Job::Shipment(_))
    }

    pub fn has_time_windows(&self) -> bool {
        match self {
            Job::Service(service) => service.has_time_windows(),
            Job::Shipment(shipment) => shipment.has_time_windows(),
            Job::Break(break_job) => !break_job.time_windows().is_empty(),
        }
    }

    /// Locations the job visits, pickup before delivery for shipments.
    pub fn location_ids(&self) -> SmallVec<[LocationIdx; 2]> {
        match self {
            Job::Service(service) => SmallVec::from_elem(service.location_id(), 1),
            Job::Shipment(shipment) => SmallVec::from_buf([
                shipment.pickup().location_id(),
                shipment.delivery().location_id(),
            ]),
            Job::Break(break_job) => break_job.location_id().into_iter().collect(),
        }
    }
}

impl From<Service> for Job {
    fn from(service: Service) -> Self {
        Job::Service(service)
    }
}

impl From<Shipment> for Job {
    fn from(shipment: Shipment) -> Self {
        Job::Shipment(shipment)
    }
}

impl From<BreakJob> for Job {
    fn from(break_job: BreakJob) -> Self {
        Job::Break(break_job)
    }
}
