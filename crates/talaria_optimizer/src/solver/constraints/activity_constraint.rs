use std::sync::Arc;

use crate::solver::insertion_context::ActivityInsertionContext;

use super::{load_constraint::LoadConstraint, time_window_constraint::TimeWindowConstraint};

/// Feasibility of one new activity at one position.
pub trait HardActivityConstraint {
    fn code(&self) -> &'static str;

    fn fulfilled(&self, context: &ActivityInsertionContext) -> bool;
}

type ActivityCheck = dyn Fn(&ActivityInsertionContext) -> bool + Send + Sync;

#[derive(Clone)]
pub struct CustomActivityConstraint {
    code: &'static str,
    check: Arc<ActivityCheck>,
}

impl CustomActivityConstraint {
    pub fn from_fn(
        code: &'static str,
        check: impl Fn(&ActivityInsertionContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        CustomActivityConstraint {
            code,
            check: Arc::new(check),
        }
    }
}

impl HardActivityConstraint for CustomActivityConstraint {
    fn code(&self) -> &'static str {
        self.code
    }

    fn fulfilled(&self, context: &ActivityInsertionContext) -> bool {
        (self.check)(context)
    }
}

#[derive(Clone)]
pub enum ActivityConstraintType {
    TimeWindow(TimeWindowConstraint),
    Load(LoadConstraint),
    Custom(CustomActivityConstraint),
}

impl HardActivityConstraint for ActivityConstraintType {
    fn code(&self) -> &'static str {
        match self {
            ActivityConstraintType::TimeWindow(c) => c.code(),
            ActivityConstraintType::Load(c) => c.code(),
            ActivityConstraintType::Custom(c) => c.code(),
        }
    }

    fn fulfilled(&self, context: &ActivityInsertionContext) -> bool {
        match self {
            ActivityConstraintType::TimeWindow(c) => c.fulfilled(context),
            ActivityConstraintType::Load(c) => c.fulfilled(context),
            ActivityConstraintType::Custom(c) => c.fulfilled(context),
        }
    }
}
