use crate::solver::insertion::context::JobInsertionContext;

use super::SoftRouteConstraint;

/// Extra cost for opening an unused vehicle, favors fewer routes beyond the fixed costs.
pub struct NewRoutePenalty {
    penalty: f64,
}

impl NewRoutePenalty {
    pub fn new(penalty: f64) -> Self {
        NewRoutePenalty { penalty }
    }
}

impl SoftRouteConstraint for NewRoutePenalty {
    fn constraint_name(&self) -> &'static str {
        "new_route_penalty"
    }

    fn cost(&self, context: &JobInsertionContext<'_>) -> f64 {
        if context.route().is_empty() {
            self.penalty
        } else {
            0.0
        }
    }
}
