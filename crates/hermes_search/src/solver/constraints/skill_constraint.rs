use crate::solver::insertion::context::JobInsertionContext;

use super::HardRouteConstraint;

/// The vehicle must have every skill the job requires.
pub struct SkillConstraint;

impl HardRouteConstraint for SkillConstraint {
    fn constraint_name(&self) -> &'static str {
        "skills"
    }

    fn fulfilled(&self, context: &JobInsertionContext<'_>) -> bool {
        context
            .problem
            .is_job_compatible_with_vehicle(context.route().vehicle_id(), context.job_id)
    }
}
