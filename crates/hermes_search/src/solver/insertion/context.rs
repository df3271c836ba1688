use crate::{
    problem::{
        job::{Job, JobIdx},
        vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
        vehicle_type::VehicleType,
    },
    solver::solution::{
        activity::TourActivity, route::VehicleRoute, route_id::RouteIdx,
        working_solution::WorkingSolution,
    },
};

/// A job being evaluated against one route.
#[derive(Clone, Copy)]
pub struct JobInsertionContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub solution: &'a WorkingSolution,
    pub route_id: RouteIdx,
    pub job_id: JobIdx,
}

impl<'a> JobInsertionContext<'a> {
    pub fn new(solution: &'a WorkingSolution, route_id: RouteIdx, job_id: JobIdx) -> Self {
        JobInsertionContext {
            problem: solution.problem(),
            solution,
            route_id,
            job_id,
        }
    }

    pub fn route(&self) -> &'a VehicleRoute {
        self.solution.route(self.route_id)
    }

    pub fn vehicle(&self) -> &'a Vehicle {
        self.route().vehicle(self.problem)
    }

    pub fn vehicle_type(&self) -> &'a VehicleType {
        self.problem.vehicle_type_of(self.route().vehicle_id())
    }

    pub fn job(&self) -> &'a Job {
        self.problem.job(self.job_id)
    }
}

/// One candidate position: `new_activity` goes between `prev` and `next`.
///
/// `prev_position` is the index, in the route before the insertion, of the last original
/// activity before the new one. It differs from the position of `prev` when `prev` is the
/// pickup of a shipment placed in the same evaluation. `next` is always the original activity
/// at `prev_position + 1`.
#[derive(Clone, Copy)]
pub struct ActivityInsertionContext<'a> {
    pub prev: &'a TourActivity,
    pub new_activity: &'a TourActivity,
    pub next: &'a TourActivity,
    pub prev_position: usize,
    pub prev_end_time: f64,
}

impl ActivityInsertionContext<'_> {
    pub fn next_position(&self) -> usize {
        self.prev_position + 1
    }
}
