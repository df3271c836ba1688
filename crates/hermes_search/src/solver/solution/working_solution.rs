use std::sync::Arc;

use fixedbitset::FixedBitSet;

use crate::{
    error::SearchError,
    problem::{
        job::{ActivityId, JobIdx},
        vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        insertion::Insertion,
        state::{StateKey, StateManager, StateType, route_states::RouteStates},
    },
};

use super::{activity::TourActivity, route::VehicleRoute, route_id::RouteIdx};

/// Routes of every vehicle, their states and the unassigned jobs.
///
/// Insertion and removal are the only ways to change a route, both keep every job either in
/// exactly one route or unassigned and repropagate the states of the touched route. Cloning is
/// the snapshot used to roll back a rejected iteration.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    state_manager: Arc<StateManager>,
    routes: Vec<VehicleRoute>,
    states: Vec<RouteStates>,
    job_routes: Vec<Option<RouteIdx>>,
    unassigned_jobs: FixedBitSet,
}

impl WorkingSolution {
    /// A solution with every job unassigned and one empty route per vehicle. With an infinite
    /// fleet, vehicles are templates and a new empty route is opened whenever one gets used.
    pub fn new(problem: Arc<VehicleRoutingProblem>, state_manager: Arc<StateManager>) -> Self {
        let job_count = problem.jobs().len();
        let mut unassigned_jobs = FixedBitSet::with_capacity(job_count);
        unassigned_jobs.insert_range(..);

        let routes: Vec<VehicleRoute> = (0..problem.vehicles().len())
            .map(|vehicle_index| VehicleRoute::empty(&problem, VehicleIdx::new(vehicle_index)))
            .collect();

        let mut solution = WorkingSolution {
            states: vec![RouteStates::default(); routes.len()],
            routes,
            job_routes: vec![None; job_count],
            unassigned_jobs,
            problem,
            state_manager,
        };

        for route_index in 0..solution.routes.len() {
            solution.propagate_route_changed(route_index);
        }

        solution
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn problem_arc(&self) -> &Arc<VehicleRoutingProblem> {
        &self.problem
    }

    pub fn state_manager(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn route(&self, route_id: RouteIdx) -> &VehicleRoute {
        &self.routes[route_id]
    }

    pub fn route_ids(&self) -> impl Iterator<Item = RouteIdx> + use<> {
        (0..self.routes.len()).map(RouteIdx::new)
    }

    pub fn route_states(&self, route_id: RouteIdx) -> &RouteStates {
        &self.states[route_id.get()]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = (RouteIdx, &VehicleRoute)> {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, route)| !route.is_empty())
            .map(|(index, route)| (RouteIdx::new(index), route))
    }

    pub fn non_empty_routes_count(&self) -> usize {
        self.routes.iter().filter(|route| !route.is_empty()).count()
    }

    /// Whether no job is assigned at all.
    pub fn is_empty(&self) -> bool {
        self.routes.iter().all(|route| route.is_empty())
    }

    /// Unassigned jobs in ascending order.
    pub fn unassigned_jobs(&self) -> impl Iterator<Item = JobIdx> + '_ {
        self.unassigned_jobs.ones().map(JobIdx::new)
    }

    pub fn unassigned_jobs_count(&self) -> usize {
        self.unassigned_jobs.count_ones(..)
    }

    pub fn assigned_jobs_count(&self) -> usize {
        self.job_routes.len() - self.unassigned_jobs_count()
    }

    pub fn is_assigned(&self, job_id: JobIdx) -> bool {
        self.job_routes[job_id.get()].is_some()
    }

    pub fn route_of_job(&self, job_id: JobIdx) -> Option<RouteIdx> {
        self.job_routes[job_id.get()]
    }

    /// Routes an insertion heuristic should try: every used route and one empty route per
    /// class of equivalent vehicles, since inserting in either of two equivalent empty routes
    /// costs the same.
    pub fn candidate_routes(&self) -> Vec<RouteIdx> {
        let mut candidates = Vec::with_capacity(self.routes.len());
        let mut empty_vehicles: Vec<VehicleIdx> = Vec::new();

        for (index, route) in self.routes.iter().enumerate() {
            if route.is_empty() {
                let vehicle = route.vehicle(&self.problem);
                let has_equivalent = empty_vehicles.iter().any(|&other| {
                    vehicle.is_equivalent_to(self.problem.vehicle(other))
                });
                if has_equivalent {
                    continue;
                }

                empty_vehicles.push(route.vehicle_id());
            }

            candidates.push(RouteIdx::new(index));
        }

        candidates
    }

    /// Announces the jobs of an upcoming insertion phase to the state updaters.
    pub fn begin_insertion(&mut self, jobs: &[JobIdx]) {
        for (route, states) in self.routes.iter_mut().zip(self.states.iter_mut()) {
            self.state_manager
                .inform_insertion_starts(&self.problem, route, states, jobs);
        }
    }

    /// Applies `insertion`, the job must be unassigned.
    pub fn insert(&mut self, insertion: &Insertion) {
        let route_id = insertion.route_id();
        let job_id = insertion.job_index();
        assert!(
            self.job_routes[job_id.get()].is_none(),
            "Job {job_id} is already assigned to route {route_id}"
        );

        let route = &mut self.routes[route_id];
        let was_empty = route.is_empty();

        match insertion {
            Insertion::Service(insertion) => {
                let activity =
                    TourActivity::for_job(&self.problem, ActivityId::Service(job_id));
                route.insert_activity(insertion.position + 1, activity);
            }
            Insertion::Shipment(insertion) => {
                debug_assert!(insertion.pickup_position <= insertion.delivery_position);
                let pickup =
                    TourActivity::for_job(&self.problem, ActivityId::ShipmentPickup(job_id));
                let delivery =
                    TourActivity::for_job(&self.problem, ActivityId::ShipmentDelivery(job_id));

                route.insert_activity(insertion.delivery_position + 1, delivery);
                route.insert_activity(insertion.pickup_position + 1, pickup);
            }
        }

        self.job_routes[job_id.get()] = Some(route_id);
        self.unassigned_jobs.set(job_id.get(), false);
        self.state_manager.inform_job_inserted(
            &self.problem,
            &mut self.routes[route_id],
            &mut self.states[route_id.get()],
            job_id,
        );

        if was_empty && self.problem.fleet().is_infinite() {
            let vehicle_id = self.routes[route_id].vehicle_id();
            self.ensure_empty_route(vehicle_id);
        }
    }

    /// Unassigns `job_id`, returns false if it was not assigned.
    pub fn remove_job(&mut self, job_id: JobIdx) -> bool {
        let Some(route_id) = self.job_routes[job_id.get()] else {
            return false;
        };

        let removed = self.routes[route_id].remove_job(job_id);
        debug_assert!(removed > 0, "Job {job_id} missing from route {route_id}");

        self.job_routes[job_id.get()] = None;
        self.unassigned_jobs.insert(job_id.get());
        self.state_manager.inform_job_unassigned(
            &self.problem,
            &mut self.routes[route_id],
            &mut self.states[route_id.get()],
            job_id,
        );

        true
    }

    /// Unassigns every job of `route_id`, returns them in visiting order.
    pub fn remove_route(&mut self, route_id: RouteIdx) -> Vec<JobIdx> {
        let job_ids: Vec<JobIdx> = self.routes[route_id].job_ids().collect();
        for &job_id in &job_ids {
            self.remove_job(job_id);
        }

        job_ids
    }

    /// Typed read of an activity state. Panics if the route states are stale, which means a
    /// mutation bypassed the state manager.
    pub fn activity_state<T: StateType>(&self, route_id: RouteIdx, position: usize, key: StateKey<T>) -> T {
        match self.try_activity_state(route_id, position, key) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_activity_state<T: StateType>(
        &self,
        route_id: RouteIdx,
        position: usize,
        key: StateKey<T>,
    ) -> Result<T, SearchError> {
        self.state_manager.get_activity_state(
            route_id,
            &self.routes[route_id],
            &self.states[route_id.get()],
            key,
            position,
        )
    }

    /// Typed read of a route state, panics on stale states like [`Self::activity_state`].
    pub fn route_state<T: StateType>(&self, route_id: RouteIdx, key: StateKey<T>) -> T {
        match self.try_route_state(route_id, key) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_route_state<T: StateType>(&self, route_id: RouteIdx, key: StateKey<T>) -> Result<T, SearchError> {
        self.state_manager.get_route_state(
            route_id,
            &self.routes[route_id],
            &self.states[route_id.get()],
            key,
        )
    }

    /// Recomputes the states of every route from scratch.
    pub fn resync(&mut self) {
        for route_index in 0..self.routes.len() {
            self.propagate_route_changed(route_index);
        }
    }

    /// Verifies that every job is in exactly one route or unassigned and that every route has
    /// fresh states.
    pub fn check_integrity(&self) -> Result<(), SearchError> {
        let job_count = self.job_routes.len();
        let mut seen = FixedBitSet::with_capacity(job_count);

        for (index, route) in self.routes.iter().enumerate() {
            let route_id = RouteIdx::new(index);
            if !self.states[index].is_fresh(route.version()) {
                return Err(SearchError::StateInconsistency(format!(
                    "route {route_id} has stale states"
                )));
            }

            for activity in route.job_activities() {
                let Some(activity_id) = activity.activity_id() else {
                    continue;
                };
                let job_id = activity_id.job_id();

                if self.job_routes[job_id.get()] != Some(route_id) {
                    return Err(SearchError::StateInconsistency(format!(
                        "job {job_id} found in route {route_id} but recorded elsewhere"
                    )));
                }

                if !matches!(activity_id, ActivityId::ShipmentDelivery(_)) {
                    if seen.contains(job_id.get()) {
                        return Err(SearchError::StateInconsistency(format!(
                            "job {job_id} visited twice in route {route_id}"
                        )));
                    }
                    seen.insert(job_id.get());
                }
            }
        }

        for job_index in 0..job_count {
            let routed = seen.contains(job_index);
            let unassigned = self.unassigned_jobs.contains(job_index);
            if routed == unassigned {
                return Err(SearchError::StateInconsistency(format!(
                    "job {job_index} is routed: {routed}, unassigned: {unassigned}"
                )));
            }
        }

        Ok(())
    }

    /// Same routes with the same activities and the same state values.
    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        self.routes == other.routes
            && self.states == other.states
            && self.job_routes == other.job_routes
            && self.unassigned_jobs == other.unassigned_jobs
    }

    fn ensure_empty_route(&mut self, vehicle_id: VehicleIdx) {
        let has_empty_route = self
            .routes
            .iter()
            .any(|route| route.vehicle_id() == vehicle_id && route.is_empty());

        if !has_empty_route {
            self.routes
                .push(VehicleRoute::empty(&self.problem, vehicle_id));
            self.states.push(RouteStates::default());
            self.propagate_route_changed(self.routes.len() - 1);
        }
    }

    fn propagate_route_changed(&mut self, route_index: usize) {
        self.state_manager.inform_route_changed(
            &self.problem,
            &mut self.routes[route_index],
            &mut self.states[route_index],
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::job::{ActivityId, JobIdx},
        solver::{
            insertion::{Insertion, ServiceInsertion, ShipmentInsertion},
            solution::{activity::TourActivity, route_id::RouteIdx},
            state::keys::ROUTE_COSTS,
        },
        test_utils::{self, TestProblem, TestRoute},
    };

    #[test]
    fn test_insert_and_remove_keep_jobs_conserved() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 5]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ));

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1],
            }],
        );

        assert!(solution.check_integrity().is_ok());
        assert_eq!(solution.unassigned_jobs().collect::<Vec<_>>(), vec![JobIdx::new(2)]);
        assert_eq!(solution.route_of_job(JobIdx::new(1)), Some(RouteIdx::new(0)));

        assert!(solution.remove_job(JobIdx::new(0)));
        assert!(!solution.remove_job(JobIdx::new(0)));

        assert!(solution.check_integrity().is_ok());
        assert_eq!(
            solution.unassigned_jobs().collect::<Vec<_>>(),
            vec![JobIdx::new(0), JobIdx::new(2)]
        );
        assert_eq!(
            solution.route(RouteIdx::new(0)).job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(1)]
        );
    }

    #[test]
    fn test_snapshot_restores_identical_solution() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 5, 8]),
            test_utils::create_basic_vehicles(vec![0]),
        ));

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1, 2, 3],
            }],
        );
        let snapshot = solution.clone();

        solution.remove_job(JobIdx::new(1));
        solution.remove_job(JobIdx::new(3));
        assert!(!solution.is_identical(&snapshot));

        solution = snapshot.clone();
        assert!(solution.is_identical(&snapshot));
        assert_eq!(
            solution.route_state(RouteIdx::new(0), ROUTE_COSTS),
            snapshot.route_state(RouteIdx::new(0), ROUTE_COSTS)
        );
    }

    #[test]
    fn test_shipment_insertion_orders_pickup_before_delivery() {
        let mut problem = TestProblem::grid(1, 10);
        problem.add_service(3, |_| {});
        problem.add_shipment(2, 6, |_| {});
        let problem = Arc::new(problem.build());

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0],
            }],
        );

        solution.insert(&Insertion::Shipment(ShipmentInsertion {
            route_id: RouteIdx::new(0),
            job_index: JobIdx::new(1),
            pickup_position: 0,
            delivery_position: 1,
        }));

        let locations = solution
            .route(RouteIdx::new(0))
            .job_activities()
            .iter()
            .filter_map(|activity| activity.location_id().map(|location| location.get()))
            .collect::<Vec<_>>();

        assert_eq!(locations, vec![2, 3, 6]);
        assert!(solution.check_integrity().is_ok());

        assert!(solution.remove_job(JobIdx::new(1)));
        assert_eq!(solution.route(RouteIdx::new(0)).len(), 1);
    }

    #[test]
    fn test_infinite_fleet_opens_new_route() {
        let mut problem = TestProblem::grid(1, 10);
        problem.infinite_fleet = true;
        problem.add_service(3, |_| {});
        problem.add_service(5, |_| {});
        let problem = Arc::new(problem.build());

        let mut solution = test_utils::create_test_working_solution(Arc::clone(&problem), vec![]);
        assert_eq!(solution.routes().len(), 1);

        solution.insert(&Insertion::Service(ServiceInsertion {
            route_id: RouteIdx::new(0),
            job_index: JobIdx::new(0),
            position: 0,
        }));

        assert_eq!(solution.routes().len(), 2);
        assert_eq!(solution.candidate_routes(), vec![RouteIdx::new(0), RouteIdx::new(1)]);
    }

    #[test]
    fn test_candidate_routes_skip_equivalent_empty_routes() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2]),
            test_utils::create_basic_vehicles(vec![0, 0, 4]),
        ));

        let solution = test_utils::create_test_working_solution(Arc::clone(&problem), vec![]);

        assert_eq!(solution.candidate_routes(), vec![RouteIdx::new(0), RouteIdx::new(2)]);
    }

    #[test]
    fn test_stale_state_read_is_reported() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(Arc::clone(&problem), vec![]);

        solution.routes[0].insert_activity(
            1,
            TourActivity::for_job(&problem, ActivityId::Service(JobIdx::new(0))),
        );

        assert!(solution.try_route_state(RouteIdx::new(0), ROUTE_COSTS).is_err());
        assert!(solution.check_integrity().is_err());
    }
}
