use tracing::debug;

use crate::{
    error::SearchError,
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::{route::VehicleRoute, route_id::RouteIdx},
};

use super::{
    StateKey, StateType, StateValue,
    keys::{BUILTIN_KEY_COUNT, builtin_defaults},
    route_states::RouteStates,
    state_updater::{RouteStateContext, StateEvent, StateUpdater, read_or_default},
    updaters::{
        UpdateActivityTimes, UpdateDepartureTime, UpdateLoads, UpdateTimeSlack,
        UpdateVariableCosts,
    },
};

/// Registry of state updaters and state key defaults.
///
/// The manager itself holds no route data, the values live in one [`RouteStates`] per route,
/// owned by the working solution next to the route. It is built once and then shared read-only
/// between runs.
pub struct StateManager {
    updaters: Vec<Box<dyn StateUpdater>>,
    defaults: Vec<StateValue>,
    names: Vec<&'static str>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// A manager knowing the built-in keys but without any updater.
    pub fn new() -> Self {
        let (names, defaults) = builtin_defaults().into_iter().unzip();

        StateManager {
            updaters: Vec::new(),
            defaults,
            names,
        }
    }

    /// A manager with every core updater registered, producers first.
    pub fn with_core_updaters() -> Self {
        let mut manager = StateManager::new();

        manager.register_state_updater(Box::new(UpdateDepartureTime));
        manager.register_state_updater(Box::new(UpdateActivityTimes));
        manager.register_state_updater(Box::new(UpdateTimeSlack));
        manager.register_state_updater(Box::new(UpdateLoads));
        manager.register_state_updater(Box::new(UpdateVariableCosts));

        manager
    }

    /// Appends `updater`, it runs after every updater registered before it.
    pub fn register_state_updater(&mut self, updater: Box<dyn StateUpdater>) -> &mut Self {
        debug!(updater = updater.name(), "Registered state updater");
        self.updaters.push(updater);
        self
    }

    /// Creates a key for a custom state, `default` is returned by reads before any updater
    /// wrote it.
    pub fn create_state_key<T: StateType>(&mut self, name: &'static str, default: T) -> StateKey<T> {
        let key = StateKey::new(self.defaults.len(), name);
        self.defaults.push(default.into_state_value());
        self.names.push(name);
        key
    }

    pub fn updaters(&self) -> impl Iterator<Item = &dyn StateUpdater> {
        self.updaters.iter().map(|updater| updater.as_ref())
    }

    pub fn key_names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn is_builtin(&self, key_index: usize) -> bool {
        key_index < BUILTIN_KEY_COUNT
    }

    pub fn inform_route_changed(
        &self,
        problem: &VehicleRoutingProblem,
        route: &mut VehicleRoute,
        states: &mut RouteStates,
    ) {
        self.propagate(problem, route, states, StateEvent::RouteChanged);
    }

    pub fn inform_insertion_starts(
        &self,
        problem: &VehicleRoutingProblem,
        route: &mut VehicleRoute,
        states: &mut RouteStates,
        jobs: &[JobIdx],
    ) {
        self.propagate(problem, route, states, StateEvent::InsertionStarts { jobs });
    }

    pub fn inform_job_inserted(
        &self,
        problem: &VehicleRoutingProblem,
        route: &mut VehicleRoute,
        states: &mut RouteStates,
        job_id: JobIdx,
    ) {
        self.propagate(problem, route, states, StateEvent::JobInserted { job_id });
    }

    pub fn inform_job_unassigned(
        &self,
        problem: &VehicleRoutingProblem,
        route: &mut VehicleRoute,
        states: &mut RouteStates,
        job_id: JobIdx,
    ) {
        self.propagate(problem, route, states, StateEvent::JobUnassigned { job_id });
    }

    fn propagate(
        &self,
        problem: &VehicleRoutingProblem,
        route: &mut VehicleRoute,
        states: &mut RouteStates,
        event: StateEvent<'_>,
    ) {
        if event.changes_sequence() {
            states.clear();
            route.reset_schedule();
        }

        let version = route.version();
        let kind = event.kind();
        let mut context = RouteStateContext::new(problem, route, states, self);
        for updater in &self.updaters {
            if updater.interests().contains(kind) {
                updater.update(&mut context, event);
            }
        }

        states.mark_computed(version);
    }

    /// Typed read of an activity state, `position` indexes the route activities.
    pub fn get_activity_state<T: StateType>(
        &self,
        route_id: RouteIdx,
        route: &VehicleRoute,
        states: &RouteStates,
        key: StateKey<T>,
        position: usize,
    ) -> Result<T, SearchError> {
        self.ensure_fresh(route_id, route, states)?;
        Ok(read_or_default(
            states.activity_value(key.index(), position),
            self.registered_default(key),
        ))
    }

    pub fn get_route_state<T: StateType>(
        &self,
        route_id: RouteIdx,
        route: &VehicleRoute,
        states: &RouteStates,
        key: StateKey<T>,
    ) -> Result<T, SearchError> {
        self.ensure_fresh(route_id, route, states)?;
        Ok(read_or_default(
            states.route_value(key.index()),
            self.registered_default(key),
        ))
    }

    /// Default of `key` if it was created by this manager. Reads of other keys fall back on the
    /// neutral value of their type.
    pub(crate) fn registered_default<T>(&self, key: StateKey<T>) -> Option<&StateValue> {
        self.names
            .get(key.index())
            .filter(|&&name| name == key.name())
            .and_then(|_| self.defaults.get(key.index()))
    }

    fn ensure_fresh(
        &self,
        route_id: RouteIdx,
        route: &VehicleRoute,
        states: &RouteStates,
    ) -> Result<(), SearchError> {
        if !states.is_fresh(route.version()) {
            return Err(SearchError::StateInconsistency(format!(
                "states of route {route_id} at version {} read before propagation",
                route.version()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{capacity::Capacity, vehicle::VehicleIdx},
        solver::{
            solution::working_solution::WorkingSolution,
            state::keys::{LATEST_OPERATION_START, ROUTE_COSTS},
        },
        test_utils::{self, TestProblem},
    };

    use super::*;

    fn create_problem() -> Arc<VehicleRoutingProblem> {
        let mut problem = TestProblem::grid(1, 5);
        problem.add_service(3, |_| {});
        Arc::new(problem.build())
    }

    #[test]
    fn test_unwritten_custom_key_reads_its_default() {
        let mut manager = StateManager::with_core_updaters();
        let penalty = manager.create_state_key("penalty", 7.5);

        let solution = WorkingSolution::new(create_problem(), Arc::new(manager));

        assert_eq!(solution.route_state(RouteIdx::new(0), penalty), 7.5);
        assert_eq!(solution.activity_state(RouteIdx::new(0), 0, penalty), 7.5);
    }

    #[test]
    fn test_unregistered_key_reads_neutral_value() {
        let mut other = StateManager::new();
        let distance = other.create_state_key("other_distance", 42.0);
        let load = other.create_state_key("other_load", Capacity::from_vec(vec![3.0]));
        let flag = other.create_state_key("other_flag", true);

        let solution = test_utils::create_test_working_solution(create_problem(), vec![]);
        let route_id = RouteIdx::new(0);

        assert_eq!(solution.try_route_state(route_id, distance).unwrap(), 0.0);
        assert_eq!(solution.try_route_state(route_id, load).unwrap(), Capacity::EMPTY);
        assert!(!solution.try_activity_state(route_id, 1, flag).unwrap());

        // Built-in keys keep their documented defaults.
        assert_eq!(solution.route_state(route_id, ROUTE_COSTS), 0.0);
        assert_eq!(
            solution.activity_state(route_id, 5, LATEST_OPERATION_START),
            f64::INFINITY
        );
    }

    #[test]
    fn test_stale_states_are_an_inconsistency() {
        let problem = create_problem();
        let manager = StateManager::with_core_updaters();
        let route = VehicleRoute::empty(&problem, VehicleIdx::new(0));

        let result = manager.get_route_state(RouteIdx::new(0), &route, &RouteStates::default(), ROUTE_COSTS);

        assert!(matches!(result, Err(SearchError::StateInconsistency(_))));
    }
}
