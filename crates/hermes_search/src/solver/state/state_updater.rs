use crate::{
    problem::{
        capacity::Capacity, costs::TransportCost, job::JobIdx, vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem, vehicle_type::VehicleType,
    },
    solver::solution::{activity::TourActivity, route::VehicleRoute},
};

use super::{StateKey, StateManager, StateType, StateValue, route_states::RouteStates};

/// What happened to a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEvent<'a> {
    /// The route sequence changed in an unspecified way, or the route was just created.
    RouteChanged,
    /// An insertion phase is about to start for `jobs`.
    InsertionStarts { jobs: &'a [JobIdx] },
    JobInserted { job_id: JobIdx },
    JobUnassigned { job_id: JobIdx },
}

impl StateEvent<'_> {
    pub fn kind(&self) -> StateEventKind {
        match self {
            StateEvent::RouteChanged => StateEventKind::RouteChanged,
            StateEvent::InsertionStarts { .. } => StateEventKind::InsertionStarts,
            StateEvent::JobInserted { .. } => StateEventKind::JobInserted,
            StateEvent::JobUnassigned { .. } => StateEventKind::JobUnassigned,
        }
    }

    /// Whether the activity sequence changed, which invalidates every stored state.
    pub fn changes_sequence(&self) -> bool {
        !matches!(self, StateEvent::InsertionStarts { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StateEventKind {
    RouteChanged = 1,
    InsertionStarts = 1 << 1,
    JobInserted = 1 << 2,
    JobUnassigned = 1 << 3,
}

/// Set of event kinds an updater reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEvents(u8);

impl StateEvents {
    pub const NONE: StateEvents = StateEvents(0);
    pub const ALL: StateEvents = StateEvents(0b1111);
    /// Every event that changes a route sequence.
    pub const SEQUENCE_CHANGES: StateEvents = StateEvents(
        StateEventKind::RouteChanged as u8
            | StateEventKind::JobInserted as u8
            | StateEventKind::JobUnassigned as u8,
    );

    pub const fn with(self, kind: StateEventKind) -> StateEvents {
        StateEvents(self.0 | kind as u8)
    }

    pub fn contains(&self, kind: StateEventKind) -> bool {
        self.0 & kind as u8 != 0
    }
}

/// Recomputes derived values of a route after an event.
///
/// Updaters run in registration order, an updater may read whatever the previous ones wrote
/// for the same event.
pub trait StateUpdater: Send + Sync {
    fn name(&self) -> &str;

    fn interests(&self) -> StateEvents {
        StateEvents::ALL
    }

    fn update(&self, context: &mut RouteStateContext<'_>, event: StateEvent<'_>);
}

/// Access an updater gets to one route: the route itself, the state store and typed reads
/// falling back on the key defaults.
pub struct RouteStateContext<'a> {
    problem: &'a VehicleRoutingProblem,
    route: &'a mut VehicleRoute,
    states: &'a mut RouteStates,
    manager: &'a StateManager,
}

impl<'a> RouteStateContext<'a> {
    pub(super) fn new(
        problem: &'a VehicleRoutingProblem,
        route: &'a mut VehicleRoute,
        states: &'a mut RouteStates,
        manager: &'a StateManager,
    ) -> Self {
        RouteStateContext {
            problem,
            route,
            states,
            manager,
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        self.problem
    }

    pub fn route(&self) -> &VehicleRoute {
        self.route
    }

    pub fn vehicle(&self) -> &Vehicle {
        self.problem.vehicle(self.route.vehicle_id())
    }

    pub fn vehicle_type(&self) -> &VehicleType {
        self.problem.vehicle_type_of(self.route.vehicle_id())
    }

    /// Travel between the activities at `from` and `to` when leaving at `departure_time`.
    pub fn transport(&self, from: usize, to: usize, departure_time: f64) -> TransportCost {
        self.problem.transport(
            self.route.activity(from).location_id(),
            self.route.activity(to).location_id(),
            departure_time,
            self.route.vehicle_id(),
            self.route.driver_id(),
        )
    }

    pub fn activity_cost(&self, activity: &TourActivity, arrival_time: f64) -> f64 {
        self.problem.activity_cost(
            activity,
            arrival_time,
            self.route.vehicle_id(),
            self.route.driver_id(),
        )
    }

    pub fn route_state<T: StateType>(&self, key: StateKey<T>) -> T {
        read_or_default(
            self.states.route_value(key.index()),
            self.manager.registered_default(key),
        )
    }

    pub fn activity_state<T: StateType>(&self, key: StateKey<T>, position: usize) -> T {
        read_or_default(
            self.states.activity_value(key.index(), position),
            self.manager.registered_default(key),
        )
    }

    pub fn put_route_state<T: StateType>(&mut self, key: StateKey<T>, value: T) {
        self.states
            .put_route_value(key.index(), value.into_state_value());
    }

    pub fn put_activity_state<T: StateType>(&mut self, key: StateKey<T>, position: usize, value: T) {
        self.states
            .put_activity_value(key.index(), position, value.into_state_value());
    }

    pub fn set_activity_times(&mut self, position: usize, arrival_time: f64, end_time: f64) {
        self.route
            .activity_mut(position)
            .set_times(arrival_time, end_time);
    }

    pub fn set_activity_load(&mut self, position: usize, load: Capacity) {
        self.route.activity_mut(position).set_load(load);
    }
}

/// Reads `value`, then the registered default, then the neutral value of the type.
pub(crate) fn read_or_default<T: StateType>(
    value: Option<&StateValue>,
    default: Option<&StateValue>,
) -> T {
    value
        .and_then(T::from_state_value)
        .or_else(|| default.and_then(T::from_state_value))
        .unwrap_or_else(T::neutral)
}
