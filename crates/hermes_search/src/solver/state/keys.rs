//! Built-in state keys and their defaults.
//!
//! The default is what a read returns when no updater has written the key for the route or
//! activity, for instance because the producing updater is not registered.

use crate::problem::capacity::Capacity;

use super::{StateKey, StateValue};

/// Route: time the vehicle leaves its start. Default `-inf`, consumers clamp it to the vehicle
/// earliest start.
pub const DEPARTURE_TIME: StateKey<f64> = StateKey::new(0, "departure_time");

/// Activity: latest operation start keeping every following activity feasible. Default `+inf`.
pub const LATEST_OPERATION_START: StateKey<f64> = StateKey::new(1, "latest_operation_start");

/// Activity: how much the operation start can be delayed. Default `+inf`.
pub const TIME_SLACK: StateKey<f64> = StateKey::new(2, "time_slack");

/// Activity: load after the activity. Default empty.
pub const LOAD: StateKey<Capacity> = StateKey::new(3, "load");

/// Activity: maximum load from the start up to the activity. Default empty.
pub const PAST_MAX_LOAD: StateKey<Capacity> = StateKey::new(4, "past_max_load");

/// Activity: maximum load from the activity up to the end. Default empty.
pub const FUTURE_MAX_LOAD: StateKey<Capacity> = StateKey::new(5, "future_max_load");

/// Route: load on board when leaving the start, i.e. every delivery. Default empty.
pub const LOAD_AT_BEGINNING: StateKey<Capacity> = StateKey::new(6, "load_at_beginning");

/// Route: load on board at the end, i.e. every pickup. Default empty.
pub const LOAD_AT_END: StateKey<Capacity> = StateKey::new(7, "load_at_end");

/// Route: maximum load over the whole route. Default empty.
pub const MAX_LOAD: StateKey<Capacity> = StateKey::new(8, "max_load");

/// Activity: transport and activity costs accumulated up to the activity. Default `0`.
pub const COSTS: StateKey<f64> = StateKey::new(9, "costs");

/// Route: transport and activity costs, without the fixed cost. Default `0`.
pub const ROUTE_COSTS: StateKey<f64> = StateKey::new(10, "route_costs");

/// Route: travelled distance. Default `0`.
pub const ROUTE_DISTANCE: StateKey<f64> = StateKey::new(11, "route_distance");

/// Route: time between departure and arrival at the end. Default `0`.
pub const ROUTE_DURATION: StateKey<f64> = StateKey::new(12, "route_duration");

/// Route: total waiting time. Default `0`.
pub const WAITING_TIME: StateKey<f64> = StateKey::new(13, "waiting_time");

pub(crate) const BUILTIN_KEY_COUNT: usize = 14;

pub(crate) fn builtin_defaults() -> Vec<(&'static str, StateValue)> {
    let defaults = vec![
        (DEPARTURE_TIME.name(), StateValue::Number(f64::NEG_INFINITY)),
        (LATEST_OPERATION_START.name(), StateValue::Number(f64::INFINITY)),
        (TIME_SLACK.name(), StateValue::Number(f64::INFINITY)),
        (LOAD.name(), StateValue::Load(Capacity::EMPTY)),
        (PAST_MAX_LOAD.name(), StateValue::Load(Capacity::EMPTY)),
        (FUTURE_MAX_LOAD.name(), StateValue::Load(Capacity::EMPTY)),
        (LOAD_AT_BEGINNING.name(), StateValue::Load(Capacity::EMPTY)),
        (LOAD_AT_END.name(), StateValue::Load(Capacity::EMPTY)),
        (MAX_LOAD.name(), StateValue::Load(Capacity::EMPTY)),
        (COSTS.name(), StateValue::Number(0.0)),
        (ROUTE_COSTS.name(), StateValue::Number(0.0)),
        (ROUTE_DISTANCE.name(), StateValue::Number(0.0)),
        (ROUTE_DURATION.name(), StateValue::Number(0.0)),
        (WAITING_TIME.name(), StateValue::Number(0.0)),
    ];
    debug_assert_eq!(defaults.len(), BUILTIN_KEY_COUNT);

    defaults
}
