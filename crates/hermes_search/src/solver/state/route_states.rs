use fxhash::FxHashMap;

use super::StateValue;

/// Everything the updaters computed for one route, keyed by `(key, activity position)` for
/// activity states and by key for route states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteStates {
    route: FxHashMap<usize, StateValue>,
    activity: FxHashMap<(usize, usize), StateValue>,
    computed_version: Option<usize>,
}

impl RouteStates {
    #[inline]
    pub(crate) fn route_value(&self, key: usize) -> Option<&StateValue> {
        self.route.get(&key)
    }

    #[inline]
    pub(crate) fn activity_value(&self, key: usize, position: usize) -> Option<&StateValue> {
        self.activity.get(&(key, position))
    }

    pub(super) fn put_route_value(&mut self, key: usize, value: StateValue) {
        self.route.insert(key, value);
    }

    pub(super) fn put_activity_value(&mut self, key: usize, position: usize, value: StateValue) {
        self.activity.insert((key, position), value);
    }

    pub(super) fn clear(&mut self) {
        self.route.clear();
        self.activity.clear();
        self.computed_version = None;
    }

    pub(super) fn mark_computed(&mut self, version: usize) {
        self.computed_version = Some(version);
    }

    /// Whether the states were computed for the given route version.
    pub fn is_fresh(&self, version: usize) -> bool {
        self.computed_version == Some(version)
    }
}
