use std::{fmt, marker::PhantomData};

use crate::problem::capacity::Capacity;

/// A stored state value.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Number(f64),
    Load(Capacity),
    Flag(bool),
}

/// Types that can be stored in the state store.
pub trait StateType: Clone {
    fn into_state_value(self) -> StateValue;
    fn from_state_value(value: &StateValue) -> Option<Self>;
    /// Read for a key without any registered default.
    fn neutral() -> Self;
}

impl StateType for f64 {
    fn into_state_value(self) -> StateValue {
        StateValue::Number(self)
    }

    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    fn neutral() -> Self {
        0.0
    }
}

impl StateType for Capacity {
    fn into_state_value(self) -> StateValue {
        StateValue::Load(self)
    }

    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Load(load) => Some(load.clone()),
            _ => None,
        }
    }

    fn neutral() -> Self {
        Capacity::EMPTY
    }
}

impl StateType for bool {
    fn into_state_value(self) -> StateValue {
        StateValue::Flag(self)
    }

    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    fn neutral() -> Self {
        false
    }
}

/// Typed handle on a state slot. Built-in keys live in [`keys`](super::keys), custom ones are
/// created with [`StateManager::create_state_key`](super::StateManager::create_state_key),
/// which also registers their default.
pub struct StateKey<T> {
    index: usize,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    pub(crate) const fn new(index: usize, name: &'static str) -> Self {
        StateKey {
            index,
            name,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({}, {})", self.index, self.name)
    }
}
