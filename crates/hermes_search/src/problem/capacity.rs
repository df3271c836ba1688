use std::ops::{Add, AddAssign, Index, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

type CapacityVector = SmallVec<[f64; 4]>;

/// A multi-dimensional amount, used both for vehicle capacities and job demands.
///
/// Dimensions missing from the shorter operand are treated as zero.
#[derive(Default, Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Capacity(CapacityVector);

impl Capacity {
    pub const EMPTY: Capacity = Capacity(CapacityVector::new_const());

    pub fn from_vec(vec: Vec<f64>) -> Self {
        Capacity(CapacityVector::from_vec(vec))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().cloned()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).cloned().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0.0)
    }

    /// Whether every dimension of `self` is lower or equal to the same dimension of `capacity`.
    pub fn fits_in(&self, capacity: &Capacity) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(index, &amount)| amount <= capacity.get(index))
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Capacity) -> Capacity {
        let size = self.len().max(other.len());
        Capacity(
            (0..size)
                .map(|index| self.get(index).max(other.get(index)))
                .collect(),
        )
    }

    /// Sum of every dimension exceeding `capacity`.
    pub fn overflow(&self, capacity: &Capacity) -> f64 {
        self.0
            .iter()
            .enumerate()
            .map(|(index, &amount)| (amount - capacity.get(index)).max(0.0))
            .sum()
    }

    /// Sum over all dimensions, used to rank jobs by size.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl AddAssign<&Capacity> for Capacity {
    fn add_assign(&mut self, rhs: &Capacity) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), 0.0);
        }

        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a += *b;
        }
    }
}

impl SubAssign<&Capacity> for Capacity {
    fn sub_assign(&mut self, rhs: &Capacity) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), 0.0);
        }

        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a -= *b;
        }
    }
}

impl Add<&Capacity> for &Capacity {
    type Output = Capacity;

    fn add(self, rhs: &Capacity) -> Self::Output {
        let mut output = self.clone();
        output += rhs;
        output
    }
}

impl Sub<&Capacity> for &Capacity {
    type Output = Capacity;

    fn sub(self, rhs: &Capacity) -> Self::Output {
        let mut output = self.clone();
        output -= rhs;
        output
    }
}

impl Neg for &Capacity {
    type Output = Capacity;

    fn neg(self) -> Self::Output {
        Capacity(self.0.iter().map(|amount| -amount).collect())
    }
}

impl Index<usize> for Capacity {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
