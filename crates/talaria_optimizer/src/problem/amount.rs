use std::ops::{Add, AddAssign, Index, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

type Vector = SmallVec<[f64; 2]>;

/// Multi-dimensional quantity (demand, load or capacity).
///
/// Missing dimensions read as zero, so amounts of different lengths can be combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Amount(Vector);

pub type Capacity = Amount;

/// Shared zero amount for borrowed defaults.
pub static ZERO_AMOUNT: Amount = Amount::EMPTY;

impl Amount {
    pub const EMPTY: Amount = Amount(Vector::new_const());

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Amount(SmallVec::from_vec(values))
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Amount(SmallVec::from_elem(0.0, dimensions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when every dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&value| value == 0.0)
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    /// Component-wise `self <= capacity`.
    pub fn fits_in(&self, capacity: &Amount) -> bool {
        (0..self.len().max(capacity.len())).all(|index| self.get(index) <= capacity.get(index))
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Amount) -> Amount {
        let len = self.len().max(other.len());
        Amount((0..len).map(|index| self.get(index).max(other.get(index))).collect())
    }

    /// Keeps only the positive part of every dimension.
    pub fn positive(&self) -> Amount {
        Amount(self.0.iter().map(|&value| value.max(0.0)).collect())
    }

    /// Largest amount by which a dimension exceeds `capacity`, zero when it fits.
    pub fn excess_over(&self, capacity: &Amount) -> f64 {
        (0..self.len().max(capacity.len()))
            .map(|index| self.get(index) - capacity.get(index))
            .fold(0.0, f64::max)
    }

    fn combine(&self, other: &Amount, op: impl Fn(f64, f64) -> f64) -> Amount {
        let len = self.len().max(other.len());
        Amount((0..len).map(|index| op(self.get(index), other.get(index))).collect())
    }
}

impl Index<usize> for Amount {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, other: &Amount) -> Amount {
        self.combine(other, |a, b| a + b)
    }
}

impl Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, other: &Amount) -> Amount {
        self.combine(other, |a, b| a - b)
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, other: &Amount) {
        if other.len() > self.len() {
            self.0.resize(other.len(), 0.0);
        }

        for (index, value) in other.0.iter().enumerate() {
            self.0[index] += value;
        }
    }
}

impl SubAssign<&Amount> for Amount {
    fn sub_assign(&mut self, other: &Amount) {
        if other.len() > self.len() {
            self.0.resize(other.len(), 0.0);
        }

        for (index, value) in other.0.iter().enumerate() {
            self.0[index] -= value;
        }
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(self.0.iter().map(|value| -value).collect())
    }
}

impl From<Vec<f64>> for Amount {
    fn from(values: Vec<f64>) -> Self {
        Amount::from_vec(values)
    }
}
