use std::error::Error;
use std::fmt::{self, Display};
use std::ops::Add;

/// Result with boxed error as trait object.
pub type GenericResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[cfg(test)]
pub type TestResult = Result<(), Box<dyn Error>>;

/// A path length that is either a natural number or infinity (no path).
/// Addition saturates at infinity, so `inf + x == inf` for every `x`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NaturalOrInfinite(u64);

impl NaturalOrInfinite {
    pub const fn infinity() -> Self {
        Self(u64::MAX)
    }

    pub const fn finite(value: u64) -> Self {
        Self(value)
    }

    pub fn is_infinite(self) -> bool {
        self.0 == u64::MAX
    }

    pub fn is_finite(self) -> bool {
        !self.is_infinite()
    }

    /// The value as a plain number; `None` for infinity.
    pub fn value(self) -> Option<u64> {
        self.is_finite().then_some(self.0)
    }

    /// # Panics (debug builds)
    /// If the value is infinite.
    pub fn finite_value(self) -> u64 {
        debug_assert!(self.is_finite(), "finite_value() called on infinity");
        self.0
    }
}

impl From<u32> for NaturalOrInfinite {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl Add for NaturalOrInfinite {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Display for NaturalOrInfinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "inf"),
        }
    }
}

/// Cursor over all `k`-element subsets of `items`, in lexicographic order of positions.
///
/// The cursor is finite and can be rewound with [Combinations::restart], which lets a
/// caller stop a search at any subset and resume or repeat it later.
#[derive(Clone, Debug)]
pub struct Combinations<'a, T> {
    items: &'a [T],
    positions: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            positions: (0..k).collect(),
            started: false,
            exhausted: k > items.len(),
        }
    }

    /// Rewind to the first subset.
    pub fn restart(&mut self) {
        let k = self.positions.len();
        self.positions = (0..k).collect();
        self.started = false;
        self.exhausted = k > self.items.len();
    }

    /// Move `positions` to the next subset. Returns false if there is none.
    fn advance(&mut self) -> bool {
        let n = self.items.len();
        let k = self.positions.len();
        let Some(i) = (0..k).rev().find(|&i| self.positions[i] != i + n - k) else {
            return false;
        };
        self.positions[i] += 1;
        for j in i + 1..k {
            self.positions[j] = self.positions[j - 1] + 1;
        }
        true
    }
}

impl<'a, T: Copy> Iterator for Combinations<'a, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.exhausted = true;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.positions.iter().map(|&p| self.items[p]).collect())
    }
}

/// All subsets of `items` of size `k`.
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Combinations<'_, T> {
    Combinations::new(items, k)
}
