//! Symbolic Value Domain
//!
//! Integer abstraction used for buffer sizes and index expressions.
//!
//! ## Lattice
//!
//! ```text
//!                 Unknown (⊤)
//!                    │
//!      Range [lo, hi], lo/hi ∈ ℤ ∪ {-∞, +∞}
//!                    │
//!              Constant(c) ≡ [c, c]
//! ```
//!
//! - `[l1,h1] + [l2,h2] = [l1+l2, h1+h2]`
//! - `[l1,h1] - [l2,h2] = [l1-h2, h1-l2]`
//! - `join([l1,h1], [l2,h2]) = [min(l1,l2), max(h1,h2)]`
//!
//! Finite overflow saturates to ±∞. `Unknown` absorbs every operation.
//!
//! ## Example
//!
//! ```text
//! size = mode == 1 ? 100 : 200   ← size ∈ [100, 200]
//! if cond { size = 300 }         ← size ∈ [100, 300]   (join)
//! buf[size - 1]                  ← index ∈ [99, 299]
//! n = extern_get_size()          ← n = ⊤
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Range endpoint: ℤ ∪ {-∞, +∞}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    NegInf,
    Finite(i64),
    PosInf,
}

impl Bound {
    pub fn is_finite(self) -> bool {
        matches!(self, Bound::Finite(_))
    }

    pub fn finite(self) -> Option<i64> {
        match self {
            Bound::Finite(v) => Some(v),
            _ => None,
        }
    }

    /// Saturating addition. `None` for the undefined sum `-∞ + +∞`.
    pub fn checked_add(self, other: Bound) -> Option<Bound> {
        match (self, other) {
            (Bound::NegInf, Bound::PosInf) | (Bound::PosInf, Bound::NegInf) => None,
            (Bound::NegInf, _) | (_, Bound::NegInf) => Some(Bound::NegInf),
            (Bound::PosInf, _) | (_, Bound::PosInf) => Some(Bound::PosInf),
            (Bound::Finite(a), Bound::Finite(b)) => Some(match a.checked_add(b) {
                Some(sum) => Bound::Finite(sum),
                None if a > 0 => Bound::PosInf,
                None => Bound::NegInf,
            }),
        }
    }

    /// Saturating subtraction. `None` for `+∞ - +∞` and `-∞ - -∞`.
    pub fn checked_sub(self, other: Bound) -> Option<Bound> {
        match other {
            Bound::NegInf => self.checked_add(Bound::PosInf),
            Bound::PosInf => self.checked_add(Bound::NegInf),
            Bound::Finite(v) => match v.checked_neg() {
                Some(neg) => self.checked_add(Bound::Finite(neg)),
                // -i64::MIN overflows: x - MIN = (x + MAX) + 1
                None => self
                    .checked_add(Bound::Finite(i64::MAX))
                    .and_then(|b| b.checked_add(Bound::Finite(1))),
            },
        }
    }

    /// `self - 1`, used for the last valid index of a buffer.
    pub fn predecessor(self) -> Bound {
        match self {
            Bound::Finite(v) => v.checked_sub(1).map_or(Bound::NegInf, Bound::Finite),
            other => other,
        }
    }
}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Bound::NegInf, Bound::NegInf) | (Bound::PosInf, Bound::PosInf) => Ordering::Equal,
            (Bound::NegInf, _) | (_, Bound::PosInf) => Ordering::Less,
            (_, Bound::NegInf) | (Bound::PosInf, _) => Ordering::Greater,
            (Bound::Finite(a), Bound::Finite(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInf => write!(f, "-∞"),
            Bound::PosInf => write!(f, "+∞"),
            Bound::Finite(v) => write!(f, "{}", v),
        }
    }
}

/// Abstract integer value
///
/// Values are normalised on construction: a singleton range is always stored
/// as `Constant`, so derived equality matches semantic equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicValue {
    /// Exactly one value
    Constant(i64),
    /// Every value in `[lo, hi]` is feasible (inclusive, `lo <= hi`)
    Range { lo: Bound, hi: Bound },
    /// Not statically determined (opaque call, unmodeled expression)
    Unknown,
}

impl SymbolicValue {
    pub fn constant(value: i64) -> Self {
        SymbolicValue::Constant(value)
    }

    pub fn unknown() -> Self {
        SymbolicValue::Unknown
    }

    /// Build `[lo, hi]`. Returns `None` for an empty range (`lo > hi`).
    pub fn range(lo: Bound, hi: Bound) -> Option<Self> {
        match lo.cmp(&hi) {
            Ordering::Greater => None,
            Ordering::Equal => match lo {
                Bound::Finite(c) => Some(SymbolicValue::Constant(c)),
                // [+∞, +∞] / [-∞, -∞] carry no usable information
                _ => Some(SymbolicValue::Unknown),
            },
            Ordering::Less if lo == Bound::NegInf && hi == Bound::PosInf => {
                Some(SymbolicValue::Unknown)
            }
            Ordering::Less => Some(SymbolicValue::Range { lo, hi }),
        }
    }

    /// Convenience for finite ranges: `[lo, hi]`
    pub fn interval(lo: i64, hi: i64) -> Option<Self> {
        Self::range(Bound::Finite(lo), Bound::Finite(hi))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SymbolicValue::Unknown)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, SymbolicValue::Constant(_))
    }

    pub fn as_constant(&self) -> Option<i64> {
        match self {
            SymbolicValue::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// `(lo, hi)` of the feasible values, `None` when unknown
    pub fn bounds(&self) -> Option<(Bound, Bound)> {
        match *self {
            SymbolicValue::Constant(c) => Some((Bound::Finite(c), Bound::Finite(c))),
            SymbolicValue::Range { lo, hi } => Some((lo, hi)),
            SymbolicValue::Unknown => None,
        }
    }

    pub fn add(&self, other: &SymbolicValue) -> SymbolicValue {
        let (Some((l1, h1)), Some((l2, h2))) = (self.bounds(), other.bounds()) else {
            return SymbolicValue::Unknown;
        };
        match (l1.checked_add(l2), h1.checked_add(h2)) {
            (Some(lo), Some(hi)) => Self::saturated(lo, hi),
            _ => SymbolicValue::Unknown,
        }
    }

    pub fn subtract(&self, other: &SymbolicValue) -> SymbolicValue {
        let (Some((l1, h1)), Some((l2, h2))) = (self.bounds(), other.bounds()) else {
            return SymbolicValue::Unknown;
        };
        match (l1.checked_sub(h2), h1.checked_sub(l2)) {
            (Some(lo), Some(hi)) => Self::saturated(lo, hi),
            _ => SymbolicValue::Unknown,
        }
    }

    /// Result of arithmetic on valid operands. A lower bound can only reach
    /// +∞ (and an upper bound -∞) through finite overflow, so it is pinned to
    /// the extreme finite value: `i64::MAX + 1` becomes `[i64::MAX, +∞]`.
    fn saturated(lo: Bound, hi: Bound) -> SymbolicValue {
        let lo = if lo == Bound::PosInf { Bound::Finite(i64::MAX) } else { lo };
        let hi = if hi == Bound::NegInf { Bound::Finite(i64::MIN) } else { hi };
        Self::range(lo, hi).unwrap_or(SymbolicValue::Unknown)
    }

    /// Product, exact only for two constants.
    ///
    /// Used for `calloc(n, m)`; anything non-constant is `Unknown`.
    pub fn multiply(&self, other: &SymbolicValue) -> SymbolicValue {
        match (self, other) {
            (SymbolicValue::Constant(a), SymbolicValue::Constant(b)) => a
                .checked_mul(*b)
                .map_or(SymbolicValue::Unknown, SymbolicValue::Constant),
            _ => SymbolicValue::Unknown,
        }
    }

    /// Least upper bound of two path values
    pub fn join(&self, other: &SymbolicValue) -> SymbolicValue {
        if self == other {
            return *self;
        }
        let (Some((l1, h1)), Some((l2, h2))) = (self.bounds(), other.bounds()) else {
            return SymbolicValue::Unknown;
        };
        Self::range(l1.min(l2), h1.max(h2)).unwrap_or(SymbolicValue::Unknown)
    }

    /// Intersection, used to narrow a value along a guarded edge.
    ///
    /// `Unknown` is never narrowed. `None` means the intersection is empty.
    pub fn meet(&self, other: &SymbolicValue) -> Option<SymbolicValue> {
        let Some((l1, h1)) = self.bounds() else {
            return Some(SymbolicValue::Unknown);
        };
        let Some((l2, h2)) = other.bounds() else {
            return Some(*self);
        };
        Self::range(l1.max(l2), h1.min(h2))
    }
}

impl Default for SymbolicValue {
    fn default() -> Self {
        SymbolicValue::Unknown
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicValue::Constant(c) => write!(f, "{}", c),
            SymbolicValue::Range { lo, hi } => write!(f, "[{}, {}]", lo, hi),
            SymbolicValue::Unknown => write!(f, "⊤"),
        }
    }
}
