//! Neutrino flavors and the diagnostics raised for bad flavor-index arguments.

use std::fmt;
use itertools::Itertools;
use thiserror::Error;

/// Number of neutrino flavors handled by the Hamiltonian builders.
pub const NUM_NUS: usize = 3;

/// Iterate over all index pairs `(i, j)` with `i <= j < NUM_NUS`, row by row.
///
/// These are the only entries written in the triangular coefficient and
/// Hamiltonian matrices.
pub fn upper_pairs() -> impl Iterator<Item = (usize, usize)> {
    (0..NUM_NUS).cartesian_product(0..NUM_NUS)
        .filter(|(i, j)| i <= j)
}

/// A single neutrino flavor.
///
/// Flavors are ordered `E < Mu < Tau`, matching their matrix indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flavor {
    E,
    Mu,
    Tau,
}

impl Flavor {
    /// All flavors by ascending index.
    pub const ALL: [Flavor; NUM_NUS] = [Self::E, Self::Mu, Self::Tau];

    /// Return the matrix index of `self`.
    pub fn index(self) -> usize {
        match self {
            Self::E => 0,
            Self::Mu => 1,
            Self::Tau => 2,
        }
    }

    /// Return the flavor with matrix index `k`, if there is one.
    pub fn from_index(k: usize) -> Option<Self> { Self::ALL.get(k).copied() }

    /// Short label as used in subscripts, e.g. `"mu"` in `eps_emu`.
    pub fn label(self) -> &'static str {
        match self {
            Self::E => "e",
            Self::Mu => "mu",
            Self::Tau => "tau",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nu_{}", self.label())
    }
}

/// Problems with a flavor-index pair passed to an NSI coefficient accessor.
///
/// None of these are fatal: a reversed pair is swapped and used, and an
/// out-of-range pair turns the call into a no-op (or a zero return).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FlavorWarning {
    /// The first index was larger than the second; the pair was swapped.
    #[error(
        "first flavor index should not exceed the second; \
        using reverse order (Eps_{flvj}{flvi})"
    )]
    Reversed { flvi: usize, flvj: usize },
    /// A setter received an index outside `0..num_nus`.
    #[error("Eps_{flvi}{flvj} not valid for {num_nus} neutrinos; doing nothing")]
    InvalidSet { flvi: usize, flvj: usize, num_nus: usize },
    /// A getter received an index outside `0..num_nus`.
    #[error("Eps_{flvi}{flvj} not valid for {num_nus} neutrinos; returning 0")]
    InvalidGet { flvi: usize, flvj: usize, num_nus: usize },
}
