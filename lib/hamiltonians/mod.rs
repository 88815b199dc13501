//! Hamiltonian builders for three-flavor propagation in matter.
//!
//! All builders write only the upper triangle (`i <= j`) of their Hamiltonian
//! matrix; Hermiticity is implied by the storage convention. Use
//! [`HamBuild::hermitian`] to get the full matrix.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    constants::{ matter_potential, two_e_ev },
    engine::PropagationEngine,
    flavor::{ upper_pairs, NUM_NUS },
};

pub mod standard;
pub use standard::HBuilderStd;

pub mod nsi;
pub use nsi::HBuilderNsi;

/// Basic requirements for any matter Hamiltonian builder.
pub trait HamBuild {
    /// Source of the vacuum term, path, energy, and eigensystem flag.
    type Engine: PropagationEngine;

    /// Return a reference to the engine.
    fn engine(&self) -> &Self::Engine;

    /// Return a mutable reference to the engine.
    fn engine_mut(&mut self) -> &mut Self::Engine;

    /// Rebuild the Hamiltonian [eV] from the engine's current state.
    fn update_ham(&mut self);

    /// Return the most recently built Hamiltonian, upper triangle only.
    fn ham(&self) -> &nd::Array2<C64>;

    /// Return the most recently built Hamiltonian as a full Hermitian matrix.
    fn hermitian(&self) -> nd::Array2<C64> { hermitian_from_upper(self.ham()) }
}

/// Fill the lower triangle of a square matrix with the conjugate of its upper
/// triangle.
///
/// *Panics* if `upper` is not square.
pub fn hermitian_from_upper(upper: &nd::Array2<C64>) -> nd::Array2<C64> {
    let n = upper.nrows();
    if upper.ncols() != n {
        panic!("hermitian_from_upper: encountered non-square matrix");
    }
    nd::Array2::from_shape_fn((n, n), |(i, j)| {
        if i <= j { upper[[i, j]] } else { upper[[j, i]].conj() }
    })
}

/// The two scalars every builder needs from the engine: `2E` in eV and the
/// charged-current matter potential in eV.
pub(crate) fn scales<E>(engine: &E) -> (f64, f64)
where E: PropagationEngine
{
    let path = engine.path();
    (two_e_ev(engine.energy()), matter_potential(path.density, path.zoa))
}

/// Write `f(i, j)` into the upper triangle of `ham`, conjugated for
/// antineutrinos.
pub(crate) fn fill_upper<F>(ham: &mut nd::Array2<C64>, nubar: bool, f: F)
where F: Fn(usize, usize) -> C64
{
    debug_assert_eq!(ham.dim(), (NUM_NUS, NUM_NUS));
    for (i, j) in upper_pairs() {
        let h = f(i, j);
        ham[[i, j]] = if nubar { h.conj() } else { h };
    }
}
