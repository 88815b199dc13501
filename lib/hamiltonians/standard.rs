//! Standard (MSW) matter effects: the vacuum term plus the charged-current
//! potential on the `ee` element.

use log::debug;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    engine::PropagationEngine,
    flavor::NUM_NUS,
    hamiltonians::{ fill_upper, scales, HamBuild },
};

/// Hamiltonian builder for three flavors in matter without non-standard
/// interactions.
#[derive(Clone, Debug)]
pub struct HBuilderStd<E>
where E: PropagationEngine
{
    engine: E,
    ham: nd::Array2<C64>,
}

impl<E> HBuilderStd<E>
where E: PropagationEngine
{
    /// Create a new `HBuilderStd`. The Hamiltonian is zero until the first
    /// call to [`HamBuild::update_ham`].
    pub fn new(engine: E) -> Self {
        Self { engine, ham: nd::Array2::zeros((NUM_NUS, NUM_NUS)) }
    }

    /// Give back the engine.
    pub fn into_engine(self) -> E { self.engine }
}

impl<E> HamBuild for HBuilderStd<E>
where E: PropagationEngine
{
    type Engine = E;

    fn engine(&self) -> &E { &self.engine }

    fn engine_mut(&mut self) -> &mut E { &mut self.engine }

    fn update_ham(&mut self) {
        let (lv, kr2GNe) = scales(&self.engine);
        let nubar = self.engine.is_nubar();
        let hms = self.engine.mass_matrix();
        debug!("building standard Hamiltonian: 2E = {lv:e} eV, V = {kr2GNe:e} eV");
        fill_upper(&mut self.ham, nubar, |i, j| hms[[i, j]] / lv);
        if nubar {
            self.ham[[0, 0]] -= kr2GNe;
        } else {
            self.ham[[0, 0]] += kr2GNe;
        }
    }

    fn ham(&self) -> &nd::Array2<C64> { &self.ham }
}
