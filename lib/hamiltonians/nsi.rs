//! Matter effects with non-standard interactions (NSI).
//!
//! The matter potential is weighted by a Hermitian matrix of couplings
//! `eps`, stored in its upper triangle only:
//! ```text
//! H = Hms / 2E + V_CC * eps        (neutrinos)
//! H = conj(Hms / 2E - V_CC * eps)  (antineutrinos)
//! ```
//! The `ee` coupling is stored as `1 + eps_ee` so that `eps` carries the
//! standard charged-current term as well.

use std::{ fmt, rc::Rc };
use log::{ debug, warn };
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    engine::PropagationEngine,
    flavor::{ Flavor, FlavorWarning, NUM_NUS },
    hamiltonians::{ fill_upper, scales, HamBuild },
    nsi::NsiParams,
};

/// Hamiltonian builder for three flavors in matter with NSI couplings.
///
/// Flavor indices are `0 = nue`, `1 = numu`, `2 = nutau`. Index pairs are
/// unordered from the caller's side: a pair given as `(j, i)` with `j > i` is
/// swapped (with a [`FlavorWarning::Reversed`]) and treated as `(i, j)`.
/// Out-of-range indices never panic; they produce a warning and a no-op or a
/// zero return.
///
/// Warnings go to [`log::warn!`] and, if installed with
/// [`Self::with_warning_handler`], to a user-supplied callback.
#[derive(Clone)]
pub struct HBuilderNsi<E>
where E: PropagationEngine
{
    engine: E,
    eps: nd::Array2<C64>,
    ham: nd::Array2<C64>,
    on_warning: Option<Rc<dyn Fn(&FlavorWarning)>>,
}

impl<E> fmt::Debug for HBuilderNsi<E>
where E: PropagationEngine + fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HBuilderNsi {{ \
            engine: {:?}, \
            eps: {:?}, \
            ham: {:?}, \
            on_warning: ",
            self.engine,
            self.eps,
            self.ham,
        )?;
        if self.on_warning.is_some() {
            write!(f, "Some(...)")?;
        } else {
            write!(f, "None")?;
        }
        write!(f, " }}")?;
        Ok(())
    }
}

impl<E> HBuilderNsi<E>
where E: PropagationEngine
{
    /// Create a new `HBuilderNsi` with all NSI couplings set to zero.
    ///
    /// Because of the `ee` offset, this leaves `eps[0][0] == 1`.
    pub fn new(engine: E) -> Self {
        let mut builder = Self {
            engine,
            eps: nd::Array2::zeros((NUM_NUS, NUM_NUS)),
            ham: nd::Array2::zeros((NUM_NUS, NUM_NUS)),
            on_warning: None,
        };
        builder.set_nsi_params(&NsiParams::default());
        builder
    }

    /// Like [`Self::new`], but starting from the given couplings.
    pub fn with_params(engine: E, params: &NsiParams) -> Self {
        let mut builder = Self::new(engine);
        builder.set_nsi_params(params);
        builder
    }

    /// Send every [`FlavorWarning`] to `f` in addition to the log.
    pub fn with_warning_handler<F>(mut self, f: F) -> Self
    where F: Fn(&FlavorWarning) + 'static
    {
        self.on_warning = Some(Rc::new(f));
        self
    }

    /// Give back the engine.
    pub fn into_engine(self) -> E { self.engine }

    fn report(&self, warning: FlavorWarning) {
        warn!("{}", warning);
        if let Some(f) = &self.on_warning { f(&warning); }
    }

    // swap a reversed pair, then check range; `invalid` builds the warning to
    // report if the pair is out of range
    fn checked_pair<W>(&self, flvi: usize, flvj: usize, invalid: W)
        -> Option<(usize, usize)>
    where W: FnOnce(usize, usize) -> FlavorWarning
    {
        let (flvi, flvj)
            = if flvi > flvj {
                self.report(FlavorWarning::Reversed { flvi, flvj });
                (flvj, flvi)
            } else {
                (flvi, flvj)
            };
        if flvj >= NUM_NUS {
            self.report(invalid(flvi, flvj));
            return None;
        }
        Some((flvi, flvj))
    }

    /// Set all NSI parameters at once.
    ///
    /// `eps_ee`, `eps_mumu`, and `eps_tautau` are real couplings; `eps_emu`,
    /// `eps_etau`, and `eps_mutau` are magnitudes of complex couplings whose
    /// phases [rad] are `delta_emu`, `delta_etau`, and `delta_mutau`.
    #[allow(clippy::too_many_arguments)]
    pub fn set_nsi(
        &mut self,
        eps_ee: f64,
        eps_emu: f64,
        eps_etau: f64,
        eps_mumu: f64,
        eps_mutau: f64,
        eps_tautau: f64,
        delta_emu: f64,
        delta_etau: f64,
        delta_mutau: f64,
    ) {
        self.set_nsi_params(
            &NsiParams::new(
                eps_ee, eps_emu, eps_etau,
                eps_mumu, eps_mutau, eps_tautau,
                delta_emu, delta_etau, delta_mutau,
            )
        );
    }

    /// Set all NSI parameters at once from an [`NsiParams`].
    pub fn set_nsi_params(&mut self, params: &NsiParams) {
        for (a, b, val, phase) in params.entries() {
            self.set_eps(a.index(), b.index(), val, phase);
        }
    }

    /// Set a single NSI coupling.
    ///
    /// For `flvi == flvj`, `val` is the real coupling and `phase` is ignored;
    /// otherwise the coupling is `val * exp(i phase)`. The eigensystem is
    /// invalidated only if the stored value actually changes.
    pub fn set_eps(&mut self, flvi: usize, flvj: usize, val: f64, phase: f64) {
        let invalid
            = |flvi, flvj| FlavorWarning::InvalidSet {
                flvi, flvj, num_nus: NUM_NUS
            };
        let Some((i, j)) = self.checked_pair(flvi, flvj, invalid)
            else { return; };

        let mut h = C64::from(val);
        if i != j {
            h *= C64::new(phase.cos(), phase.sin());
        } else if i == 0 {
            h += 1.0;
        }

        if self.eps[[i, j]] != h {
            debug!("Eps_{}{} changed: {} -> {}", i, j, self.eps[[i, j]], h);
            self.engine.invalidate_eigensystem();
        }
        self.eps[[i, j]] = h;
    }

    /// Get a single stored NSI coupling, or zero if the indices are invalid.
    ///
    /// Note that the `ee` coupling is returned as stored, i.e. `1 + eps_ee`.
    pub fn get_eps(&self, flvi: usize, flvj: usize) -> C64 {
        let invalid
            = |flvi, flvj| FlavorWarning::InvalidGet {
                flvi, flvj, num_nus: NUM_NUS
            };
        self.checked_pair(flvi, flvj, invalid)
            .map(|(i, j)| self.eps[[i, j]])
            .unwrap_or_else(C64::zero)
    }

    /// Like [`Self::get_eps`], but for flavors, which are always valid and
    /// may be given in either order without a warning.
    pub fn eps(&self, a: Flavor, b: Flavor) -> C64 {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        self.eps[[a.index(), b.index()]]
    }

    /// Set `eps_ee`.
    pub fn set_eps_ee(&mut self, a: f64) { self.set_eps(0, 0, a, 0.0); }

    /// Set `eps_mumu`.
    pub fn set_eps_mumu(&mut self, a: f64) { self.set_eps(1, 1, a, 0.0); }

    /// Set `eps_tautau`.
    pub fn set_eps_tautau(&mut self, a: f64) { self.set_eps(2, 2, a, 0.0); }

    /// Set `eps_emu` to magnitude `a` and phase `phi` [rad].
    pub fn set_eps_emu(&mut self, a: f64, phi: f64) {
        self.set_eps(0, 1, a, phi);
    }

    /// Set `eps_etau` to magnitude `a` and phase `phi` [rad].
    pub fn set_eps_etau(&mut self, a: f64, phi: f64) {
        self.set_eps(0, 2, a, phi);
    }

    /// Set `eps_mutau` to magnitude `a` and phase `phi` [rad].
    pub fn set_eps_mutau(&mut self, a: f64, phi: f64) {
        self.set_eps(1, 2, a, phi);
    }

    /// Read the stored couplings back as physical parameters.
    ///
    /// Phases of vanishing off-diagonal couplings come back as zero.
    pub fn nsi_params(&self) -> NsiParams {
        let diag = |k: usize| self.eps[[k, k]].re;
        let polar = |i: usize, j: usize| {
            let z = self.eps[[i, j]];
            if z.is_zero() { (0.0, 0.0) } else { z.to_polar() }
        };
        let (eps_emu, delta_emu) = polar(0, 1);
        let (eps_etau, delta_etau) = polar(0, 2);
        let (eps_mutau, delta_mutau) = polar(1, 2);
        NsiParams {
            eps_ee: diag(0) - 1.0,
            eps_emu,
            eps_etau,
            eps_mumu: diag(1),
            eps_mutau,
            eps_tautau: diag(2),
            delta_emu,
            delta_etau,
            delta_mutau,
        }
    }
}

impl<E> HamBuild for HBuilderNsi<E>
where E: PropagationEngine
{
    type Engine = E;

    fn engine(&self) -> &E { &self.engine }

    fn engine_mut(&mut self) -> &mut E { &mut self.engine }

    fn update_ham(&mut self) {
        let (lv, kr2GNe) = scales(&self.engine);
        let nubar = self.engine.is_nubar();
        let hms = self.engine.mass_matrix();
        let eps = &self.eps;
        debug!("building NSI Hamiltonian: 2E = {lv:e} eV, V = {kr2GNe:e} eV");
        if nubar {
            fill_upper(
                &mut self.ham,
                true,
                |i, j| hms[[i, j]] / lv - kr2GNe * eps[[i, j]],
            );
        } else {
            fill_upper(
                &mut self.ham,
                false,
                |i, j| hms[[i, j]] / lv + kr2GNe * eps[[i, j]],
            );
        }
    }

    fn ham(&self) -> &nd::Array2<C64> { &self.ham }
}
