//! State supplied to the Hamiltonian builders by a propagation engine: the
//! vacuum mass-squared matrix, the neutrino path, the energy, and whether the
//! engine's cached eigensystem is still valid.

use std::f64::consts::PI;
use log::debug;
use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::flavor::{ upper_pairs, NUM_NUS };

/// A straight segment of neutrino path through matter of constant density.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NuPath {
    /// Segment length [km].
    pub length: f64,
    /// Matter density [g/cm^3].
    pub density: f64,
    /// Electron fraction Z/A.
    pub zoa: f64,
}

impl NuPath {
    /// Create a new path segment.
    pub fn new(length: f64, density: f64, zoa: f64) -> Self {
        Self { length, density, zoa }
    }

    /// 1000 km through the Earth's crust: 2.6 g/cm^3 with Z/A = 0.5.
    pub fn std() -> Self { Self::new(1000.0, 2.6, 0.5) }

    /// Return `true` if `self` and `other` describe the same medium, i.e.
    /// produce the same matter potential.
    pub fn same_matter(&self, other: &Self) -> bool {
        self.density == other.density && self.zoa == other.zoa
    }
}

impl Default for NuPath {
    fn default() -> Self { Self::std() }
}

/// Three-flavor mixing angles, CP phase, and mass splittings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixingParams {
    /// θ₁₂ [rad]
    pub theta12: f64,
    /// θ₁₃ [rad]
    pub theta13: f64,
    /// θ₂₃ [rad]
    pub theta23: f64,
    /// δ_CP [rad]
    pub delta_cp: f64,
    /// Δm²₂₁ [eV^2]
    pub dm21: f64,
    /// Δm²₃₁ [eV^2]; negative for inverted ordering
    pub dm31: f64,
}

impl MixingParams {
    /// Create mixing parameters from sin²θ values, as commonly quoted by
    /// global fits.
    pub fn from_sinsq(
        s12sq: f64,
        s13sq: f64,
        s23sq: f64,
        delta_cp: f64,
        dm21: f64,
        dm31: f64,
    ) -> Self
    {
        Self {
            theta12: s12sq.sqrt().asin(),
            theta13: s13sq.sqrt().asin(),
            theta23: s23sq.sqrt().asin(),
            delta_cp,
            dm21,
            dm31,
        }
    }

    /// NuFit 5.2 best-fit values, normal ordering.
    pub fn nufit52_no() -> Self {
        Self::from_sinsq(0.307, 0.02203, 0.546, 1.36 * PI, 7.42e-5, 2.517e-3)
    }

    /// NuFit 5.2 best-fit values, inverted ordering.
    pub fn nufit52_io() -> Self {
        Self::from_sinsq(0.307, 0.02219, 0.539, 1.56 * PI, 7.42e-5, -2.498e-3)
    }

    /// No mixing and no mass splittings; gives a vanishing vacuum term.
    pub fn massless() -> Self {
        Self {
            theta12: 0.0,
            theta13: 0.0,
            theta23: 0.0,
            delta_cp: 0.0,
            dm21: 0.0,
            dm31: 0.0,
        }
    }

    /// Compute the PMNS matrix `U = R₂₃ U₁₃(δ) R₁₂`, with rows indexed by
    /// flavor and columns by mass state.
    pub fn pmns(&self) -> nd::Array2<C64> {
        let (s12, c12) = self.theta12.sin_cos();
        let (s13, c13) = self.theta13.sin_cos();
        let (s23, c23) = self.theta23.sin_cos();
        let eid = C64::from_polar(1.0, self.delta_cp);
        let one = C64::from(1.0);
        let zero = C64::from(0.0);
        let r23: nd::Array2<C64> = nd::array![
            [one,  zero,            zero           ],
            [zero, C64::from(c23),  C64::from(s23) ],
            [zero, C64::from(-s23), C64::from(c23) ],
        ];
        let u13: nd::Array2<C64> = nd::array![
            [C64::from(c13),  zero, s13 * eid.conj()],
            [zero,            one,  zero            ],
            [-s13 * eid,      zero, C64::from(c13)  ],
        ];
        let r12: nd::Array2<C64> = nd::array![
            [C64::from(c12),  C64::from(s12), zero],
            [C64::from(-s12), C64::from(c12), zero],
            [zero,            zero,           one ],
        ];
        r23.dot(&u13).dot(&r12)
    }

    /// Compute the vacuum mass-squared matrix `U diag(0, Δm²₂₁, Δm²₃₁) U†` in
    /// the flavor basis [eV^2].
    ///
    /// Only the upper triangle is filled; entries below the diagonal are zero.
    pub fn mass_matrix(&self) -> nd::Array2<C64> {
        let U = self.pmns();
        let dm: [f64; NUM_NUS] = [0.0, self.dm21, self.dm31];
        let mut hms: nd::Array2<C64> = nd::Array2::zeros((NUM_NUS, NUM_NUS));
        for (i, j) in upper_pairs() {
            hms[[i, j]]
                = dm.iter().enumerate()
                .map(|(k, dmk)| U[[i, k]] * *dmk * U[[j, k]].conj())
                .sum();
        }
        hms
    }
}

impl Default for MixingParams {
    fn default() -> Self { Self::nufit52_no() }
}

/// Everything a Hamiltonian builder needs to read from the surrounding
/// propagation engine.
///
/// The engine owns the eigensystem cache; builders may only clear its validity
/// flag, never set it.
pub trait PropagationEngine {
    /// Vacuum mass-squared matrix in the flavor basis [eV^2], upper triangle.
    fn mass_matrix(&self) -> &nd::Array2<C64>;

    /// Current path segment.
    fn path(&self) -> &NuPath;

    /// Neutrino energy [GeV].
    fn energy(&self) -> f64;

    /// Return `true` if propagating antineutrinos.
    fn is_nubar(&self) -> bool;

    /// Mark the cached eigensystem as stale.
    fn invalidate_eigensystem(&mut self);

    /// Return `true` if the cached eigensystem still matches the current
    /// parameters.
    fn eigensystem_valid(&self) -> bool;
}

/// A [`PropagationEngine`] holding standard three-flavor PMNS mixing.
///
/// Every setter compares against the stored value and invalidates the
/// eigensystem only on an actual change.
#[derive(Clone, Debug)]
pub struct PmnsEngine {
    mixing: MixingParams,
    hms: nd::Array2<C64>,
    path: NuPath,
    energy: f64,
    nubar: bool,
    got_es: bool,
}

impl Default for PmnsEngine {
    fn default() -> Self { Self::new() }
}

impl PmnsEngine {
    /// Create a new engine with NuFit 5.2 normal-ordering parameters, the
    /// [standard path][NuPath::std], 1 GeV neutrinos, and no eigensystem.
    pub fn new() -> Self {
        Self::with_mixing(MixingParams::default())
    }

    /// Like [`Self::new`], but with the given mixing parameters.
    pub fn with_mixing(mixing: MixingParams) -> Self {
        Self {
            mixing,
            hms: mixing.mass_matrix(),
            path: NuPath::std(),
            energy: 1.0,
            nubar: false,
            got_es: false,
        }
    }

    /// Return the current mixing parameters.
    pub fn mixing(&self) -> &MixingParams { &self.mixing }

    /// Return the PMNS matrix for the current mixing parameters.
    pub fn pmns(&self) -> nd::Array2<C64> { self.mixing.pmns() }

    /// Set the mixing parameters, rebuilding the mass-squared matrix.
    pub fn set_mixing(&mut self, mixing: MixingParams) {
        if mixing == self.mixing { return; }
        self.mixing = mixing;
        self.hms = mixing.mass_matrix();
        self.invalidate_eigensystem();
    }

    /// Set the neutrino energy [GeV].
    pub fn set_energy(&mut self, energy: f64) {
        if energy == self.energy { return; }
        self.energy = energy;
        self.invalidate_eigensystem();
    }

    /// Switch between neutrinos (`false`) and antineutrinos (`true`).
    pub fn set_is_nubar(&mut self, nubar: bool) {
        if nubar == self.nubar { return; }
        self.nubar = nubar;
        self.invalidate_eigensystem();
    }

    /// Set the current path segment.
    ///
    /// Only a change in density or electron fraction invalidates the
    /// eigensystem; the Hamiltonian does not depend on the length.
    pub fn set_path(&mut self, path: NuPath) {
        let same = path.same_matter(&self.path);
        self.path = path;
        if !same { self.invalidate_eigensystem(); }
    }

    /// Reset to the [standard path][NuPath::std].
    pub fn set_std_path(&mut self) { self.set_path(NuPath::std()); }

    /// Record that the eigensystem has been recomputed for the current
    /// parameters.
    ///
    /// This is for the diagonalizing side of the engine; Hamiltonian builders
    /// never call it.
    pub fn mark_eigensystem_valid(&mut self) { self.got_es = true; }
}

impl PropagationEngine for PmnsEngine {
    fn mass_matrix(&self) -> &nd::Array2<C64> { &self.hms }

    fn path(&self) -> &NuPath { &self.path }

    fn energy(&self) -> f64 { self.energy }

    fn is_nubar(&self) -> bool { self.nubar }

    fn invalidate_eigensystem(&mut self) {
        if self.got_es { debug!("eigensystem invalidated"); }
        self.got_es = false;
    }

    fn eigensystem_valid(&self) -> bool { self.got_es }
}
