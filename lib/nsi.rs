//! The physical parameterization of non-standard interactions in matter.

use serde::{ Deserialize, Serialize };
use crate::flavor::Flavor;

/// The nine independent NSI degrees of freedom.
///
/// Diagonal couplings are real; off-diagonal couplings are complex and given
/// as a magnitude together with a phase in radians. All fields default to
/// zero, i.e. standard matter effects only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NsiParams {
    pub eps_ee: f64,
    pub eps_emu: f64,
    pub eps_etau: f64,
    pub eps_mumu: f64,
    pub eps_mutau: f64,
    pub eps_tautau: f64,
    pub delta_emu: f64,
    pub delta_etau: f64,
    pub delta_mutau: f64,
}

impl NsiParams {
    /// Create a new set of parameters, in the same argument order as
    /// [`HBuilderNsi::set_nsi`][crate::hamiltonians::HBuilderNsi::set_nsi].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eps_ee: f64,
        eps_emu: f64,
        eps_etau: f64,
        eps_mumu: f64,
        eps_mutau: f64,
        eps_tautau: f64,
        delta_emu: f64,
        delta_etau: f64,
        delta_mutau: f64,
    ) -> Self
    {
        Self {
            eps_ee, eps_emu, eps_etau,
            eps_mumu, eps_mutau, eps_tautau,
            delta_emu, delta_etau, delta_mutau,
        }
    }

    /// Return `true` if every coupling is zero, regardless of phases.
    pub fn is_standard(&self) -> bool {
        self.entries().iter().all(|(_, _, mag, _)| *mag == 0.0)
    }

    /// Return `(flavor, flavor, magnitude, phase)` for each of the six
    /// upper-triangular flavor pairs: diagonal pairs first (with zero phase),
    /// then `emu`, `etau`, `mutau`.
    pub fn entries(&self) -> [(Flavor, Flavor, f64, f64); 6] {
        use Flavor::*;
        [
            (E, E, self.eps_ee, 0.0),
            (Mu, Mu, self.eps_mumu, 0.0),
            (Tau, Tau, self.eps_tautau, 0.0),
            (E, Mu, self.eps_emu, self.delta_emu),
            (E, Tau, self.eps_etau, self.delta_etau),
            (Mu, Tau, self.eps_mutau, self.delta_mutau),
        ]
    }
}
