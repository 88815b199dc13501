//! Unit conversions and physical constants entering the matter Hamiltonian.

// GeV to eV
pub const GEV_TO_EV: f64 = 1.0e9;

// mol / GeV^2 / cm^3 to eV; N_A * (hbar c)^3 expressed so that a density in
// g/cm^3 times an electron fraction gives an electron density in GeV^3
pub const K2: f64 = 4.62711492217e-09;

// Fermi constant G_F / (hbar c)^3 [GeV^-2]
pub const GF: f64 = 1.1663787e-05;

/// Matter potential per unit of electron density, `√2 G_F` in the units
/// above [eV / (g/cm^3)].
///
/// Multiply by `density * zoa` to get the charged-current potential in eV
/// (≈ 7.63e-14 eV per g/cm^3 of electrons).
pub const SQRT2_GF_K2: f64 = K2 * std::f64::consts::SQRT_2 * GF;

/// Return twice the neutrino energy `energy` [GeV] in eV, the divisor turning
/// a mass-squared matrix in eV^2 into a vacuum Hamiltonian in eV.
pub fn two_e_ev(energy: f64) -> f64 { 2.0 * GEV_TO_EV * energy }

/// Return the charged-current matter potential [eV] for a medium of density
/// `density` [g/cm^3] and electron fraction `zoa`.
pub fn matter_potential(density: f64, zoa: f64) -> f64 {
    SQRT2_GF_K2 * (density * zoa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn potential_per_density_matches_reference() {
        // V_CC = 7.63e-14 eV * Y_e * rho[g/cm^3]
        let v = matter_potential(1.0, 1.0);
        assert!((v - 7.63e-14).abs() / 7.63e-14 < 1e-3, "V = {}", v);
    }

    #[test]
    fn crust_potential() {
        let v = matter_potential(2.6, 0.5);
        assert!((v - SQRT2_GF_K2 * 1.3).abs() < 1e-28);
        assert_eq!(two_e_ev(1.0), 2.0e9);
    }
}
