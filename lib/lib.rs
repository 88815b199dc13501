#![allow(non_snake_case)]

//! Effective Hamiltonians for three-flavor neutrino propagation in matter,
//! with optional non-standard interactions (NSI).
//!
//! A [`PropagationEngine`] supplies the vacuum mass-squared matrix, the path
//! through matter, the energy, and the eigensystem cache flag; a
//! [`HamBuild`] implementor turns that state into the Hamiltonian to be
//! diagonalized.
//!
//! ```
//! use nsi_hamiltonian::{ HamBuild, HBuilderNsi, PmnsEngine };
//!
//! let mut builder = HBuilderNsi::new(PmnsEngine::new());
//! builder.set_eps_ee(0.2);
//! builder.set_eps_mutau(0.05, std::f64::consts::FRAC_PI_2);
//! builder.update_ham();
//! let H = builder.hermitian();
//! assert_eq!(H[[2, 1]], H[[1, 2]].conj());
//! ```

pub mod constants;
pub mod flavor;
pub mod nsi;
pub mod engine;
pub mod hamiltonians;
pub mod config;

pub use flavor::{ Flavor, FlavorWarning, NUM_NUS };
pub use nsi::NsiParams;
pub use engine::{ MixingParams, NuPath, PmnsEngine, PropagationEngine };
pub use hamiltonians::{ HamBuild, HBuilderNsi, HBuilderStd };
pub use config::{ ConfigError, ScenarioConfig };
