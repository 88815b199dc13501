use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use nsi_hamiltonian::{
    constants::{ matter_potential, GF, K2 },
    flavor::upper_pairs,
    HamBuild,
    HBuilderNsi,
    HBuilderStd,
    MixingParams,
    NsiParams,
    NuPath,
    PmnsEngine,
    PropagationEngine,
    ScenarioConfig,
};

fn assert_close(a: C64, b: C64, what: &str) {
    let scale = a.norm().max(b.norm());
    assert!(
        (a - b).norm() <= 1e-12 * scale,
        "{}: {} != {}", what, a, b,
    );
}

#[test]
fn zero_nsi_in_crust_is_vacuum_plus_ee_potential() {
    let mut builder = HBuilderNsi::new(PmnsEngine::new());
    builder.set_nsi(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(*builder.engine().path(), NuPath::new(1000.0, 2.6, 0.5));
    assert_eq!(builder.engine().energy(), 1.0);
    assert!(!builder.engine().is_nubar());
    builder.update_ham();

    let hms = MixingParams::nufit52_no().mass_matrix();
    assert!(hms.iter().any(|h| h.norm() > 0.0));
    let v = std::f64::consts::SQRT_2 * GF * K2 * 2.6 * 0.5;
    for (i, j) in upper_pairs() {
        let mut expected = hms[[i, j]] / 2.0e9;
        if (i, j) == (0, 0) { expected += v; }
        assert_close(builder.ham()[[i, j]], expected, &format!("H[{i}][{j}]"));
    }
    // ≈ 9.92e-14 eV for 2.6 g/cm^3 and Z/A = 0.5
    assert!((v - 9.922e-14).abs() < 1e-16);
}

#[test]
fn nsi_and_standard_builders_agree_along_a_path() {
    let mut engine = PmnsEngine::with_mixing(MixingParams::nufit52_io());
    engine.set_energy(2.5);
    let mut std_builder = HBuilderStd::new(engine.clone());
    let mut nsi_builder = HBuilderNsi::new(engine);

    let layers = [
        NuPath::new(300.0, 2.6, 0.5),
        NuPath::new(600.0, 3.3, 0.495),
        NuPath::new(400.0, 0.0, 0.5),
    ];
    for nubar in [false, true] {
        std_builder.engine_mut().set_is_nubar(nubar);
        nsi_builder.engine_mut().set_is_nubar(nubar);
        for layer in layers {
            std_builder.engine_mut().set_path(layer);
            nsi_builder.engine_mut().set_path(layer);
            std_builder.update_ham();
            nsi_builder.update_ham();
            assert_eq!(std_builder.ham(), nsi_builder.ham());
        }
    }
}

#[test]
fn antineutrino_relation_with_nsi() {
    let params = NsiParams::new(-0.1, 0.05, 0.2, 0.3, 0.15, -0.05, 0.3 * PI, PI, -0.5);
    let mut builder = HBuilderNsi::with_params(PmnsEngine::new(), &params);
    builder.engine_mut().set_energy(4.0);
    builder.update_ham();
    let nu = builder.ham().clone();
    builder.engine_mut().set_is_nubar(true);
    builder.update_ham();
    let nubar = builder.ham().clone();

    let hms = builder.engine().mass_matrix().clone();
    let lv = 2.0 * 1.0e9 * 4.0;
    let v = matter_potential(2.6, 0.5);
    for (i, j) in upper_pairs() {
        let eps = builder.get_eps(i, j);
        assert_close(nu[[i, j]], hms[[i, j]] / lv + v * eps, "nu");
        assert_close(nubar[[i, j]], (hms[[i, j]] / lv - v * eps).conj(), "nubar");
    }
    // vacuum part is conjugated, matter part is negated and conjugated
    let vac_nu = &nu - &nubar.mapv(|h| h.conj());
    for (i, j) in upper_pairs() {
        assert_close(vac_nu[[i, j]], 2.0 * v * builder.get_eps(i, j), "2V eps");
    }
}

#[test]
fn config_to_hamiltonian() {
    let config = ScenarioConfig::from_toml_str(
        r#"
        energy = 3.0

        [mixing]
        theta12 = 0.0
        theta13 = 0.0
        theta23 = 0.0
        delta_cp = 0.0
        dm21 = 0.0
        dm31 = 0.0

        [path]
        length = 1300.0
        density = 2.848
        zoa = 0.5

        [nsi]
        eps_etau = 0.2
        delta_etau = 0.7
        "#
    ).unwrap();
    let mut builder = config.build().unwrap();
    builder.update_ham();
    let ham: &nd::Array2<C64> = builder.ham();
    let v = matter_potential(2.848, 0.5);
    assert_close(ham[[0, 0]], C64::from(v), "ee");
    assert_close(ham[[0, 2]], v * C64::from_polar(0.2, 0.7), "etau");
    assert_eq!(ham[[1, 1]], C64::from(0.0));
    assert_eq!(ham[[1, 2]], C64::from(0.0));
}

#[test]
fn eigensystem_flag_through_engine_and_nsi() {
    let mut builder = HBuilderNsi::new(PmnsEngine::new());
    builder.engine_mut().mark_eigensystem_valid();
    builder.set_nsi_params(&NsiParams::default());
    builder.update_ham();
    assert!(builder.engine().eigensystem_valid());

    builder.set_eps_etau(0.1, 0.0);
    assert!(!builder.engine().eigensystem_valid());

    builder.engine_mut().mark_eigensystem_valid();
    builder.engine_mut().set_energy(1.0);
    builder.set_eps(2, 0, 0.1, 0.0);
    assert!(builder.engine().eigensystem_valid());
}
