//! End-to-end sessions: load, smooth, measure, assemble.
//!
//! Covers the documented scenarios and the sum/range properties of the
//! local and global measures in both modes.

use approx::assert_relative_eq;
use ndarray::{array, Array2};
use segreg_algorithms::segregation::{labels_for, MeasureKind, Scope, Session};
use segreg_algorithms::spatial::{KernelKind, LocalityParams};
use segreg_core::{Error, GroupCounts};

fn three_unit_session() -> Session {
    Session::load_attributes(
        vec!["0".into(), "1".into(), "2".into()],
        vec![(0.0, 0.0), (1.0, 0.0), (10.0, 0.0)],
        array![[10.0, 0.0], [0.0, 10.0], [5.0, 5.0]],
    )
    .unwrap()
}

/// A 6×6 grid of units with a west/east gradient between three groups.
fn grid_session() -> Session {
    let mut ids = Vec::new();
    let mut coords = Vec::new();
    let mut counts = Vec::new();
    for row in 0..6 {
        for col in 0..6 {
            ids.push(format!("{row}-{col}"));
            coords.push((col as f64 * 100.0, row as f64 * 100.0));
            counts.push(5.0 + 20.0 * col as f64);
            counts.push(105.0 - 20.0 * col as f64);
            counts.push(((row * 7 + col * 3) % 5) as f64);
        }
    }
    let population = Array2::from_shape_vec((36, 3), counts).unwrap();
    Session::load_attributes(ids, coords, population).unwrap()
}

fn sessions_in_both_modes() -> Vec<Session> {
    let mut out = vec![grid_session(), three_unit_session()];
    for kernel in KernelKind::ALL {
        let mut s = grid_session();
        s.estimate_locality(150.0, kernel).unwrap();
        out.push(s);
    }
    out
}

#[test]
fn moving_window_scenario() {
    let mut s = three_unit_session();
    s.estimate_locality(2.0, KernelKind::MovingWindow).unwrap();
    let locality = s.locality().unwrap();
    assert_eq!(locality.unit(0).to_vec(), vec![5.0, 5.0]);
    assert_eq!(locality.unit(1).to_vec(), vec![5.0, 5.0]);
    // isolated unit keeps its own counts
    assert_eq!(locality.unit(2).to_vec(), vec![5.0, 5.0]);
}

#[test]
fn locality_is_idempotent() {
    for kernel in KernelKind::ALL {
        let mut s = grid_session();
        s.estimate_locality(250.0, kernel).unwrap();
        let first = s.locality().unwrap().clone();
        s.estimate_locality(250.0, kernel).unwrap();
        assert_eq!(&first, s.locality().unwrap());
    }
}

#[test]
fn dissimilarity_local_sums_to_global() {
    for mut s in sessions_in_both_modes() {
        let local = s.compute_measure(MeasureKind::Dissimilarity, Scope::Local);
        let global = s.compute_measure(MeasureKind::Dissimilarity, Scope::Global);
        let sum: f64 = local.as_local_vector().unwrap().iter().sum();
        assert_eq!(sum, global.as_scalar().unwrap());
    }
}

#[test]
fn exposure_local_sums_to_global() {
    for mut s in sessions_in_both_modes() {
        let m = s.layer().n_groups();
        let local = s.compute_measure(MeasureKind::Exposure, Scope::Local);
        let global = s.compute_measure(MeasureKind::Exposure, Scope::Global);
        let local = local.as_local_matrix().unwrap();
        let global = global.as_global_matrix().unwrap();
        for g in 0..m {
            for h in 0..m {
                let sum = local
                    .column(g * m + h)
                    .iter()
                    .fold(0.0, |acc, &v| acc + v);
                assert_eq!(sum, global[(g, h)], "pair ({g}, {h})");
            }
        }
    }
}

#[test]
fn dissimilarity_and_isolation_in_unit_interval() {
    for mut s in sessions_in_both_modes() {
        if !s.is_spatial() {
            let d = s
                .compute_measure(MeasureKind::Dissimilarity, Scope::Global)
                .as_scalar()
                .unwrap();
            assert!((0.0..=1.0 + 1e-12).contains(&d), "D = {d}");
        }

        let exposure = s.compute_measure(MeasureKind::Exposure, Scope::Global);
        let exposure = exposure.as_global_matrix().unwrap();
        for g in 0..exposure.nrows() {
            let iso = exposure[(g, g)];
            assert!((0.0..=1.0 + 1e-12).contains(&iso), "isolation[{g}] = {iso}");
        }
    }
}

#[test]
fn smoothing_lowers_dissimilarity() {
    let mut raw = grid_session();
    let d_raw = raw
        .compute_measure(MeasureKind::Dissimilarity, Scope::Global)
        .as_scalar()
        .unwrap();

    let mut smoothed = grid_session();
    smoothed
        .estimate_locality_with(LocalityParams {
            bandwidth: 1000.0,
            kernel: KernelKind::Gaussian,
            pruning: false,
        })
        .unwrap();
    let d_smoothed = smoothed
        .compute_measure(MeasureKind::Dissimilarity, Scope::Global)
        .as_scalar()
        .unwrap();

    assert!(d_smoothed < d_raw, "{d_smoothed} !< {d_raw}");
}

#[test]
fn single_group_dissimilarity_is_zero() {
    let mut s = Session::load_attributes(
        vec!["a".into(), "b".into()],
        vec![(0.0, 0.0), (5.0, 5.0)],
        array![[12.0], [3.0]],
    )
    .unwrap();
    let local = s.compute_measure(MeasureKind::Dissimilarity, Scope::Local);
    assert_eq!(local.as_local_vector().unwrap().to_vec(), vec![0.0, 0.0]);
    let global = s.compute_measure(MeasureKind::Dissimilarity, Scope::Global);
    assert_eq!(global.as_scalar(), Some(0.0));
}

#[test]
fn homogeneous_region_has_zero_entropy_and_index_h() {
    let mut s = Session::load_attributes(
        vec!["a".into(), "b".into(), "c".into()],
        vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
        array![[10.0, 0.0], [4.0, 0.0], [0.0, 0.0]],
    )
    .unwrap();

    let entropy = s.compute_measure(MeasureKind::Entropy, Scope::Global);
    assert_eq!(entropy.as_scalar(), Some(0.0));

    let h = s.compute_measure(MeasureKind::IndexH, Scope::Global).as_scalar().unwrap();
    assert_eq!(h, 0.0);
    let local = s.compute_measure(MeasureKind::IndexH, Scope::Local);
    assert!(local.as_local_vector().unwrap().iter().all(|&v| v == 0.0));
}

#[test]
fn index_h_in_unit_interval() {
    for mut s in [grid_session(), three_unit_session()] {
        let h = s.compute_measure(MeasureKind::IndexH, Scope::Global).as_scalar().unwrap();
        assert!((-1e-12..=1.0 + 1e-12).contains(&h), "H = {h}");
    }
}

#[test]
fn assembled_column_count_matches_labels() {
    let combos: Vec<Vec<MeasureKind>> = (0u8..16)
        .map(|mask| {
            MeasureKind::ALL
                .into_iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, kind)| kind)
                .collect()
        })
        .collect();

    for spatial in [false, true] {
        for combo in &combos {
            let mut s = grid_session();
            if spatial {
                s.estimate_locality(200.0, KernelKind::BiSquare).unwrap();
            }
            for &kind in combo {
                s.compute_measure(kind, Scope::Local);
            }
            let table = s.assemble_results().unwrap();

            let m = s.layer().n_groups();
            let contributed: usize = s
                .computed_measures()
                .iter()
                .map(|kind| match kind {
                    MeasureKind::Exposure => m * m,
                    _ => 1,
                })
                .sum();
            let intens = if spatial { m } else { 0 };
            assert_eq!(table.n_columns(), 3 + m + intens + contributed);
            assert_eq!(
                table.labels(),
                labels_for(&s.computed_measures(), m, spatial).as_slice()
            );
            assert_eq!(table.n_rows(), 36);
        }
    }
}

#[test]
fn assembled_rows_align_with_input() {
    let mut s = three_unit_session();
    s.compute_measure(MeasureKind::Entropy, Scope::Local);
    s.compute_measure(MeasureKind::Dissimilarity, Scope::Local);
    let table = s.assemble_results().unwrap();

    assert_eq!(
        table.labels(),
        ["id", "x", "y", "group_0", "group_1", "dissimil", "entropy"].map(String::from)
    );
    assert_eq!(table.ids(), ["0", "1", "2"].map(String::from));
    let row2 = table.values().row(2);
    assert_eq!(row2[0], 10.0);
    assert_eq!(row2[2], 5.0);
    assert_relative_eq!(row2[5], 2.0_f64.ln(), epsilon = 1e-15);
}

#[test]
fn clearing_after_persist_drops_columns() {
    let mut s = three_unit_session();
    s.compute_measure(MeasureKind::Exposure, Scope::Global);
    s.clear_measures();
    let table = s.assemble_results().unwrap();
    assert_eq!(table.n_columns(), 5);
}

#[test]
fn boundary_validation_errors() {
    assert!(matches!(
        Session::load_attributes(vec![], vec![], Array2::zeros((0, 2))),
        Err(Error::EmptyInput)
    ));
    assert!(matches!(
        Session::load_attributes(vec!["a".into()], vec![], Array2::zeros((1, 2))),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(matches!(
        Session::load_attributes(vec!["a".into()], vec![(0.0, 0.0)], Array2::zeros((1, 0))),
        Err(Error::NoGroupsSelected)
    ));

    assert!(matches!(
        Session::load_attributes(
            vec!["a".into(), "b".into()],
            vec![(f64::NAN, 0.0), (1.0, 0.0)],
            Array2::ones((2, 2)),
        ),
        Err(Error::NonFiniteValue { unit: 0, .. })
    ));
    assert!(matches!(
        Session::load_attributes(
            vec!["a".into(), "b".into()],
            vec![(0.0, 0.0), (1.0, 0.0)],
            array![[f64::INFINITY, 0.0], [0.0, 10.0]],
        ),
        Err(Error::NonFiniteValue { what: "group count", .. })
    ));

    let mut s = three_unit_session();
    assert!(matches!(
        s.estimate_locality(0.0, KernelKind::Gaussian),
        Err(Error::InvalidBandwidth(_))
    ));
    assert!(matches!(
        "epanechnikov".parse::<KernelKind>(),
        Err(Error::InvalidKernel(_))
    ));
}

#[test]
fn negative_counts_are_clamped_before_use() {
    let mut clamped = Session::load_attributes(
        vec!["a".into(), "b".into()],
        vec![(0.0, 0.0), (1.0, 0.0)],
        array![[10.0, -5.0], [-1.0, 10.0]],
    )
    .unwrap();
    let mut clean = Session::load_attributes(
        vec!["a".into(), "b".into()],
        vec![(0.0, 0.0), (1.0, 0.0)],
        array![[10.0, 0.0], [0.0, 10.0]],
    )
    .unwrap();
    assert_eq!(
        clamped.compute_measure(MeasureKind::Dissimilarity, Scope::Global),
        clean.compute_measure(MeasureKind::Dissimilarity, Scope::Global)
    );
}
