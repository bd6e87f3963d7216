//! End-to-end correction of reflections spread over several experiments.

use nalgebra::Vector3;
use ndarray::{array, Array1, Array2};
use std::sync::Arc;
use xcorr::{
    BatchConfig, BatchExecutor, Beam, CorrectionError, Corrections, CorrectionsMulti, Detector,
    Goniometer, Panel, ReflectionTable,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_panel_detector(mu: f64) -> Detector {
    let upper = Panel::new(
        "upper",
        Vector3::new(-50.0, 50.0, -120.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        mu,
        0.45,
    )
    .unwrap()
    .with_pixel_size(0.1, 0.1)
    .unwrap()
    .with_image_size(1000, 500);
    let lower = Panel::new(
        "lower",
        Vector3::new(-50.0, 0.0, -120.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        mu,
        0.45,
    )
    .unwrap()
    .with_pixel_size(0.1, 0.1)
    .unwrap()
    .with_image_size(1000, 500);
    Detector::new(vec![upper, lower])
}

/// Experiment 0: polarized synchrotron beam about +x.
/// Experiment 1: unpolarized lab source about +y with a thinner-absorbing sensor.
fn make_multi() -> CorrectionsMulti {
    let mut multi = CorrectionsMulti::new();
    multi.append(Corrections::new(
        Arc::new(Beam::along_minus_z(0.9795, 0.999).unwrap()),
        Arc::new(Goniometer::about_x()),
        Arc::new(two_panel_detector(3.96)),
    ));
    multi.append(Corrections::new(
        Arc::new(Beam::along_minus_z(1.5418, 0.5).unwrap()),
        Arc::new(Goniometer::new(Vector3::new(0.0, 1.0, 0.0)).unwrap()),
        Arc::new(two_panel_detector(0.8)),
    ));
    multi
}

#[test]
fn test_routes_each_reflection_to_its_experiment() {
    init_logging();
    let multi = make_multi();
    let ids = [0, 1, 0];
    let s1 = [
        Vector3::new(0.2, 0.3, -0.93),
        Vector3::new(0.25, 0.15, -0.95),
        Vector3::new(-0.1, 0.2, -0.97),
    ];

    let lp = multi.lp_batch(&ids, &s1).unwrap();
    assert_eq!(lp.len(), 3);
    assert_eq!(lp[0], multi.get(0).unwrap().lp(&s1[0]).unwrap());
    assert_eq!(lp[1], multi.get(1).unwrap().lp(&s1[1]).unwrap());
    assert_eq!(lp[2], multi.get(0).unwrap().lp(&s1[2]).unwrap());
    assert_ne!(lp[1], multi.get(0).unwrap().lp(&s1[1]).unwrap());
}

#[test]
fn test_panel_lookup_drives_dqe() {
    let multi = make_multi();
    let detector = multi.get(0).unwrap().detector().clone();
    let s1 = Vector3::new(0.1, -0.2, -0.97);

    let (panel, _) = detector.find_panel(&s1).unwrap();
    assert_eq!(detector.panel(panel).unwrap().name(), "lower");
    let dqe = multi.dqe(0, &s1, panel).unwrap();
    assert!(dqe.is_finite() && dqe > 1.0);
    assert!(multi.dqe(0, &s1, 2).unwrap_err().is_out_of_range());
}

#[test]
fn test_parallel_table_correction_matches_scalar() {
    init_logging();
    let multi = make_multi();
    let n = 2000;
    let s1 = Array2::from_shape_fn((n, 3), |(i, j)| {
        let t = i as f64 / n as f64;
        match j {
            0 => 0.3 * (t * 11.0).cos() + 0.05,
            1 => 0.35 * (t * 7.0).sin() + 0.4 * (i % 2) as f64 - 0.2,
            _ => -1.0,
        }
    });
    let ids = Array1::from_shape_fn(n, |i| (i / 3) % 2);
    let panels = Array1::from_shape_fn(n, |i| if s1[[i, 1]] > 0.0 { 0 } else { 1 });
    let intensity = Array1::from_elem(n, 50.0);
    let variance = Array1::from_elem(n, 50.0);

    let mut table = ReflectionTable::new(
        ids.clone(),
        s1.clone(),
        panels.clone(),
        intensity,
        variance,
    )
    .unwrap();
    let executor = BatchExecutor::new(
        BatchConfig::default()
            .with_worker_count(4)
            .with_min_parallel_len(64),
    )
    .unwrap();

    let columns = table.correct(&executor, &multi).unwrap();

    for i in 0..n {
        let v = Vector3::new(s1[[i, 0]], s1[[i, 1]], s1[[i, 2]]);
        let lp = multi.lp(ids[i], &v).unwrap();
        let dqe = multi.dqe(ids[i], &v, panels[i]).unwrap();
        assert_eq!(columns.lp[i], lp);
        assert_eq!(columns.dqe[i], dqe);
        assert!((table.intensity()[i] - 50.0 * lp * dqe).abs() < 1e-9);
    }
}

#[test]
fn test_batch_reports_every_failure_when_asked() {
    let multi = make_multi();
    let executor = BatchExecutor::new(
        BatchConfig::default()
            .with_worker_count(2)
            .with_min_parallel_len(0)
            .with_report_all_failures(true),
    )
    .unwrap();

    let ids = array![0, 2, 1, 0];
    // Row 3 travels along the detector face.
    let s1 = array![
        [0.2, 0.3, -0.93],
        [0.2, 0.3, -0.93],
        [0.2, 0.3, -0.93],
        [0.0, 1.0, 0.0]
    ];
    let panels = array![0, 0, 0, 0];

    match executor
        .dqe(&multi, ids.view(), s1.view(), panels.view())
        .unwrap_err()
    {
        CorrectionError::Batch {
            index,
            failed,
            source,
        } => {
            assert_eq!(index, 1);
            assert_eq!(failed, vec![1, 3]);
            assert!(source.is_out_of_range());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
