use std::io::Write;

use oxilab::analysis::{Analysis, Parameters};
use oxilab::record::loader;
use oxilab::report;

#[test]
fn full_run_over_a_capture_file() {
    let path = std::env::temp_dir().join(format!("oxilab_capture_{}.csv", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Time(ms), Red, IR, Temp, Bus_V, Current_mA").unwrap();

    let fs = 100.0;
    for i in 0..3000 {
        let t = i as f64 / fs;
        let pulse = (2.0 * std::f64::consts::PI * 1.25 * t).sin();
        writeln!(
            file,
            "{:.1}, {:.1}, {:.1}, 33.5, 3.30, 20.00",
            t * 1000.0,
            100_000.0 * (1.0 + 0.12 * pulse),
            120_000.0 * (1.0 + 0.2 * pulse)
        )
        .unwrap();
    }
    // A garbled serial line and a header echo, both dropped by the loader
    writeln!(file, "30000.0, nan, --, 33.5, 3.30").unwrap();
    writeln!(file, "Time(ms), Red, IR, Temp, Bus_V, Current_mA").unwrap();
    drop(file);

    let series = loader::load_series(&path).unwrap();
    // 3000 usable rows, 5% trimmed from each end
    assert_eq!(series.len(), 2700);

    let analysis = Analysis::new(Parameters::default());
    let (metrics, artifacts) = analysis.analyze(&series).unwrap();

    assert!(
        (metrics.hr_bpm - 75.0).abs() <= 2.0,
        "hr = {}",
        metrics.hr_bpm
    );
    assert_eq!(metrics.spo2_pct, 99.0);
    assert!(metrics.snr_db > 10.0, "snr = {}", metrics.snr_db);
    assert!((metrics.avg_power_mw - 66.0).abs() < 1e-6);
    assert!((metrics.avg_temp_c - 33.5).abs() < 1e-9);
    assert_eq!(artifacts.ir_ac.len(), series.len());
    assert_eq!(artifacts.power_trend.len(), series.len());

    let text = report::render(&metrics, &analysis.params.calibration);
    assert!(text.contains("Heart Rate (HR)"));
    assert!(text.contains("PI scaled x10"));

    std::fs::remove_file(&path).ok();
}
