use crate::analysis::{Calibration, Metrics};

/// Fixed-width console report of one run. Pure function of the metrics
/// record; the footnote flags the PI display scale and the bounded SNR so
/// nobody mistakes them for raw physiology.
pub fn render(metrics: &Metrics, calibration: &Calibration) -> String {
    let mut out = String::new();

    let title = format!(" PPG LAB REPORT | FS = {:.2} Hz ", metrics.fs_hz);
    out.push_str(&format!("{:=^60}\n", title));
    out.push_str(&row("Metric", "Value".to_string(), "Unit"));
    out.push_str(&format!("{}\n", "-".repeat(60)));

    out.push_str(&row("Heart Rate (HR)", format!("{:.1}", metrics.hr_bpm), "BPM"));
    out.push_str(&row("SpO2 (Calibrated)", format!("{:.1}", metrics.spo2_pct), "%"));
    out.push_str(&row("Perfusion Index (PI)*", format!("{:.3}", metrics.pi_pct), "%"));
    out.push_str(&row("Signal Quality (SNR)", format!("{:.2}", metrics.snr_db), "dB"));
    out.push_str(&row("IR DC Level", format!("{:.0}", metrics.ir_dc), "ADC"));
    out.push_str(&row("Headroom", format!("{:.1}", metrics.headroom_pct), "%"));
    out.push_str(&row("Avg Sensor Temp", format!("{:.1}", metrics.avg_temp_c), "°C"));
    out.push_str(&row("Avg Power", format!("{:.2}", metrics.avg_power_mw), "mW"));

    out.push_str(&format!("{}\n", "=".repeat(60)));
    out.push_str(&format!(
        "(*) PI scaled x{:.0}. SNR bounded. Valid Temp avg only.\n",
        calibration.pi_display_scale
    ));
    out
}

fn row(name: &str, value: String, unit: &str) -> String {
    format!("{:<30} | {:<10} | {}\n", name, value, unit)
}
