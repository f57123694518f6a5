use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const VARIATIONS: [&str; 12] = [
    "nominal",
    "isoTight",
    "isoTightTrackOnly",
    "mll",
    "dphill",
    "ptup",
    "ptdw",
    "noIP",
    "mupos",
    "muneg",
    "nvtx_up",
    "nvtx_dw",
];

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mt-cli"))
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("mt_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

/// A 2x2-cell table (1 regular bin + overflow per axis) with uniform
/// counts per sample. `skip` drops one (sample, variation) entry.
fn count_table(
    data: (f64, f64),
    mc: (f64, f64),
    skip: Option<(&str, &str)>,
) -> serde_json::Value {
    let mut samples = serde_json::Map::new();
    for (sample, (matched, probes)) in [("data", data), ("mc", mc)] {
        let mut variations = serde_json::Map::new();
        for name in VARIATIONS {
            if skip == Some((sample, name)) {
                continue;
            }
            variations.insert(
                name.to_string(),
                serde_json::json!({
                    "matched": [[matched, matched], [matched, matched]],
                    "probes": [[probes, probes], [probes, probes]],
                }),
            );
        }
        samples.insert(sample.to_string(), serde_json::Value::Object(variations));
    }
    serde_json::json!({ "x_bins": 1, "y_bins": 1, "samples": samples })
}

fn write_fixture(name: &str, table: &serde_json::Value) -> PathBuf {
    let path = tmp_path(name);
    std::fs::write(&path, serde_json::to_string(table).unwrap()).unwrap();
    path
}

#[test]
fn version_smoke() {
    let out = run(&["version"]);
    assert!(out.status.success(), "version should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("mt-cli "), "unexpected stdout: {}", stdout);
}

#[test]
fn run_writes_the_efficiency_report() {
    let input = write_fixture("eff.json", &count_table((50.0, 100.0), (40.0, 100.0), None));
    let out_dir = tmp_path("eff_out");

    let out = run(&[
        "run",
        "--input",
        input.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
        "--year",
        "2018",
        "--period",
        "B",
        "--trigger",
        "HLT_mu26_ivarmedium",
    ]);
    assert!(
        out.status.success(),
        "run should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let report_path = out_dir.join("muontrigger_sf_2018_mc16e_v66.3.0.json");
    let text = std::fs::read_to_string(&report_path)
        .unwrap_or_else(|e| panic!("missing report {}: {}", report_path.display(), e));
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["year"], 2018);
    assert_eq!(v["mc_campaign"], "16e");
    assert_eq!(v["trigger"], "HLT_mu26_ivarmedium");
    assert_eq!(v["eff_etaphi_fine_all_data_nominal"][0][0], 0.5);
    assert_eq!(v["eff_etaphi_fine_all_mc_nominal"][0][0], 0.4);
    // Overflow slice participates.
    assert_eq!(v["eff_etaphi_fine_all_data_nominal"][1][1], 0.5);
}

#[test]
fn scale_factors_flag_adds_the_sf_report() {
    let input = write_fixture("sf.json", &count_table((50.0, 100.0), (40.0, 100.0), None));
    let out_dir = tmp_path("sf_out");

    let out = run(&[
        "run",
        "--input",
        input.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
        "--year",
        "2018",
        "--period",
        "B",
        "--trigger",
        "HLT_mu26_ivarmedium",
        "--scale-factors",
    ]);
    assert!(
        out.status.success(),
        "run should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let text = std::fs::read_to_string(out_dir.join("sf_plots_2018_v66.3.0.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    let sf = v["sf_all_nominal"][0][0].as_f64().unwrap();
    assert!((sf - 1.25).abs() < 1e-9, "sf = {sf}");
    // The efficiency report is still written.
    assert!(out_dir.join("muontrigger_sf_2018_mc16e_v66.3.0.json").exists());
}

#[test]
fn inclusive_prints_the_table_and_suppresses_the_efficiency_report() {
    let input = write_fixture("incl.json", &count_table((50.0, 100.0), (40.0, 100.0), None));
    let out_dir = tmp_path("incl_out");

    let out = run(&[
        "run",
        "--input",
        input.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
        "--year",
        "2018",
        "--period",
        "B",
        "--trigger",
        "HLT_mu26_ivarmedium",
        "--inclusive",
    ]);
    assert!(
        out.status.success(),
        "run should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Systematic"), "unexpected stdout: {}", stdout);
    assert!(stdout.contains("1.250000"), "unexpected stdout: {}", stdout);
    assert!(stdout.contains("Total"), "unexpected stdout: {}", stdout);
    assert!(!out_dir.join("muontrigger_sf_2018_mc16e_v66.3.0.json").exists());
}

#[test]
fn missing_variation_aborts_the_run() {
    let table = count_table((50.0, 100.0), (40.0, 100.0), Some(("mc", "nvtx_dw")));
    let input = write_fixture("missing.json", &table);
    let out_dir = tmp_path("missing_out");

    let out = run(&[
        "run",
        "--input",
        input.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
        "--year",
        "2018",
        "--period",
        "B",
        "--trigger",
        "HLT_mu26_ivarmedium",
    ]);
    assert!(!out.status.success(), "run should fail on a missing variation");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("nvtx_dw"), "unexpected stderr: {}", stderr);
    assert!(stderr.contains("mc"), "unexpected stderr: {}", stderr);
}

#[test]
fn invalid_configuration_is_rejected_before_counting() {
    let input = write_fixture("cfg.json", &count_table((50.0, 100.0), (40.0, 100.0), None));

    for args in [
        ["--year", "2019", "--period", "B", "--trigger", "HLT_mu26_ivarmedium"],
        ["--year", "2018", "--period", "Z", "--trigger", "HLT_mu26_ivarmedium"],
        ["--year", "2018", "--period", "B", "--trigger", "HLT_mu14"],
    ] {
        let input_str = input.to_string_lossy();
        let mut full = vec!["run", "--input", input_str.as_ref()];
        full.extend_from_slice(&args);
        let out = run(&full);
        assert!(!out.status.success(), "should reject {:?}", args);
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("invalid configuration"), "unexpected stderr: {}", stderr);
    }
}

#[test]
fn triggers_lists_the_menu_with_or_combinations() {
    let out = run(&["triggers", "--year", "2018"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let singles: Vec<&str> =
        v["single"].as_array().unwrap().iter().map(|s| s.as_str().unwrap()).collect();
    assert!(singles.contains(&"HLT_mu26_ivarmedium"));
    let ors: Vec<&str> =
        v["or_combinations"].as_array().unwrap().iter().map(|s| s.as_str().unwrap()).collect();
    assert!(ors.contains(&"HLT_mu26_ivarmedium_OR_HLT_mu50"));

    // 2016 needs a period.
    let out = run(&["triggers", "--year", "2016"]);
    assert!(!out.status.success());
    let out = run(&["triggers", "--year", "2016", "--period", "A"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["period"], "A");
}

#[test]
fn periods_lists_run_ranges() {
    let out = run(&["periods", "--year", "2018"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["mc_campaign"], "16e");
    let first = &v["periods"][0];
    assert_eq!(first["period"], "B");
    assert_eq!(first["first_run"], 348885);

    let out = run(&["periods", "--year", "2019"]);
    assert!(!out.status.success());
}
