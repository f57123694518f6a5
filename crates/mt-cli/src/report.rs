//! JSON report assembly and inclusive table formatting.
//!
//! Map keys follow the historical naming:
//! `eff_etaphi_fine_<region>_<sample>_<name>` for efficiency maps,
//! `sf_<region>_<name>` for scale-factor maps. Map values are the
//! row layout of [`Map2D::to_rows`], overflow slices included.

use std::fmt::Write;

use serde_json::{json, Map, Value};

use mt_core::Map2D;
use mt_engine::{InclusiveSummary, SampleMaps, ScaleFactorMaps};
use mt_tables::MeasurementConfig;

fn rows(map: &Map2D) -> Value {
    json!(map.to_rows())
}

fn request_header(out: &mut Map<String, Value>, config: &MeasurementConfig, version: &str) {
    out.insert("year".to_string(), json!(config.year));
    out.insert("period".to_string(), json!(config.period));
    out.insert("region".to_string(), json!(config.region.name()));
    out.insert("trigger".to_string(), json!(config.trigger_stem()));
    out.insert("quality".to_string(), json!(config.quality.name()));
    out.insert("mc_campaign".to_string(), json!(config.mc_campaign()));
    out.insert("version".to_string(), json!(version));
}

fn insert_sample_maps(out: &mut Map<String, Value>, region: &str, maps: &SampleMaps) {
    let sample = maps.sample.name();
    let mut put = |name: &str, map: &Map2D| {
        out.insert(format!("eff_etaphi_fine_{region}_{sample}_{name}"), rows(map));
    };
    put("nominal", &maps.nominal);
    put("statUp", &maps.stat_up);
    put("statDw", &maps.stat_down);
    put("systUp", &maps.syst_up);
    put("systDw", &maps.syst_down);
    put("isoEnv", &maps.iso_env);
    for (variation, map) in &maps.variations {
        put(variation.name(), map);
    }
}

/// Per-bin efficiency report for both samples.
pub fn efficiency_report(
    config: &MeasurementConfig,
    version: &str,
    data: &SampleMaps,
    mc: &SampleMaps,
) -> Value {
    let mut out = Map::new();
    request_header(&mut out, config, version);
    let region = config.region.lower();
    insert_sample_maps(&mut out, region, data);
    insert_sample_maps(&mut out, region, mc);
    Value::Object(out)
}

/// Per-bin scale-factor report.
pub fn scale_factor_report(
    config: &MeasurementConfig,
    version: &str,
    sf: &ScaleFactorMaps,
) -> Value {
    let mut out = Map::new();
    request_header(&mut out, config, version);
    let region = config.region.lower();
    let mut put = |name: &str, map: &Map2D| {
        out.insert(format!("sf_{region}_{name}"), rows(map));
    };
    put("nominal", &sf.nominal);
    put("statUp", &sf.stat_up);
    put("statDw", &sf.stat_down);
    put("systUp", &sf.syst_up);
    put("systDw", &sf.syst_down);
    put("isoEnv", &sf.iso_env);
    for (variation, map) in &sf.variations {
        put(variation.name(), map);
    }
    Value::Object(out)
}

fn fmt_percent(p: Option<f64>) -> String {
    match p {
        Some(v) => format!("{v:+.3}"),
        None => "N/A".to_string(),
    }
}

/// Plain-text inclusive SF table.
pub fn render_inclusive(config: &MeasurementConfig, summary: &InclusiveSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "inclusive scale factors: {} {} period {} ({}, {})",
        config.trigger_stem(),
        config.year,
        config.period,
        config.quality,
        config.region
    );
    let _ = writeln!(
        out,
        "data eff = {:.6} +- {:.6}",
        summary.data_efficiency, summary.data_stat_error
    );
    let _ =
        writeln!(out, "mc   eff = {:.6} +- {:.6}", summary.mc_efficiency, summary.mc_stat_error);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<22} {:<12} {}", "Systematic", "SF", "Diff(%)");
    let _ = writeln!(
        out,
        "{:<22} {:<12.6} +- {:.6} (stat)",
        "nominal", summary.nominal_sf, summary.nominal_stat_error
    );
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{:<22} {:<12.6} {}",
            line.name,
            line.scale_factor,
            fmt_percent(line.percent_deviation)
        );
    }
    let _ = writeln!(
        out,
        "{:<22} {:<12.6} {}",
        "Total",
        summary.total_syst,
        fmt_percent(summary.total_percent)
    );
    out
}
