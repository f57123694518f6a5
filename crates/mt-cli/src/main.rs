//! Muon trigger efficiency and scale-factor CLI.

mod report;
mod source;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mt_core::Sample;
use mt_engine::{aggregate_sample, compose_scale_factors, summarize_inclusive};
use mt_tables::{periods, triggers, MeasurementConfig};
use source::CountTable;

#[derive(Parser)]
#[command(name = "mt-cli")]
#[command(about = "Muon trigger efficiency and scale-factor aggregation")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate one count table into efficiency and scale-factor maps
    Run {
        /// Input count table (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the report files are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Data-taking year
        #[arg(long)]
        year: u16,

        /// Period name within the year
        #[arg(long)]
        period: String,

        /// Detector region (All, noCrack, Barrel, Endcap)
        #[arg(long, default_value = "All")]
        region: String,

        /// Trigger name; an `_RM` suffix is accepted and stripped for
        /// output naming
        #[arg(long)]
        trigger: String,

        /// Muon quality working point (Medium, Loose, Tight, HighPt)
        #[arg(long, default_value = "Medium")]
        quality: String,

        /// Recommendations version tag used in output file names
        #[arg(long, default_value = "v66.3.0")]
        version: String,

        /// Also derive the data/MC scale-factor maps
        #[arg(long)]
        scale_factors: bool,

        /// Print the inclusive SF table instead of writing the
        /// per-bin efficiency report
        #[arg(long)]
        inclusive: bool,

        /// Override the derived efficiency report path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the trigger menu (and OR combinations) for a year/period
    Triggers {
        /// Data-taking year
        #[arg(long)]
        year: u16,

        /// Period name; needed for years where the menu changed
        /// mid-year (2016)
        #[arg(long)]
        period: Option<String>,
    },

    /// Print the data-taking periods of one year
    Periods {
        /// Data-taking year
        #[arg(long)]
        year: u16,
    },

    /// Print the version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Run {
            input,
            out_dir,
            year,
            period,
            region,
            trigger,
            quality,
            version,
            scale_factors,
            inclusive,
            output,
        } => cmd_run(
            &input,
            &out_dir,
            year,
            &period,
            &region,
            &trigger,
            &quality,
            &version,
            scale_factors,
            inclusive,
            output.as_ref(),
        ),
        Commands::Triggers { year, period } => cmd_triggers(year, period.as_deref()),
        Commands::Periods { year } => cmd_periods(year),
        Commands::Version => {
            println!("mt-cli {}", mt_core::VERSION);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    input: &PathBuf,
    out_dir: &PathBuf,
    year: u16,
    period: &str,
    region: &str,
    trigger: &str,
    quality: &str,
    version: &str,
    scale_factors: bool,
    inclusive: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let config = MeasurementConfig::new(year, period, region, trigger, quality)?;

    tracing::info!(path = %input.display(), "loading count table");
    let table = CountTable::from_path(input)?;

    let data = aggregate_sample(&table, Sample::Data)?;
    let mc = aggregate_sample(&table, Sample::Mc)?;
    std::fs::create_dir_all(out_dir)?;

    if inclusive {
        let summary = summarize_inclusive(&table)?;
        print!("{}", report::render_inclusive(&config, &summary));
    } else {
        let path = match output {
            Some(path) => path.clone(),
            None => out_dir.join(format!(
                "muontrigger_sf_{}_mc{}_{}.json",
                config.year,
                config.mc_campaign(),
                version
            )),
        };
        write_report(&path, report::efficiency_report(&config, version, &data, &mc))?;
    }

    if scale_factors {
        let sf = compose_scale_factors(&data, &mc)?;
        let path = out_dir.join(format!("sf_plots_{}_{}.json", config.year, version));
        write_report(&path, report::scale_factor_report(&config, version, &sf))?;
    }
    Ok(())
}

fn cmd_triggers(year: u16, period: Option<&str>) -> Result<()> {
    let menu = triggers::menu(year, period.unwrap_or(""))?;
    let output_json = serde_json::json!({
        "year": year,
        "period": menu.period,
        "single": menu.single,
        "multi": menu.multi,
        "or_combinations": triggers::or_combinations(menu.single)?,
    });
    println!("{}", serde_json::to_string_pretty(&output_json)?);
    Ok(())
}

fn cmd_periods(year: u16) -> Result<()> {
    if !periods::YEARS.contains(&year) {
        anyhow::bail!("unknown year {year}; expected one of {:?}", periods::YEARS);
    }
    let rows: Vec<serde_json::Value> = periods::periods(year)
        .map(|p| {
            serde_json::json!({
                "period": p.name,
                "first_run": p.first_run,
                "last_run": p.last_run,
            })
        })
        .collect();
    let output_json = serde_json::json!({
        "year": year,
        "mc_campaign": periods::mc_campaign(year)?,
        "periods": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output_json)?);
    Ok(())
}

fn write_report(path: &PathBuf, value: serde_json::Value) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}
