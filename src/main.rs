//! cutlist - CLI tool to optimize cut lists for panel stock.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cutlist_core::validation::validate_catalog;
use cutlist_core::{
    load_project, validate_layout, CuttingList, Heuristic, Optimizer, SortingMethod, Statistics,
    ValidationResult,
};

/// Optimize a cut-list project: place parts on stock sheets and report the result.
#[derive(Parser, Debug)]
#[command(name = "cutlist")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input project file (JSON snapshot)
    #[arg(short, long)]
    input: PathBuf,

    /// Write the optimized project to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Include the full cutting list in the report
    #[arg(long)]
    list: bool,

    /// Fail when the layout has validation errors
    #[arg(long)]
    validate: bool,

    /// Override the part sorting method (area, maxside, width, height, grain, priority)
    #[arg(long)]
    sorting: Option<SortingMethod>,

    /// Override the placement heuristic (BAF, BSSF, BLSF, guillotine)
    #[arg(long)]
    heuristic: Option<Heuristic>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON report printed with `--format json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    statistics: Statistics,
    unplaced: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cutting_list: Option<CuttingList>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Processing: {}", args.input.display());

    let mut optimizer = load_project(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if let Some(sorting) = args.sorting {
        optimizer.settings_mut().sorting_method = sorting;
    }
    if let Some(heuristic) = args.heuristic {
        optimizer.settings_mut().heuristic = heuristic;
    }

    info!(
        "Loaded {} part(s) and {} sheet(s)",
        optimizer.parts().len(),
        optimizer.sheets().len()
    );

    let catalog = validate_catalog(optimizer.parts(), optimizer.sheets(), optimizer.settings());
    for warning in &catalog.warnings {
        warn!("{}", warning);
    }

    // Optimize
    optimizer.calculate_optimization();
    let validation = validate_layout(optimizer.results(), optimizer.settings());

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if args.validate && !validation.passed {
        anyhow::bail!("Validation failed");
    }

    let statistics = optimizer.get_statistics();
    info!("{}", statistics);

    println!("{}", render(&mut optimizer, statistics, validation, &args)?);

    // Write output
    if let Some(output_path) = &args.output {
        let mut snapshot = optimizer.export_project();
        snapshot.exported_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs());
        snapshot
            .save(output_path)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        info!("Saved: {}", output_path.display());
    }

    Ok(())
}

/// Render the report in the requested format.
fn render(
    optimizer: &mut Optimizer,
    statistics: Statistics,
    validation: ValidationResult,
    args: &Args,
) -> Result<String> {
    let cutting_list = args.list.then(|| optimizer.generate_cutting_list());

    match args.format {
        OutputFormat::Json => {
            let report = Report {
                statistics,
                unplaced: optimizer.unplaced().to_vec(),
                cutting_list,
                warnings: validation.warnings,
                errors: validation.errors,
            };
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
        OutputFormat::Text => Ok(match cutting_list {
            Some(list) => list.to_string(),
            None => render_summary(optimizer, &statistics),
        }),
    }
}

fn render_summary(optimizer: &Optimizer, statistics: &Statistics) -> String {
    let mut lines = vec![statistics.to_string()];
    for sheet in &statistics.sheets {
        lines.push(format!(
            "  {}. {} ({}) {}x{}: {} part(s), {:.1}% used, grain {:.1}%",
            sheet.number,
            sheet.name,
            sheet.material,
            sheet.width,
            sheet.height,
            sheet.parts,
            sheet.efficiency,
            sheet.grain_compliance
        ));
    }
    for id in optimizer.unplaced() {
        if let Some(part) = optimizer.parts().iter().find(|p| p.id == *id) {
            lines.push(format!(
                "  unplaced: '{}' #{} {}x{} {}",
                part.name, part.id, part.width, part.height, part.material
            ));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::{PartOptions, SheetOptions};
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["cutlist", "--input", "project.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn optimizer() -> Optimizer {
        let mut opt = Optimizer::new();
        opt.add_sheet("Egger", 1000, 1000, 50.0, "ПДЧ 18мм", SheetOptions::default())
            .unwrap();
        opt.add_part("Side", 500, 1000, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap();
        opt.add_part("Plinth", 2000, 100, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap();
        opt.calculate_optimization();
        opt
    }

    #[test]
    fn test_args_defaults() {
        let args = args(&[]);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.list && !args.validate && !args.verbose);
        assert!(args.sorting.is_none() && args.heuristic.is_none());
    }

    #[test]
    fn test_args_overrides() {
        let args = args(&["--format", "json", "--sorting", "maxside", "--heuristic", "BSSF"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.sorting, Some(SortingMethod::MaxSide));
        assert_eq!(args.heuristic, Some(Heuristic::BestShortSideFit));
    }

    #[test]
    fn test_args_reject_unknown_heuristic() {
        let argv = ["cutlist", "--input", "p.json", "--heuristic", "best"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_render_summary_lists_unplaced() {
        let mut opt = optimizer();
        let stats = opt.get_statistics();
        let text = render_summary(&opt, &stats);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("1 part(s), 50.0% used"));
        assert_eq!(lines[2], "  unplaced: 'Plinth' #2 2000x100 ПДЧ 18мм");
    }

    #[test]
    fn test_render_json_report() {
        let mut opt = optimizer();
        let stats = opt.get_statistics();
        let out = render(&mut opt, stats, ValidationResult::ok(), &args(&["--format", "json", "--list"]))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["unplaced"], serde_json::json!([2]));
        assert_eq!(value["statistics"]["placedParts"], 1);
        assert!(value["cuttingList"]["sheets"].is_array());
    }

    #[test]
    fn test_saved_project_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut snapshot = optimizer().export_project();
        snapshot.exported_at = Some(1_700_000_000);
        snapshot.save(&path).unwrap();

        let reloaded = load_project(&path).unwrap();
        assert_eq!(reloaded.results().len(), 1);
        assert_eq!(reloaded.unplaced(), &[2]);
    }
}
