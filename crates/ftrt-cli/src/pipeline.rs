//! Load → analyze → export

use ftrt_config::{OutputFormat, Settings};
use ftrt_core::{CorrelationAnalyzer, CorrelationReport, LagScan};
use ftrt_io::{load_ftrt, load_solar, CsvLayout, ReportFormat, ReportWriter};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::args::Args;
use crate::error::CliError;

/// Resolve settings from every source: defaults, file, environment, flags
pub fn load_settings(args: &Args) -> Result<Settings, CliError> {
    let loaded = match &args.config {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load(),
    };
    let settings = loaded
        .map_err(|e| CliError::Config(e.to_string()))?
        .merge_cli_args(args);
    settings.validate().map_err(CliError::InvalidConfig)?;
    Ok(settings)
}

/// Size the global rayon pool used by lag scans
pub fn configure_thread_pool(settings: &Settings) -> Result<(), CliError> {
    let threads = settings.app.worker_threads();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    debug!(threads, "thread pool configured");
    Ok(())
}

/// Run the analysis described by `settings`, print a summary to `out`, and
/// return the path of the written report
pub fn run<W: Write>(args: &Args, settings: &Settings, out: &mut W) -> Result<PathBuf, CliError> {
    let data = &settings.data;
    let ftrt_path = data.ftrt_path.as_ref().ok_or(CliError::MissingInput("ftrt"))?;
    let solar_path = data.solar_path.as_ref().ok_or(CliError::MissingInput("solar"))?;

    let delimiter = data.delimiter_byte().ok_or_else(|| {
        CliError::InvalidConfig(format!("delimiter '{}' is not ASCII", data.delimiter))
    })?;
    let ftrt_layout = CsvLayout {
        delimiter,
        timestamp_column: data.timestamp_column.clone(),
        value_column: data.ftrt_value_column.clone(),
        flare_class_column: None,
    };
    let solar_layout = CsvLayout {
        delimiter,
        timestamp_column: data.timestamp_column.clone(),
        value_column: data.solar_intensity_column.clone(),
        flare_class_column: Some(data.flare_class_column.clone()),
    };

    let ftrt = load_ftrt(ftrt_path, &ftrt_layout)?;
    let solar = load_solar(solar_path, &solar_layout)?;
    info!(ftrt = ftrt.len(), solar = solar.len(), "series loaded");

    let analyzer = CorrelationAnalyzer::with_config(settings.analysis.to_params());
    let export = &settings.export;
    let writer = ReportWriter::new(match export.format {
        OutputFormat::Json => ReportFormat::Json,
        OutputFormat::Csv => ReportFormat::Csv,
    })
    .pretty(export.pretty)
    .include_matches(export.include_matches);
    let method = settings.analysis.method.to_string();

    let path = match args.lags {
        Some(range) => {
            let scan = analyzer.lag_scan(&ftrt, &solar, &range.values())?;
            print_lag_scan(&scan, settings.analysis.alpha, out)?;
            let path = args.output.clone().unwrap_or_else(|| {
                export.report_path(settings.analysis.window_days, &format!("{}_lags", method))
            });
            writer.write_lag_scan(&scan, &path)?;
            path
        }
        None => {
            let report = analyzer.analyze(&ftrt, &solar)?;
            print_report(&report, settings.analysis.alpha, out)?;
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| export.report_path(settings.analysis.window_days, &method));
            writer.write_report(&report, &path)?;
            path
        }
    };

    writeln!(out, "report: {}", path.display())?;
    Ok(path)
}

fn print_report<W: Write>(
    report: &CorrelationReport,
    alpha: f64,
    out: &mut W,
) -> Result<(), CliError> {
    writeln!(
        out,
        "{} r = {:.4}, p_value = {:.4e}, n = {} (window ±{}d, lag {}d)",
        report.method, report.coefficient, report.p_value, report.n_pairs, report.window_days,
        report.lag_days
    )?;
    if let Some((lo, hi)) = report.confidence_interval {
        writeln!(out, "confidence interval: [{:.4}, {:.4}]", lo, hi)?;
    }
    writeln!(
        out,
        "{} at alpha = {}",
        if report.is_significant(alpha) {
            "significant"
        } else {
            "not significant"
        },
        alpha
    )?;
    Ok(())
}

fn print_lag_scan<W: Write>(scan: &LagScan, alpha: f64, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "{:>8}  {:>8}  {:>10}  {:>5}", "lag_days", "r", "p_value", "n")?;
    for result in &scan.results {
        match &result.report {
            Some(r) => writeln!(
                out,
                "{:>8}  {:>8.4}  {:>10.3e}  {:>5}{}",
                result.lag_days,
                r.coefficient,
                r.p_value,
                r.n_pairs,
                if r.is_significant(alpha) { " *" } else { "" }
            )?,
            None => writeln!(out, "{:>8}  {:>8}  {:>10}  {:>5}", result.lag_days, "-", "-", "-")?,
        }
    }
    if let Some(best) = scan.best() {
        writeln!(out, "best lag: {}d", best.lag_days)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lags::LagRange;
    use ftrt_core::test_utils::generators::{echoed_solar, ftrt_cycle};
    use std::fs;
    use std::path::Path;

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let ftrt = ftrt_cycle(3 * 365, 30.0);
        let solar = echoed_solar(&ftrt, 2, 4.0, 20.0);

        let ftrt_path = dir.join("ftrt.csv");
        let mut text = String::from("timestamp,ftrt\n");
        for r in &ftrt {
            text.push_str(&format!("{},{}\n", r.timestamp.to_rfc3339(), r.value));
        }
        fs::write(&ftrt_path, text).unwrap();

        let solar_path = dir.join("solar.json");
        fs::write(&solar_path, serde_json::to_string(&solar).unwrap()).unwrap();

        (ftrt_path, solar_path)
    }

    fn settings_for(args: &Args) -> Settings {
        let settings = Settings::default().merge_cli_args(args);
        settings.validate().unwrap();
        settings
    }

    #[test]
    fn test_run_writes_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let (ftrt, solar) = write_inputs(dir.path());
        let args = Args {
            ftrt: Some(ftrt),
            solar: Some(solar),
            window_days: Some(3),
            min_separation_days: Some(10.0),
            output: Some(dir.path().join("out").join("report.json")),
            ..Default::default()
        };

        let mut stdout = Vec::new();
        let path = run(&args, &settings_for(&args), &mut stdout).unwrap();

        let report: CorrelationReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(report.coefficient > 0.5, "r = {}", report.coefficient);
        assert_eq!(report.window_days, 3);

        let printed = String::from_utf8(stdout).unwrap();
        assert!(printed.starts_with("pearson r = "));
        assert!(printed.contains("report: "));
    }

    #[test]
    fn test_run_lag_scan_csv() {
        let dir = tempfile::tempdir().unwrap();
        let (ftrt, solar) = write_inputs(dir.path());
        let args = Args {
            ftrt: Some(ftrt),
            solar: Some(solar),
            window_days: Some(1),
            min_separation_days: Some(10.0),
            lags: Some(LagRange::new(-2.0, 2.0, 1.0).unwrap()),
            format: Some(OutputFormat::Csv),
            output: Some(dir.path().join("lags.csv")),
            ..Default::default()
        };

        let mut stdout = Vec::new();
        let path = run(&args, &settings_for(&args), &mut stdout).unwrap();

        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 6);
        let printed = String::from_utf8(stdout).unwrap();
        assert!(printed.contains("best lag: "));
    }

    #[test]
    fn test_missing_input() {
        let args = Args::default();
        let err = run(&args, &Settings::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::MissingInput("ftrt")));
    }

    #[test]
    fn test_load_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            ftrt: Some(dir.path().join("absent.csv")),
            solar: Some(dir.path().join("absent.json")),
            ..Default::default()
        };
        let err = run(&args, &settings_for(&args), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Load(_)));
    }
}
