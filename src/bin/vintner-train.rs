//! Trains the wine quality forest and writes the model and scaler artifacts.

use std::path::PathBuf;

use vintner::config::{self, AppConfig, MAX_TEST_FRACTION, MIN_TEST_FRACTION};
use vintner::logging;
use vintner::training::{self, TrainingOutcome};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init("vintner-train") {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = config::load_explicit_or_default(options.config.as_deref())
        .map_err(|err| err.to_string())?;
    options.apply(&mut config);
    let settings = config.training.clone().normalized();
    let paths = config.artifact_paths();

    let outcome = training::train(&settings, &paths).map_err(|err| err.to_string())?;
    print_report(&outcome);
    println!("model saved to: {}", paths.model.display());
    println!("scaler saved to: {}", paths.scaler.display());
    Ok(())
}

fn print_report(outcome: &TrainingOutcome) {
    println!(
        "dataset preview ({} rows, delimiter {:?}):",
        outcome.n_rows, outcome.delimiter as char
    );
    println!("{}", outcome.columns.join(" | "));
    for row in &outcome.preview {
        let cells: Vec<String> = row.iter().map(|value| format!("{value}")).collect();
        println!("{}", cells.join(" | "));
    }
    println!();
    println!("columns: {}", outcome.columns.join(", "));
    println!("rows: {} train / {} test", outcome.n_train, outcome.n_test);
    println!("RMSE: {:.4}", outcome.report.rmse);
    println!("R²: {:.4}", outcome.report.r2);
    println!("MAE: {:.4}", outcome.report.mae);
    println!("feature importances:");
    for (name, importance) in &outcome.importances {
        println!("  {name:<22} {importance:.4}");
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    dataset: Option<PathBuf>,
    model_out: Option<PathBuf>,
    scaler_out: Option<PathBuf>,
    trees: Option<usize>,
    seed: Option<u64>,
    test_fraction: Option<f64>,
    max_depth: Option<usize>,
    config: Option<PathBuf>,
}

impl CliOptions {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.dataset {
            config.training.dataset_path = path.clone();
        }
        if let Some(path) = &self.model_out {
            config.artifacts.model_path = path.clone();
        }
        if let Some(path) = &self.scaler_out {
            config.artifacts.scaler_path = path.clone();
        }
        if let Some(trees) = self.trees {
            config.training.n_trees = trees;
        }
        if let Some(seed) = self.seed {
            config.training.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            config.training.test_fraction = fraction;
        }
        if self.max_depth.is_some() {
            config.training.max_depth = self.max_depth;
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        if flag == "-h" || flag == "--help" {
            return Err(help_text());
        }
        idx += 1;
        let value = || {
            args.get(idx)
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag {
            "--dataset" => options.dataset = Some(PathBuf::from(value()?)),
            "--model-out" => options.model_out = Some(PathBuf::from(value()?)),
            "--scaler-out" => options.scaler_out = Some(PathBuf::from(value()?)),
            "--config" => options.config = Some(PathBuf::from(value()?)),
            "--trees" => options.trees = Some(parse_number(flag, &value()?)?),
            "--seed" => options.seed = Some(parse_number(flag, &value()?)?),
            "--max-depth" => options.max_depth = Some(parse_number(flag, &value()?)?),
            "--test-fraction" => {
                let raw = value()?;
                let fraction: f64 = parse_number(flag, &raw)?;
                if !(MIN_TEST_FRACTION..=MAX_TEST_FRACTION).contains(&fraction) {
                    return Err(format!(
                        "--test-fraction must be in [{MIN_TEST_FRACTION}, \
                         {MAX_TEST_FRACTION}]: {raw}"
                    ));
                }
                options.test_fraction = Some(fraction);
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    [
        "vintner-train",
        "",
        "Trains a random forest regressor on a red wine quality table and saves the model and",
        "feature scaler as JSON.",
        "",
        "Usage:",
        "  vintner-train [--dataset <file>] [--model-out <file>] [--scaler-out <file>] [options]",
        "",
        "Options:",
        "  --dataset <file>        Delimited dataset with a quality column",
        "                          (default: winequality-red.csv).",
        "  --model-out <file>      Output model path (default: model.json).",
        "  --scaler-out <file>     Output scaler path (default: scaler.json).",
        "  --trees <n>             Trees in the forest (default: 250).",
        "  --seed <n>              Seed for the split and the forest (default: 42).",
        "  --test-fraction <f>     Held-out share of rows, 0.05 to 0.5 (default: 0.2).",
        "  --max-depth <n>         Maximum tree depth (default: unlimited).",
        "  --config <file>         Load settings from this TOML file instead of the app directory.",
    ]
    .join("\n")
}
