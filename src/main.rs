#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the egui-based wine quality predictor.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::path::PathBuf;

use eframe::egui;
use vintner::config;
use vintner::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use vintner::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = match parse_args(std::env::args().skip(1).collect()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if let Err(err) = logging::init("vintner") {
        eprintln!("Logging disabled: {err}");
    }

    let config = match config::load_explicit_or_default(options.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let mut paths = config.artifact_paths();
    if let Some(model) = options.model {
        paths.model = model;
    }
    if let Some(scaler) = options.scaler {
        paths.scaler = scaler;
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("Red Wine Quality Prediction")
        .with_inner_size(MIN_VIEWPORT_SIZE)
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Vintner",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EguiApp::new(paths)))),
    )
    .map_err(|err| {
        let message = format!("Failed to start UI: {err}");
        tracing::error!("{message}");
        message
    })?;
    Ok(())
}

#[derive(Debug, Default)]
struct CliOptions {
    model: Option<PathBuf>,
    scaler: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "--model" | "--scaler" | "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .map(PathBuf::from)
                    .ok_or_else(|| format!("{flag} requires a value"))?;
                match flag {
                    "--model" => options.model = Some(value),
                    "--scaler" => options.scaler = Some(value),
                    _ => options.config = Some(value),
                }
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "vintner",
        "",
        "Open the red wine quality predictor.",
        "",
        "Usage:",
        "  vintner [--model <file>] [--scaler <file>] [--config <file>]",
        "",
        "Options:",
        "  --model <file>    Model artifact (default from config, else model.json).",
        "  --scaler <file>   Scaler artifact (default from config, else scaler.json).",
        "  --config <file>   Load settings from this TOML file instead of the app directory.",
        "  -h, --help        Show this help.",
    ]
    .join("\n")
}
