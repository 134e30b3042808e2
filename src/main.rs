//! Building energy simulator entry point — CLI wiring and config loading.

use std::path::Path;
use std::process;

use bem_sim::config::BuildingConfig;
use bem_sim::io::export::export_csv;
use bem_sim::model::{AnnualSummary, BuildingModel, MonthlyResult};

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("bem-sim — Building HVAC monthly energy simulator");
    eprintln!();
    eprintln!("Usage: bem-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   Load building config from a JSON or TOML file");
    eprintln!("  --preset <name>   Use a built-in preset (modern, old)");
    eprintln!("  --out <path>      Export monthly results to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve           Start REST API server instead of printing results");
        eprintln!("  --port <u16>      API server port (default: 3000)");
    }
    eprintln!("  --help            Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the modern preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_monthly_table(results: &[MonthlyResult]) {
    println!(
        "{:>5} {:>8} {:>10} {:>10} {:>10} {:>6} {:>12} {:>12} {:>12}",
        "month",
        "out °C",
        "sens kW",
        "lat kW",
        "total kW",
        "SHF",
        "central kWh",
        "local kWh",
        "total kWh"
    );
    for r in results {
        println!(
            "{:>5} {:>8.1} {:>10.2} {:>10.2} {:>10.2} {:>6.3} {:>12.1} {:>12.1} {:>12.1}",
            r.month,
            r.outdoor_temp,
            r.sensible_load_kw,
            r.latent_load_kw,
            r.total_load_kw,
            r.shf,
            r.central_total_kwh,
            r.local_total_kwh,
            r.central_total_kwh + r.local_total_kwh,
        );
    }
}

fn print_summary(summary: &AnnualSummary) {
    println!();
    println!("Annual summary");
    println!(
        "  central total:       {:>12.1} kWh",
        summary.annual_central_total_kwh
    );
    println!(
        "  local total:         {:>12.1} kWh",
        summary.annual_local_total_kwh
    );
    println!(
        "  total load:          {:>12.1} kWh",
        summary.annual_total_load_kwh
    );
    println!(
        "  avg monthly load:    {:>12.2} kW",
        summary.average_monthly_load_kw
    );
}

fn main() {
    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then the modern default
    let config = if let Some(ref path) = cli.config_path {
        match BuildingConfig::from_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match BuildingConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        BuildingConfig::modern_office()
    };

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Start API server if requested; serves requests instead of running once
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(bem_sim::api::AppState::default());
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(bem_sim::api::serve(state, addr));
        return;
    }

    // Simulate and report
    let model = BuildingModel::new(
        config.floor_spec,
        config.equipment_spec,
        config.monthly_conditions,
    );
    let results = model.simulate_year();
    let summary = model.summarize(&results);

    print_monthly_table(&results);
    print_summary(&summary);

    // Export CSV if requested
    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {path}");
    }
}
