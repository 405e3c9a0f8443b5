use anyhow::Context;
use cep_fleet::utils::{logger, validation::Validate};
use cep_fleet::{CliConfig, IbgeClient, LocalStorage, QueryEngine, QueryReport, QueryState, ViaCepClient};
use clap::Parser;
use std::io::{BufRead, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // before anything touches the disk or network
    if let Err(e) = settings.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let log_path = logger::init_cli_logger(&settings.logging)
        .with_context(|| format!("cannot open log directory {}", settings.logging.log_dir))?;
    tracing::info!("Starting cep-fleet CLI, logging to {}", log_path.display());
    tracing::debug!("Settings: {:?}", settings);

    let addresses = ViaCepClient::new(settings.address_endpoint.clone());
    let statistics = IbgeClient::new(settings.statistics_endpoint.clone(), settings.indicator.clone());
    let storage = LocalStorage::new(settings.output_path.clone());
    let mut engine = QueryEngine::new(addresses, statistics, storage, settings);

    if let Some(cep) = cli.cep.as_deref() {
        let ok = present(engine.submit(cep.trim()).await);
        std::process::exit(if ok { 0 } else { 1 });
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Postal code (empty to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("cannot read from stdin")?;
        if line.trim().is_empty() {
            break;
        }

        if present(engine.submit(line.trim()).await) {
            break;
        }
        engine.reset();
    }

    tracing::info!("cep-fleet finished");
    Ok(())
}

fn present(state: &QueryState) -> bool {
    match state {
        QueryState::Success(report) => {
            print_report(report);
            true
        }
        QueryState::Failed(message) => {
            eprintln!("❌ {}", message);
            false
        }
        QueryState::AwaitingInput | QueryState::Querying => false,
    }
}

fn print_report(report: &QueryReport) {
    if let Some(chart) = &report.chart {
        println!("{}", chart);
    }
    if let Some(path) = &report.saved_path {
        println!("📁 Output saved to: {}", path);
    }
    if let Some(warning) = &report.export_warning {
        eprintln!("⚠️  {}", warning);
    }
    println!(
        "✅ {} rows for {} (code {})",
        report.series.len(),
        report.region_name,
        report.region_code
    );
}
