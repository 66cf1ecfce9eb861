mod settings;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use serde::Serialize;
use settle_up::{Balance, ExpenseReport, PaymentSuggestion};

/// Split group expenses and suggest who pays whom.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON document with groups, expenses and payments
    input: PathBuf,

    /// Only report this group
    #[arg(short, long)]
    group: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Settings file (defaults to `settle_up.toml` when present)
    #[arg(short, long, env = "SETTLE_UP_CONFIG")]
    config: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Output {
    balances: Vec<Balance>,
    settlements: Vec<PaymentSuggestion>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match settings::Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("invalid settings: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("settle_up={level}", level = settings.app.level))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli, &settings.display.currency) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cannot compute balances: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, currency: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = std::fs::read_to_string(&cli.input)?;
    let mut report = ExpenseReport::from_json(&json, currency)?;

    let group = cli.group.as_deref();
    let balances = report.balances(group)?;
    let settlements = report.settlements(group)?;

    if cli.format == Format::Json {
        let output = Output {
            balances,
            settlements,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for entry in report.summarize() {
        println!();
        println!("{}", entry);
    }

    println!();

    for balance in &balances {
        println!(
            "[{}] {} {}",
            balance.group_name,
            balance.participant_name,
            report.money(balance.amount)
        );
    }

    println!();

    for suggestion in &settlements {
        println!(
            "[{}] {} pays {} {}",
            suggestion.group_name,
            suggestion.from_name,
            suggestion.to_name,
            report.money(suggestion.amount)
        );
    }

    Ok(())
}
