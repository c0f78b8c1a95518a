//! AnalystForge command-line driver
//!
//! Loads one document, prints its summary and chart specifications as JSON,
//! then answers questions about it:
//! - `--question` flags, answered in order
//! - stdin, one question per line, with `--interactive`
//!
//! Each answer is fed back as conversation turns for the next question.

use analystforge_common::completion::ChatTurn;
use analystforge_common::config::AppConfig;
use analystforge_common::errors::{AppError, ErrorResponse};
use analystforge_common::metrics::{self, COMPLETION_BUCKETS, METRICS_PREFIX};
use analystforge_common::{telemetry, VERSION};
use analystforge_context::AnalystAgent;
use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use serde::Serialize;
use serde_json::json;
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "analyst")]
#[command(about = "Summarize, chart, and question a single document")]
#[command(version)]
struct Cli {
    /// Document to analyze (csv, xlsx, txt, docx, pdf, png, jpg, jpeg)
    file: PathBuf,

    /// Question to ask; repeat for a conversation
    #[arg(short, long = "question")]
    questions: Vec<String>,

    /// Read further questions from stdin, one per line
    #[arg(short, long)]
    interactive: bool,

    /// Configuration file (defaults to the config/ directory layering)
    #[arg(long, env = "ANALYST_CONFIG")]
    config: Option<String>,

    /// Override the completion model
    #[arg(long)]
    model: Option<String>,

    /// Use the offline mock completion client
    #[arg(long)]
    mock: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Fatal error");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    if cli.mock {
        config.llm.provider = "mock".to_string();
    }
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    telemetry::init_tracing(&config.observability);
    info!("Starting AnalystForge v{}", VERSION);

    metrics::register_metrics();
    if config.observability.metrics_port != 0 {
        install_metrics_exporter(config.observability.metrics_port)?;
    }

    let mut agent = AnalystAgent::from_config(&config.llm)
        .context("Failed to create completion client")?;
    info!(model = agent.model(), "Completion client ready");

    match agent.load(&cli.file) {
        Ok(outcome) => print_json(&outcome)?,
        Err(e) => {
            print_error(&e)?;
            return Ok(ExitCode::FAILURE);
        }
    }

    match agent.summarize() {
        Ok(summary) => print_json(&json!({ "summary": summary }))?,
        Err(e) => print_error(&e)?,
    }

    match agent.plan_visualizations() {
        Ok(specs) => print_json(&json!({ "visualizations": specs }))?,
        Err(e) => print_error(&e)?,
    }

    let mut turns: Vec<ChatTurn> = Vec::new();
    for question in &cli.questions {
        ask(&mut agent, question, &mut turns)?;
    }

    if cli.interactive {
        let stdin = std::io::stdin();
        prompt()?;
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read from stdin")?;
            let question = line.trim();
            match question {
                "" => {}
                "exit" | "quit" => break,
                _ => ask(&mut agent, question, &mut turns)?,
            }
            prompt()?;
        }
    }

    info!(answered = agent.history().len(), "Session finished");
    Ok(ExitCode::SUCCESS)
}

fn ask(agent: &mut AnalystAgent, question: &str, turns: &mut Vec<ChatTurn>) -> anyhow::Result<()> {
    match agent.answer(question, turns.as_slice()) {
        Ok(answer) => {
            print_json(&json!({ "question": question, "response": answer }))?;
            turns.push(ChatTurn::user(question));
            turns.push(ChatTurn::assistant(answer.answer));
        }
        Err(e) => print_error(&e)?,
    }
    Ok(())
}

fn install_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_completion_duration_seconds", METRICS_PREFIX)),
            COMPLETION_BUCKETS,
        )?
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn print_error(err: &AppError) -> anyhow::Result<()> {
    print_json(&ErrorResponse::from(err))
}

fn prompt() -> anyhow::Result<()> {
    let mut stderr = std::io::stderr();
    write!(stderr, "> ")?;
    stderr.flush()?;
    Ok(())
}
