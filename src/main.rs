use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use riskboard::analysis::{board_kpi, global_kpi};
use riskboard::api::{self, AppState};
use riskboard::export::{self, ExportFormat};
use riskboard::models::{KpiSummary, RiskCounts};
use riskboard::{
    AnalyzerConfig, BatchAnalyzer, ClaudeProvider, ClassifierConfig, Config, Repository,
    RiskClassifier, Storage,
};

#[derive(Parser, Debug)]
#[command(name = "riskboard")]
#[command(version = "0.1.0")]
#[command(about = "Catalogue AI solutions and classify their EU AI Act risk level")]
struct Args {
    /// Database path (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Classify every pending or failed solution on a board
    Analyze {
        #[arg(short, long)]
        board: i64,
    },
    /// Print risk counts, globally or for one board
    Kpi {
        #[arg(short, long)]
        board: Option<i64>,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Export a board's solutions
    Export {
        #[arg(short, long)]
        board: i64,

        /// Export format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("riskboard=info".parse()?)
                .add_directive("reqwest=warn".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    let database = args.database.unwrap_or_else(|| config.database_path.clone());
    let storage = Arc::new(Storage::new(&database)?);

    match args.command {
        Command::Serve { bind } => {
            let analyzer = build_analyzer(&config, storage.clone(), false)?;
            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            api::serve(AppState::new(storage, analyzer), &addr).await?;
        }
        Command::Analyze { board } => {
            let analyzer = build_analyzer(&config, storage.clone(), true)?;
            let summary = analyzer.analyze(board).await?;
            println!("{}", summary.message());
            println!("Total solutions on board: {}", summary.total);
            for error in &summary.errors {
                println!("  ! {}", error);
            }
        }
        Command::Kpi { board, format } => {
            let output = match board {
                Some(id) => {
                    let kpi = board_kpi(storage.as_ref(), id)?;
                    match format.as_str() {
                        "json" => serde_json::to_string_pretty(&kpi)?,
                        _ => format_kpi_text(&kpi.board_name, &kpi.summary),
                    }
                }
                None => {
                    let kpi = global_kpi(&storage)?;
                    match format.as_str() {
                        "json" => serde_json::to_string_pretty(&kpi)?,
                        _ => format_kpi_text(
                            &format!("All boards ({})", kpi.total_boards),
                            &kpi.summary,
                        ),
                    }
                }
            };
            println!("{}", output);
        }
        Command::Export {
            board,
            format,
            output,
        } => {
            let format: ExportFormat = format.parse()?;
            let board = storage.require_board(board)?;
            let solutions = storage.list_solutions(board.id)?;
            let body = export::render(format, &board, &solutions)?;

            if let Some(ref path) = output {
                std::fs::write(path, &body)?;
                tracing::info!("Output written to: {}", path);
            } else {
                print!("{}", body);
            }
        }
    }

    Ok(())
}

fn build_analyzer(
    config: &Config,
    storage: Arc<Storage>,
    show_progress: bool,
) -> anyhow::Result<BatchAnalyzer> {
    let provider = ClaudeProvider::new(
        config.require_api_key()?.to_string(),
        &ClassifierConfig::from(config),
    )?;
    tracing::info!("Classifying with model {}", provider.model());
    let analyzer_config = AnalyzerConfig {
        show_progress,
        ..AnalyzerConfig::from(config)
    };
    Ok(BatchAnalyzer::new(
        Arc::new(RiskClassifier::new(provider)),
        storage,
        analyzer_config,
    ))
}

fn format_kpi_text(title: &str, kpi: &KpiSummary) -> String {
    let mut output = format!("\n=== Risk Overview: {} ===\n\n", title);
    output.push_str(&format!("Solutions: {}\n\n", kpi.total_solutions));
    output.push_str(&format!("{:<14} {:>11} {:>8}\n", "Level", "AI Analysis", "Survey"));

    let rows: [(&str, fn(&RiskCounts) -> u32); 6] = [
        ("Unacceptable", |c| c.unacceptable),
        ("High", |c| c.high),
        ("Limited", |c| c.limited),
        ("Minimal", |c| c.minimal),
        ("Pending", |c| c.pending),
        ("Error", |c| c.error),
    ];
    for (label, count) in rows {
        output.push_str(&format!(
            "{:<14} {:>11} {:>8}\n",
            label,
            count(&kpi.ai_analysis),
            count(&kpi.survey)
        ));
    }

    output
}
