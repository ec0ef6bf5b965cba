use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use defense_core::model::BlockId;
use services::{
    Clock, FileQuestionSource, GameLauncher, HttpQuestionSource, HttpSourceConfig, QuestionSource,
    ResumePreview, SessionEngine,
};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod input;
mod terminal;

use terminal::{Terminal, write_resume_preview};

const LOG_ENV: &str = "NETDEFENSE_LOG";

#[derive(Debug, Parser)]
#[command(name = "netdefense", version, about = "Network defense training quiz")]
struct Cli {
    /// Directory holding the saved session.
    #[arg(long, env = "NETDEFENSE_DATA_DIR", default_value = ".netdefense", global = true)]
    data_dir: PathBuf,

    /// Question service base URL (overrides NETDEFENSE_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read sectors from `block{N}.json` files instead of the question service.
    #[arg(long, env = "NETDEFENSE_QUESTIONS_DIR", global = true)]
    questions_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a sector, offering to continue a saved session first.
    Play {
        /// Sector to start without showing the selection prompt.
        #[arg(long)]
        block: Option<u32>,

        /// Shuffle question order.
        #[arg(long)]
        shuffle: bool,
    },
    /// Show the saved session, if any.
    Status,
    /// Delete the saved session.
    Reset,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        data_dir,
        api_url,
        questions_dir,
        command,
    } = cli;
    info!(data_dir = %data_dir.display(), "opening progress store");
    let storage = Storage::json_file(&data_dir);
    let mut engine = SessionEngine::new(Clock::default(), storage.progress);

    match command.unwrap_or(Command::Play {
        block: None,
        shuffle: false,
    }) {
        Command::Status => {
            match engine.saved_progress() {
                Some(saved) => {
                    let preview = ResumePreview::from_saved(&saved);
                    write_resume_preview(&mut io::stdout().lock(), &preview)?;
                }
                None => println!("NO SAVED SESSION"),
            }
            Ok(())
        }
        Command::Reset => {
            engine.clear_progress();
            println!("PROGRESS CLEARED");
            Ok(())
        }
        Command::Play { block, shuffle } => {
            let source = question_source(api_url, questions_dir)?;
            let launcher = GameLauncher::new(source).with_shuffle(shuffle);
            let mut terminal = Terminal::new(io::stdin().lock(), io::stdout().lock());
            terminal
                .play(&mut engine, &launcher, block.map(BlockId::new))
                .await
        }
    }
}

fn question_source(
    api_url: Option<String>,
    questions_dir: Option<PathBuf>,
) -> anyhow::Result<Arc<dyn QuestionSource>> {
    if let Some(dir) = questions_dir {
        let source = FileQuestionSource::new(dir);
        info!(dir = %source.dir().display(), "reading sectors from directory");
        return Ok(Arc::new(source));
    }
    let mut config = HttpSourceConfig::from_env();
    if let Some(url) = api_url {
        config.base_url = url;
    }
    let source = HttpQuestionSource::new(config).context("failed to build question client")?;
    info!(
        base_url = %source.config().base_url,
        timeout = ?source.config().timeout,
        "using question service"
    );
    Ok(Arc::new(source))
}
