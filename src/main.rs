use clap::Parser;
use nlrun::audit::AuditLogger;
use nlrun::cli::Args;
use nlrun::config::{load_env_file, Config, ConfigError, EnvFileStatus};
use nlrun::llm::{GeminiClient, Translator};
use nlrun::pipeline::{Instruction, Pipeline, PipelineOutcome, PromptError};
use nlrun::shell::ShellExecutor;
use nlrun::ui::{self, TerminalOperator};
use nlrun::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

const EXIT_INTERRUPTED: i32 = 130;
const EXIT_TERMINATED: i32 = 143;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables from .env before anything reads them
    let env_file = load_env_file();

    init_tracing(args.verbose);
    match env_file {
        EnvFileStatus::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        EnvFileStatus::Missing => {
            tracing::info!("No .env file found. Continuing with environment variables.")
        }
        EnvFileStatus::Invalid(e) => tracing::warn!(error = %e, "failed to load .env file"),
    }

    spawn_signal_listener();

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            eprintln!("Error: {}", e);
            let code = match e {
                AppError::Prompt(PromptError::Interrupted) => EXIT_INTERRUPTED,
                _ => ui::output::EXIT_FAILURE,
            };
            std::process::exit(code);
        }
    }
}

async fn run(args: Args) -> AppResult<i32> {
    let config = Config::load(args.config.as_deref())?;

    // Missing key is fatal before any instruction is read
    let api_key = config.api_key()?;

    let mut operator = TerminalOperator::new(args.verbose)?;
    let text = match args.instruction() {
        Some(text) => text.to_string(),
        None => operator.read_instruction()?,
    };
    let instruction = Instruction::new(&text).ok_or(ConfigError::EmptyInstruction)?;

    let client = GeminiClient::new(api_key, config.model(), config.timeout())?
        .with_base_url(config.llm.base_url.as_str());
    tracing::info!(model = client.model(), "application starting");

    let executor = ShellExecutor::with_shell(config.execution.shell.as_str());
    let mut pipeline = Pipeline::new(Translator::new(Box::new(client)), executor);
    if let Some(audit) = open_audit_log(&config) {
        pipeline = pipeline.with_audit(audit);
    }

    let outcome = pipeline.run(&instruction, &mut operator, args.dry_run).await;

    let rendered = ui::render_outcome(&outcome);
    if matches!(outcome, PipelineOutcome::Failed { .. }) {
        eprintln!("{}", rendered);
    } else {
        println!("{}", rendered);
    }

    tracing::info!(outcome = %outcome.state(), "pipeline finished");
    Ok(ui::exit_code(&outcome))
}

/// Audit logging is best effort: a broken log location never blocks a run
fn open_audit_log(config: &Config) -> Option<AuditLogger> {
    let path = match config.audit_path() {
        Ok(path) => path?,
        Err(e) => {
            tracing::warn!(error = %e, "audit log disabled");
            return None;
        }
    };

    match AuditLogger::open(&path) {
        Ok(logger) => Some(logger),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "audit log disabled");
            None
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "nlrun=debug" } else { "nlrun=info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Exit the whole process on SIGINT/SIGTERM
///
/// Nothing is persisted across runs, so in-flight work is simply dropped.
fn spawn_signal_listener() {
    tokio::spawn(async {
        let code = wait_for_shutdown_signal().await;
        tracing::info!("Received termination signal, shutting down");
        std::process::exit(code);
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> i32 {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM");
            wait_for_ctrl_c().await;
            return EXIT_INTERRUPTED;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => EXIT_INTERRUPTED,
        _ = terminate.recv() => EXIT_TERMINATED,
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> i32 {
    wait_for_ctrl_c().await;
    EXIT_INTERRUPTED
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
