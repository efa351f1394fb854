//! dsc - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use deepseek_commit::config::{MIN_MAX_DIFF_LENGTH, temperature_in_range};
use deepseek_commit::i18n::Message;
use deepseek_commit::{
    CommitMessageGenerator, CommitStyle, CredentialStatus, GitError, Language,
    RepositoryInspector, Settings, SuggestError, SuggestOutcome, suggest_commit_message,
};

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "DSC_LOG";
const VERBOSE_FILTER: &str = "deepseek_commit=debug,dsc=debug";
const DEFAULT_FILTER: &str = "warn";
const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Generate git commit messages for staged changes with DeepSeek.
///
/// Flags without a subcommand update the saved configuration.
#[derive(Parser, Debug)]
#[command(name = "dsc")]
#[command(about = "Generate git commit messages for staged changes with DeepSeek")]
#[command(version)]
struct Cli {
    /// Save the DeepSeek API key
    #[arg(long)]
    api_key: Option<String>,

    /// Save the commit message style
    #[arg(long, value_enum)]
    commit_style: Option<CommitStyle>,

    /// Save the output language
    #[arg(long, value_enum)]
    language: Option<Language>,

    /// Save the sampling temperature (0.1-1.0)
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Save the maximum diff length in characters (>=100)
    #[arg(long, allow_negative_numbers = true)]
    max_diff_length: Option<i64>,

    /// Save the model name
    #[arg(long)]
    model: Option<String>,

    /// Save the chat-completion endpoint URL
    #[arg(long)]
    base_url: Option<String>,

    /// Print the current configuration
    #[arg(long)]
    show_config: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the staged changes
    Run {
        /// Repository path (defaults to the current directory)
        path: Option<PathBuf>,

        /// Commit the staged changes with the generated message
        #[arg(long)]
        commit: bool,
    },

    /// List staged, unstaged and untracked files
    Status {
        /// Repository path (defaults to the current directory)
        path: Option<PathBuf>,

        /// Print git's short status instead of grouped lists
        #[arg(long)]
        short: bool,
    },

    /// Check whether an API key is accepted
    TestKey {
        /// Key to check (defaults to the configured key)
        key: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (settings, config_readable) = match Settings::load() {
        Ok(settings) => (settings, true),
        Err(e) => {
            warn!("{}, using default configuration", e);
            (Settings::default(), false)
        }
    };
    let language = settings.language;

    run_until_interrupted(
        dispatch(cli, settings, config_readable),
        tokio::signal::ctrl_c(),
        language,
    )
    .await
}

/// Drive `work` to completion unless `interrupt` fires first.
///
/// An interrupt future that resolves to an error (handler not installed) is
/// ignored and `work` keeps running.
async fn run_until_interrupted(
    work: impl Future<Output = Result<()>>,
    interrupt: impl Future<Output = std::io::Result<()>>,
    language: Language,
) -> ExitCode {
    tokio::select! {
        result = work => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                println!("{}", Message::RuntimeError(&format!("{e:#}")).render(language));
                ExitCode::FAILURE
            }
        },
        Ok(()) = interrupt => {
            debug!("Interrupted");
            ExitCode::from(INTERRUPTED_EXIT_CODE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

async fn dispatch(cli: Cli, settings: Settings, config_readable: bool) -> Result<()> {
    match cli.command {
        Some(Command::Run { ref path, commit }) => run(path.as_deref(), commit, settings).await,
        Some(Command::Status { ref path, short }) => {
            status(path.as_deref(), short, &settings).await
        }
        Some(Command::TestKey { ref key }) => test_key(key.as_deref(), settings).await,
        None if cli.show_config => {
            show_config(&settings);
            Ok(())
        }
        None => update_config(&cli, settings, config_readable),
    }
}

/// Apply configuration flags and persist them; print help when none were given.
///
/// Nothing is written when the existing file could not be loaded.
fn update_config(cli: &Cli, mut settings: Settings, config_readable: bool) -> Result<()> {
    let language = settings.language;
    let mut changed = false;

    if let Some(temperature) = cli.temperature {
        if !temperature_in_range(temperature) {
            println!("{}", Message::InvalidTemperature.render(language));
            return Ok(());
        }
        settings.temperature = temperature;
        changed = true;
    }

    if let Some(max_diff_length) = cli.max_diff_length {
        let max_diff_length = match usize::try_from(max_diff_length) {
            Ok(n) if n >= MIN_MAX_DIFF_LENGTH => n,
            _ => {
                println!("{}", Message::InvalidMaxDiffLength.render(language));
                return Ok(());
            }
        };
        settings.max_diff_length = max_diff_length;
        changed = true;
    }

    if let Some(api_key) = &cli.api_key {
        settings.set_api_key(api_key);
        changed = true;
    }
    if let Some(style) = cli.commit_style {
        settings.set_commit_style(style);
        changed = true;
    }
    if let Some(model) = &cli.model {
        settings.model = model.trim().to_string();
        changed = true;
    }
    if let Some(base_url) = &cli.base_url {
        settings.api_base_url = base_url.trim().to_string();
        changed = true;
    }
    if let Some(new_language) = cli.language {
        settings.set_language(new_language);
        changed = true;
    }

    if !changed {
        Cli::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(());
    }

    if !config_readable {
        println!("{}", Message::ConfigUnreadable.render(language));
        return Ok(());
    }

    let language = settings.language;
    match settings.save() {
        Ok(path) => {
            debug!("Configuration written to {}", path.display());
            println!("{}", Message::ConfigUpdated.render(language));
        }
        Err(e) => {
            warn!("{}", e);
            println!("{}", Message::ConfigSaveFailed.render(language));
        }
    }
    Ok(())
}

fn show_config(settings: &Settings) {
    println!("{}", Message::CurrentConfig.render(settings.language));
    println!("api_key: {}", settings.masked_api_key());
    println!("model: {}", settings.model);
    println!("language: {}", settings.language);
    println!("commit_style: {}", settings.commit_style);
    println!("temperature: {}", settings.temperature);
    println!("max_diff_length: {}", settings.max_diff_length);
}

/// Open the repository at `path`, printing a localized error on failure.
fn open_inspector(path: Option<&Path>, language: Language) -> Option<RepositoryInspector> {
    if let Some(p) = path
        && !p.exists()
    {
        let shown = p.display().to_string();
        println!("{}", Message::PathNotExist(&shown).render(language));
        return None;
    }

    match RepositoryInspector::open(path) {
        Ok(inspector) => Some(inspector),
        Err(e) => {
            let detail = e.localized(language);
            let message = match e {
                GitError::RepositoryNotFound(_) => Message::NoGitRepo(&detail),
                GitError::ExecutableNotFound => Message::NoGitExecutable(&detail),
                _ => Message::GitInitFailed(&detail),
            };
            println!("{}", message.render(language));
            None
        }
    }
}

async fn run(path: Option<&Path>, commit: bool, settings: Settings) -> Result<()> {
    let language = settings.language;
    let Some(inspector) = open_inspector(path, language) else {
        return Ok(());
    };

    let generator = CommitMessageGenerator::new(settings);
    let message = match suggest_commit_message(&inspector, &generator).await {
        Ok(SuggestOutcome::NothingStaged) => {
            println!("{}", Message::NoStagedChanges.render(language));
            return Ok(());
        }
        Ok(SuggestOutcome::Message(message)) => message,
        Err(SuggestError::Config(e)) => {
            let detail = e.localized(language);
            println!("{}", Message::ConfigInvalid(&detail).render(language));
            return Ok(());
        }
        Err(SuggestError::Generation(e)) => {
            let detail = e.localized(language);
            println!("{}", Message::GenerateFailed(&detail).render(language));
            return Ok(());
        }
    };

    println!("{message}");

    if commit {
        match inspector.commit(&message).await {
            Ok(()) => println!("{}", Message::Committed.render(language)),
            Err(e) => {
                let detail = e.localized(language);
                println!("{}", Message::CommitFailed(&detail).render(language));
            }
        }
    }
    Ok(())
}

async fn status(path: Option<&Path>, short: bool, settings: &Settings) -> Result<()> {
    let language = settings.language;
    let Some(inspector) = open_inspector(path, language) else {
        return Ok(());
    };

    if short {
        println!("{}", inspector.get_status().await);
        return Ok(());
    }

    let sections = [
        (Message::StagedFiles, inspector.get_staged_files().await),
        (Message::UnstagedFiles, inspector.get_unstaged_files().await),
        (Message::UntrackedFiles, inspector.get_untracked_files().await),
    ];

    for (heading, files) in sections {
        println!("{}", heading.render(language));
        if files.is_empty() {
            println!("{}", Message::NoFiles.render(language));
        }
        for file in files {
            println!("  {file}");
        }
    }
    Ok(())
}

async fn test_key(key: Option<&str>, settings: Settings) -> Result<()> {
    let language = settings.language;
    let generator = CommitMessageGenerator::new(settings);

    let message = match generator.test_credential(key).await {
        CredentialStatus::Valid => Message::CredentialValid.render(language),
        CredentialStatus::Invalid => Message::CredentialInvalid.render(language),
        CredentialStatus::Empty => Message::CredentialEmpty.render(language),
        CredentialStatus::Failed(e) => {
            Message::CredentialCheckFailed(&e.localized(language)).render(language)
        }
    };
    println!("{message}");
    Ok(())
}
