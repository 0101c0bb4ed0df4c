use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use integrity::client::{ApiClient, Attachment, FeedbackPayload};
use integrity::config::Settings;
use integrity::consts::{DEFAULT_BASE_URL, default_db_path};
use integrity::highlight;
use integrity::mock::{DirFixtures, EmbeddedFixtures, FixtureSource, MockResponder, sample};
use integrity::operation::Operation;
use integrity::prefs::{Preferences, Theme};
use integrity::transport::Transport;
use integrity::transport::http::HttpTransport;

const RESPONSIBLE_USE_NOTICE: &str = "This tool is intended to assist in improving writing style and \
clarity, not to bypass academic integrity checks. Always cite your sources and use this tool \
responsibly. Run `integrity accept-responsible-use` to hide this notice.";

const RESPONSIBLE_USE_REQUIRED: &str =
    "Please accept the Responsible Use terms before continuing.";

#[derive(Parser)]
#[command(name = "integrity", version, about = "Integrity AI writing tools from the terminal.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Answer requests from local fixtures instead of the backend
    #[arg(
        long,
        global = true,
        env = "INTEGRITY_MOCK",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    mock: bool,

    /// Backend origin
    #[arg(long, global = true, env = "INTEGRITY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory of fixture files (defaults to the built-in set)
    #[arg(long, global = true, env = "INTEGRITY_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// SQLite database for preferences (default: ~/.integrity/integrity.db)
    #[arg(long, global = true, env = "INTEGRITY_DB")]
    db: Option<String>,

    /// Log request and routing details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Args)]
struct TextInput {
    /// Text to process (reads stdin when neither TEXT nor --file is given)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Show a sample input and its result from the fixtures, without a request
    #[arg(long, conflicts_with_all = ["text", "file"])]
    sample: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite text so it reads as human-written
    Humanize(TextInput),
    /// Estimate how likely text is AI-generated
    Detect(TextInput),
    /// Check grammar and spelling
    Grammar(TextInput),
    /// Check text against known sources
    Plagiarism(TextInput),
    /// Translate text
    Translate(TextInput),
    /// Fetch the assistant conversation
    Chat,
    /// Show loyalty points and tier progress
    Loyalty,
    /// List recent tool runs
    History,
    Login { email: String, password: String },
    Register { email: String, password: String },
    VerifyEmail,
    ForgotPassword { email: String },
    ResetPassword { password: String },
    /// Enable two-factor authentication
    TwoFactor { code: String },
    MagicLink { email: String },
    /// Send product feedback
    Feedback {
        /// Star rating, 1 to 5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(short, long)]
        text: Option<String>,
        /// Video recording to attach
        #[arg(long)]
        video: Option<PathBuf>,
    },
    /// Show or change the color theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Acknowledge the responsible-use policy
    AcceptResponsibleUse,
}

impl Command {
    /// The operation and input of a text tool command.
    fn text_tool(&self) -> Option<(Operation, &TextInput)> {
        match self {
            Command::Humanize(input) => Some((Operation::Humanize, input)),
            Command::Detect(input) => Some((Operation::Detect, input)),
            Command::Grammar(input) => Some((Operation::GrammarCheck, input)),
            Command::Plagiarism(input) => Some((Operation::PlagiarismCheck, input)),
            Command::Translate(input) => Some((Operation::Translate, input)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Light,
    Dark,
    Toggle,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "integrity=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fixture_source(cli: &Cli) -> Arc<dyn FixtureSource> {
    match &cli.fixtures {
        Some(dir) => Arc::new(DirFixtures::new(dir)),
        None => Arc::new(EmbeddedFixtures),
    }
}

fn build_transport(cli: &Cli, fixtures: Arc<dyn FixtureSource>) -> Arc<dyn Transport> {
    let http: Arc<dyn Transport> = Arc::new(HttpTransport::new(cli.base_url.as_str()));
    if !cli.mock {
        return http;
    }
    Arc::new(MockResponder::new(fixtures, http))
}

/// Humanize refuses to run until responsible use is accepted. The other text
/// tools run anyway and only show the notice.
fn check_responsible_use(operation: Operation, accepted: bool) -> Result<()> {
    if accepted {
        return Ok(());
    }
    if operation == Operation::Humanize {
        bail!(RESPONSIBLE_USE_REQUIRED);
    }
    eprintln!("notice: {RESPONSIBLE_USE_NOTICE}\n");
    Ok(())
}

fn print_highlighted(text: &str, result: &Value) {
    let matches = highlight::matches_from(result);
    let segments = highlight::segments(text, &matches);
    println!("\n{}", highlight::render(&segments));
}

fn read_text(input: &TextInput) -> Result<String> {
    let text = match (&input.text, &input.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    if text.trim().is_empty() {
        bail!("text must not be empty");
    }
    Ok(text)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    Ok(Attachment { filename, bytes })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let db = cli
        .db
        .clone()
        .unwrap_or_else(|| default_db_path().to_string_lossy().into_owned());
    let settings = Settings::open(&db)?;
    let mut prefs = Preferences::load(&settings, false)?;

    // Local-only commands
    match &cli.command {
        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => prefs.theme(),
                ThemeAction::Light => {
                    prefs.set_theme(Theme::Light)?;
                    Theme::Light
                }
                ThemeAction::Dark => {
                    prefs.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
                ThemeAction::Toggle => prefs.toggle_theme()?,
            };
            println!("{theme}");
            return Ok(());
        }
        Command::AcceptResponsibleUse => {
            prefs.accept_responsible_use()?;
            println!("Responsible use accepted.");
            return Ok(());
        }
        _ => {}
    }

    let fixtures = fixture_source(&cli);
    let client = ApiClient::new(build_transport(&cli, fixtures.clone()));

    // Retry notices go to stderr as they happen
    let mut events = client.events().subscribe();
    let notices = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            eprintln!("warning: {}", event.notice());
        }
    });

    let result = run(&cli.command, &client, &prefs, fixtures.as_ref()).await;
    notices.abort();

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    command: &Command,
    client: &ApiClient,
    prefs: &Preferences<'_>,
    fixtures: &dyn FixtureSource,
) -> Result<()> {
    if let Some((operation, input)) = command.text_tool() {
        if input.sample {
            let sample = sample::load(fixtures, operation)
                .await
                .context("failed to load sample data")?;
            println!("{}\n", sample.input);
            print_json(&sample.result)?;
            if operation == Operation::PlagiarismCheck {
                print_highlighted(&sample.input, &sample.result);
            }
            return Ok(());
        }
        check_responsible_use(operation, prefs.responsible_use_accepted())?;
    }

    let value = match command {
        Command::Humanize(input) => client.humanize(&read_text(input)?).await?,
        Command::Detect(input) => client.check_ai(&read_text(input)?).await?,
        Command::Grammar(input) => client.check_grammar(&read_text(input)?).await?,
        Command::Translate(input) => client.translate_text(&read_text(input)?).await?,
        Command::Plagiarism(input) => {
            let text = read_text(input)?;
            let result = client.check_plagiarism(&text).await?;
            print_json(&result)?;
            print_highlighted(&text, &result);
            return Ok(());
        }
        Command::Chat => client.chat_respond().await?,
        Command::Loyalty => client.loyalty_summary().await?,
        Command::History => client.history().await?,
        Command::Login { email, password } => client.login(email, password).await?,
        Command::Register { email, password } => client.register(email, password).await?,
        Command::VerifyEmail => client.verify_email().await?,
        Command::ForgotPassword { email } => client.forgot_password(email).await?,
        Command::ResetPassword { password } => client.reset_password(password).await?,
        Command::TwoFactor { code } => client.enable_two_factor(code).await?,
        Command::MagicLink { email } => client.send_magic_link(email).await?,
        Command::Feedback {
            rating,
            text,
            video,
        } => {
            let video = match video {
                Some(path) => Some(read_attachment(path).await?),
                None => None,
            };
            let payload = FeedbackPayload {
                rating: *rating,
                text: text.clone(),
                video,
            };
            client.send_feedback(&payload).await?
        }
        Command::Theme { .. } | Command::AcceptResponsibleUse => return Ok(()),
    };

    print_json(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use integrity::client::RetryPolicy;
    use integrity::error::ApiError;
    use integrity::transport::scripted::{Reply, ScriptedTransport};

    // Port 9 (discard) on localhost is closed, so anything reaching HTTP fails.
    const CLOSED_ORIGIN: &str = "http://127.0.0.1:9";

    fn cli(mock: bool, fixtures: Option<PathBuf>) -> Cli {
        Cli {
            command: Command::History,
            mock,
            base_url: CLOSED_ORIGIN.to_string(),
            fixtures,
            db: None,
            verbose: false,
        }
    }

    fn client_for(cli: &Cli) -> ApiClient {
        ApiClient::new(build_transport(cli, fixture_source(cli)))
            .with_policy(RetryPolicy::immediate())
    }

    fn input(text: &str) -> TextInput {
        TextInput {
            text: Some(text.to_string()),
            file: None,
            sample: false,
        }
    }

    fn sample_input() -> TextInput {
        TextInput {
            text: None,
            file: None,
            sample: true,
        }
    }

    // ── Argument parsing ──────────────────────────────────────────

    #[test]
    fn mock_env_accepts_one_and_zero() {
        // Only this test touches INTEGRITY_MOCK.
        unsafe { std::env::set_var("INTEGRITY_MOCK", "1") };
        let on = Cli::try_parse_from(["integrity", "history"]);
        unsafe { std::env::set_var("INTEGRITY_MOCK", "0") };
        let off = Cli::try_parse_from(["integrity", "history"]);
        unsafe { std::env::remove_var("INTEGRITY_MOCK") };

        assert!(on.unwrap().mock);
        assert!(!off.unwrap().mock);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "integrity",
            "history",
            "--mock",
            "--fixtures",
            "/tmp/fixtures",
            "--base-url",
            "http://backend:8080",
        ])
        .unwrap();
        assert!(cli.mock);
        assert_eq!(cli.fixtures, Some(PathBuf::from("/tmp/fixtures")));
        assert_eq!(cli.base_url, "http://backend:8080");
        assert!(matches!(cli.command, Command::History));
    }

    #[test]
    fn sample_conflicts_with_text() {
        assert!(Cli::try_parse_from(["integrity", "humanize", "--sample", "draft"]).is_err());
        let cli = Cli::try_parse_from(["integrity", "humanize", "--sample"]).unwrap();
        assert!(matches!(cli.command, Command::Humanize(TextInput { sample: true, .. })));
    }

    #[test]
    fn feedback_rating_is_bounded() {
        assert!(Cli::try_parse_from(["integrity", "feedback", "--rating", "0"]).is_err());
        assert!(Cli::try_parse_from(["integrity", "feedback", "--rating", "6"]).is_err());
        assert!(Cli::try_parse_from(["integrity", "feedback", "--rating", "5"]).is_ok());
    }

    // ── Transport selection ───────────────────────────────────────

    #[tokio::test]
    async fn mock_mode_answers_from_fixtures() {
        let history = client_for(&cli(true, None)).history().await.unwrap();
        assert_eq!(history.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn without_mock_requests_go_to_the_backend() {
        let err = client_for(&cli(false, None)).history().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn fixtures_dir_replaces_embedded_set() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("humanize_output.json"),
            r#"{"humanizedText": "from disk"}"#,
        )
        .unwrap();
        let client = client_for(&cli(true, Some(dir.path().to_path_buf())));
        let result = client.humanize("draft").await.unwrap();
        assert_eq!(result["humanizedText"], "from disk");
    }

    // ── Input checks ──────────────────────────────────────────────

    #[test]
    fn blank_text_is_rejected() {
        let err = read_text(&input("  \n\t ")).unwrap_err();
        assert_eq!(err.to_string(), "text must not be empty");
    }

    #[test]
    fn text_is_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        std::fs::write(&path, "an essay").unwrap();
        let from_file = TextInput {
            text: None,
            file: Some(path),
            sample: false,
        };
        assert_eq!(read_text(&from_file).unwrap(), "an essay");
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        let from_file = TextInput {
            text: None,
            file: Some(path),
            sample: false,
        };
        assert!(read_text(&from_file).is_err());
    }

    // ── Responsible use and samples ───────────────────────────────

    #[tokio::test]
    async fn humanize_refuses_until_responsible_use_is_accepted() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = ApiClient::new(transport.clone());
        let settings = Settings::in_memory().unwrap();
        let prefs = Preferences::load(&settings, false).unwrap();

        let err = run(&Command::Humanize(input("draft")), &client, &prefs, &EmbeddedFixtures)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), RESPONSIBLE_USE_REQUIRED);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn humanize_runs_once_accepted() {
        let transport = Arc::new(ScriptedTransport::new(vec![Reply::ok(
            r#"{"humanizedText": "done"}"#,
        )]));
        let client = ApiClient::new(transport.clone());
        let settings = Settings::in_memory().unwrap();
        let mut prefs = Preferences::load(&settings, false).unwrap();
        prefs.accept_responsible_use().unwrap();

        run(&Command::Humanize(input("draft")), &client, &prefs, &EmbeddedFixtures)
            .await
            .unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn other_text_tools_run_without_acceptance() {
        let transport = Arc::new(ScriptedTransport::new(vec![Reply::ok(r#"{"score": 90}"#)]));
        let client = ApiClient::new(transport.clone());
        let settings = Settings::in_memory().unwrap();
        let prefs = Preferences::load(&settings, false).unwrap();

        run(&Command::Grammar(input("draft")), &client, &prefs, &EmbeddedFixtures)
            .await
            .unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn sample_sends_no_request() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = ApiClient::new(transport.clone());
        let settings = Settings::in_memory().unwrap();
        let prefs = Preferences::load(&settings, false).unwrap();

        for command in [
            Command::Humanize(sample_input()),
            Command::Plagiarism(sample_input()),
        ] {
            run(&command, &client, &prefs, &EmbeddedFixtures)
                .await
                .unwrap();
        }
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn only_humanize_is_gated() {
        assert!(check_responsible_use(Operation::Humanize, false).is_err());
        assert!(check_responsible_use(Operation::Humanize, true).is_ok());
        assert!(check_responsible_use(Operation::Detect, false).is_ok());
        assert!(check_responsible_use(Operation::Translate, false).is_ok());
    }
}
