//! CLI binary for edgequake-pdfchat.
//!
//! Loads one or more PDFs into a session, then either answers a single
//! `--ask` question or runs a line-oriented chat loop on stdin.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfchat::{
    export_to_file, transcript_json, upload, AnswerBackend, ChatConfig, ChatTurn, CitationStrategy,
    Extractor, Feedback, LlmBackend, PdfChatError, Session, DEFAULT_EXPORT_FILE,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ─────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Chat with a local PDF (ollama + llama3.2:latest)
  pdfchat report.pdf

  # Load a PDF from a URL and ask one question
  pdfchat https://arxiv.org/pdf/1706.03762 --ask "What is the BLEU score?"

  # Use another provider and model
  pdfchat --provider openai --model gpt-4.1-mini report.pdf

  # Reproduce the original chunk-position citation labels
  pdfchat --citations legacy report.pdf

CHAT COMMANDS:
  /load <path-or-url>   Load another PDF and make it active
  /use <name>           Ask questions against a loaded PDF
  /docs                 List loaded PDFs
  /history              Show the conversation so far
  /clear                Clear the chat history
  /export [file]        Save the history (default: chat_history.txt)
  /rate good|bad        Rate the last response
  /help                 Show this list
  /quit                 Leave

ENVIRONMENT VARIABLES:
  EDGEQUAKE_LLM_PROVIDER  Provider when --provider/--model are not given
  EDGEQUAKE_MODEL         Model paired with EDGEQUAKE_LLM_PROVIDER
  PDFIUM_LIB_PATH         Directory or file of an existing libpdfium
"#;

/// Chat with PDF documents using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdfchat",
    version,
    about = "Ask questions about PDF documents and get answers with page citations",
    long_about = "Load PDF documents (local files or URLs), ask natural-language questions about \
their content, and get answers from a language model with a page citation guess. Uses \
ollama with llama3.2:latest unless told otherwise.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs to load at startup.
    inputs: Vec<String>,

    /// Ask a single question, print the answer and exit.
    #[arg(long)]
    ask: Option<String>,

    /// LLM model ID.
    #[arg(long, env = "PDFCHAT_MODEL")]
    model: Option<String>,

    /// LLM provider: ollama, openai, anthropic, gemini, azure.
    #[arg(long, env = "PDFCHAT_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDFCHAT_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max LLM output tokens per answer.
    #[arg(long, env = "PDFCHAT_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Path to a text file containing a system prompt.
    #[arg(long, env = "PDFCHAT_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Citation labelling: header (true page numbers) or legacy (chunk position).
    #[arg(long, env = "PDFCHAT_CITATIONS", value_enum, default_value = "header")]
    citations: CitationArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFCHAT_PASSWORD")]
    password: Option<String>,

    /// Directory or file of libpdfium; defaults to the system library path.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFCHAT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// With --ask, print the answered turn as JSON.
    #[arg(long, env = "PDFCHAT_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFCHAT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except answers and errors.
    #[arg(short, long, env = "PDFCHAT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CitationArg {
    Header,
    Legacy,
}

impl From<CitationArg> for CitationStrategy {
    fn from(v: CitationArg) -> Self {
        match v {
            CitationArg::Header => CitationStrategy::PageHeader,
            CitationArg::Legacy => CitationStrategy::Legacy,
        }
    }
}

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ask(String),
    Load(String),
    Use(String),
    Docs,
    History,
    Clear,
    Export(PathBuf),
    Rate(Feedback),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((n, a)) => (n, a.trim()),
        None => (rest, ""),
    };

    match (name.to_lowercase().as_str(), arg) {
        ("load" | "upload", "") => Command::Invalid("usage: /load <path-or-url>".into()),
        ("load" | "upload", a) => Command::Load(a.to_string()),
        ("use" | "select", "") => Command::Invalid("usage: /use <name>".into()),
        ("use" | "select", a) => Command::Use(a.to_string()),
        ("docs" | "list", _) => Command::Docs,
        ("history", _) => Command::History,
        ("clear", _) => Command::Clear,
        ("export" | "download", "") => Command::Export(PathBuf::from(DEFAULT_EXPORT_FILE)),
        ("export" | "download", a) => Command::Export(PathBuf::from(a)),
        ("rate", a) => match a.parse::<Feedback>() {
            Ok(f) => Command::Rate(f),
            Err(e) => Command::Invalid(e),
        },
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        (other, _) => Command::Invalid(format!("unknown command '/{other}' (try /help)")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would interleave with the chat, so the default is warn.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    let extractor = tokio::task::block_in_place(|| Extractor::from_config(&config))
        .context("Failed to load the PDF engine")?;
    let backend = LlmBackend::from_config(&config).context("Failed to set up the LLM provider")?;

    let mut session = Session::new(config.citation_strategy);

    for input in &cli.inputs {
        load_into(&mut session, input, &extractor, &config, cli.quiet).await;
    }

    // ── One-shot mode ────────────────────────────────────────────────────
    if let Some(ref question) = cli.ask {
        let turn = ask_with_spinner(&mut session, &backend, question, cli.quiet)
            .await
            .context("Question failed")?;
        if cli.json {
            let json = serde_json::to_string_pretty(&turn).context("Failed to serialise answer")?;
            println!("{json}");
        } else {
            print_answer(&turn);
        }
        return Ok(());
    }

    // ── Chat loop ────────────────────────────────────────────────────────
    if !cli.quiet {
        eprintln!(
            "{} {}  {}",
            cyan("◆"),
            bold(&format!("pdfchat — {}", backend.model())),
            dim("type /help for commands")
        );
        if session.active_document().is_none() {
            eprintln!("Please load a PDF with /load <path-or-url> to get started.");
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !cli.quiet {
            let prompt = match session.active_document() {
                Some(doc) => format!("{} > ", doc.name()),
                None => "> ".to_string(),
            };
            eprint!("{}", bold(&prompt));
            io::stderr().flush().ok();
        }

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => eprintln!("{}", AFTER_HELP.split("CHAT COMMANDS:").nth(1).unwrap_or("")),
            Command::Invalid(msg) => eprintln!("{}", red(&msg)),
            Command::Load(input) => {
                load_into(&mut session, &input, &extractor, &config, cli.quiet).await;
            }
            Command::Use(name) => match session.select(&name) {
                Ok(doc) => eprintln!("Selected PDF: {}", bold(doc.name())),
                Err(e) => eprintln!("{}", red(&e.to_string())),
            },
            Command::Docs => {
                let active = session.active_document().map(|d| d.name().to_string());
                let names: Vec<&str> = session.document_names().collect();
                if names.is_empty() {
                    eprintln!("No PDFs uploaded yet.");
                }
                for name in names {
                    let marker = if active.as_deref() == Some(name) { "*" } else { " " };
                    let pages = session.document(name).map_or(0, |d| d.page_count());
                    eprintln!("{marker} {name}  {}", dim(&format!("{pages} pages")));
                }
            }
            Command::History => {
                for turn in session.history() {
                    eprintln!("{} {}", bold("You:"), turn.question());
                    print_answer(turn);
                }
            }
            Command::Clear => {
                session.clear_history();
                eprintln!("{} Chat history cleared!", green("✔"));
            }
            Command::Export(path) => {
                if session.history().is_empty() {
                    eprintln!("Nothing to export yet.");
                    continue;
                }
                match export_to_file(session.history(), &path) {
                    Ok(()) => eprintln!("{} Saved chat history to {}", green("✔"), path.display()),
                    Err(e) => eprintln!("{}", red(&e.to_string())),
                }
            }
            Command::Rate(feedback) => match session.rate_last(feedback) {
                Ok(ack) => eprintln!("{ack}"),
                Err(e) => eprintln!("{}", red(&e.to_string())),
            },
            Command::Ask(question) => {
                // Failures leave the unanswered turn in the history.
                match ask_with_spinner(&mut session, &backend, &question, cli.quiet).await {
                    Ok(turn) => print_answer(&turn),
                    Err(PdfChatError::NoDocument) => {
                        eprintln!("Please upload a PDF file to get started.")
                    }
                    Err(e) => eprintln!("{}", red(&format!("An error occurred: {e}"))),
                }
            }
        }
    }

    if !cli.quiet && !session.history().is_empty() {
        if let Ok(json) = transcript_json(session.history()) {
            tracing::debug!("Session transcript:\n{}", json);
        }
    }

    Ok(())
}

/// Map CLI args to `ChatConfig`.
async fn build_config(cli: &Cli) -> Result<ChatConfig> {
    let mut builder = ChatConfig::builder()
        .citation_strategy(cli.citations.into())
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref path) = cli.pdfium_lib_path {
        builder = builder.pdfium_lib_path(path);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

/// Load `input` into the session, reporting the outcome on stderr.
async fn load_into(
    session: &mut Session,
    input: &str,
    extractor: &Extractor,
    config: &ChatConfig,
    quiet: bool,
) {
    match upload(session, input, extractor, config).await {
        Ok(name) => {
            if !quiet {
                let pages = session.document(&name).map_or(0, |d| d.page_count());
                eprintln!("{} Uploaded {} {}", green("✔"), bold(&name), dim(&format!("({pages} pages)")));
            }
        }
        Err(e) if e.is_ingestion() => {
            eprintln!("{} Could not read a PDF from '{}'.", red("✗"), input);
            eprintln!("{}", dim(&e.to_string()));
        }
        Err(e) => eprintln!("{} Failed to load '{}': {}", red("✗"), input, e),
    }
}

/// Ask a question while a spinner runs on stderr; returns a copy of the turn.
async fn ask_with_spinner<B: AnswerBackend>(
    session: &mut Session,
    backend: &B,
    question: &str,
    quiet: bool,
) -> Result<ChatTurn, PdfChatError> {
    let spinner = (!quiet).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Generating response…");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = session.ask(backend, question).await.cloned();

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    result
}

fn print_answer(turn: &ChatTurn) {
    if turn.is_answered() {
        println!("{} {}", bold("Bot:"), turn.answer());
        println!("{}", dim(&format!("Citation: {}", turn.citation_label())));
    } else {
        println!("{}", dim("Bot: (no answer)"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse_command("  What grew?  "),
            Command::Ask("What grew?".into())
        );
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            parse_command("/load https://example.com/a.pdf"),
            Command::Load("https://example.com/a.pdf".into())
        );
        assert_eq!(parse_command("/use my report.pdf"), Command::Use("my report.pdf".into()));
        assert_eq!(parse_command("/rate good"), Command::Rate(Feedback::Good));
        assert_eq!(
            parse_command("/export out/log.txt"),
            Command::Export(PathBuf::from("out/log.txt"))
        );
    }

    #[test]
    fn export_defaults_to_chat_history_file() {
        assert_eq!(
            parse_command("/export"),
            Command::Export(PathBuf::from(DEFAULT_EXPORT_FILE))
        );
    }

    #[test]
    fn bad_commands_are_invalid() {
        assert!(matches!(parse_command("/load"), Command::Invalid(_)));
        assert!(matches!(parse_command("/rate meh"), Command::Invalid(_)));
        assert!(matches!(parse_command("/frobnicate"), Command::Invalid(_)));
    }

    #[test]
    fn quit_aliases() {
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/EXIT"), Command::Quit);
    }
}
