use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

use pageflow_config::PageConfig;
use pageflow_request::HttpRequester;
use pageflow_runtime::{
  Collaborators, ConfirmPrompt, Engine, FsPageLoader, Interaction, JsonView, NoopObserver,
  OperationRef, OperationScope, PageLoader,
};

/// Pageflow - schema-driven form and table pages
#[derive(Parser)]
#[command(name = "pageflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Directory holding `<page>.json` schemas and an optional `index.json` (default: ~/.pageflow/pages)
  #[arg(long, global = true)]
  pages_dir: Option<PathBuf>,

  /// Base URL that relative API urls resolve against
  #[arg(long, global = true)]
  api_base: Option<Url>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse and validate a page schema file
  Validate {
    /// Path to the page file (JSON)
    page_file: PathBuf,
  },

  /// List the pages in the pages directory
  List,

  /// Open a page and print its rendered tree as JSON.
  /// Source data is read from stdin when piped.
  Render {
    /// Page id
    page: String,
  },

  /// Open a page and run one of its table operations.
  /// Source data is read from stdin when piped; confirmations are then
  /// answered on the controlling terminal.
  Operate {
    /// Page id
    page: String,

    /// Index of the table step
    #[arg(long)]
    step: usize,

    /// Index in the operation list
    #[arg(long)]
    operation: usize,

    /// Index inside an operation group
    #[arg(long)]
    item: Option<usize>,

    /// Run a row operation against this row
    #[arg(long, conflicts_with = "rows")]
    row: Option<usize>,

    /// Run a multirow operation against these rows
    #[arg(long, value_delimiter = ',')]
    rows: Option<Vec<usize>>,

    /// Accept every confirmation without asking (needed with piped source
    /// data when no terminal is attached)
    #[arg(long, short)]
    yes: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let pages_dir = match cli.pages_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".pageflow")
      .join("pages"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::Validate { page_file }) => validate(page_file),
    Some(Commands::List) => rt.block_on(list(pages_dir)),
    Some(Commands::Render { page }) => rt.block_on(render(page, pages_dir, cli.api_base)),
    Some(Commands::Operate {
      page,
      step,
      operation,
      item,
      row,
      rows,
      yes,
    }) => {
      let scope = match (row, rows) {
        (Some(row), _) => OperationScope::Row { row },
        (None, Some(rows)) => OperationScope::Multirow { rows },
        (None, None) => OperationScope::Table,
      };
      let reference = OperationRef {
        step,
        scope,
        index: operation,
        item,
      };
      rt.block_on(operate(page, reference, yes, pages_dir, cli.api_base))
    }
    None => {
      println!("pageflow - use --help to see available commands");
      Ok(())
    }
  }
}

fn validate(page_file: PathBuf) -> Result<()> {
  let content = std::fs::read_to_string(&page_file)
    .with_context(|| format!("failed to read page file: {}", page_file.display()))?;
  let page = PageConfig::from_json(&content)
    .with_context(|| format!("invalid page file: {}", page_file.display()))?;

  let kinds: Vec<&str> = page.steps.iter().map(|step| step.type_name()).collect();
  println!("{}: ok ({} steps: {})", page_file.display(), kinds.len(), kinds.join(" -> "));
  Ok(())
}

async fn list(pages_dir: PathBuf) -> Result<()> {
  let loader = FsPageLoader::new(&pages_dir);
  let pages = loader
    .load_page_list()
    .await
    .with_context(|| format!("failed to list pages in {}", pages_dir.display()))?;
  for page in pages {
    println!("{}\t{}", page.id, page.name);
  }
  Ok(())
}

fn engine(pages_dir: PathBuf, api_base: Option<Url>, assume_yes: bool) -> Engine {
  let answers = AnswerSource::for_stdin(io::stdin().is_terminal());
  let requester = match api_base {
    Some(base) => HttpRequester::new().with_base_url(base),
    None => HttpRequester::new(),
  };
  Engine::new(Collaborators {
    pages: Arc::new(FsPageLoader::new(pages_dir)),
    requester: Arc::new(requester),
    interaction: Arc::new(TerminalInteraction { assume_yes, answers }),
    observer: Arc::new(NoopObserver),
  })
}

async fn render(page: String, pages_dir: PathBuf, api_base: Option<Url>) -> Result<()> {
  let source = read_source_from_stdin()?;
  let mut engine = engine(pages_dir, api_base, false);
  engine
    .open(&page, source)
    .await
    .with_context(|| format!("failed to open page '{page}'"))?;

  let rendered = engine.render(&JsonView).unwrap_or_default();
  println!("{}", serde_json::to_string_pretty(&rendered)?);
  Ok(())
}

async fn operate(
  page: String,
  reference: OperationRef,
  assume_yes: bool,
  pages_dir: PathBuf,
  api_base: Option<Url>,
) -> Result<()> {
  let source = read_source_from_stdin()?;
  let mut engine = engine(pages_dir, api_base, assume_yes);
  engine
    .open(&page, source)
    .await
    .with_context(|| format!("failed to open page '{page}'"))?;

  let cancel = CancellationToken::new();
  let ctrl_c = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      ctrl_c.cancel();
    }
  });

  let outcome = engine
    .invoke_operation(&reference, &cancel)
    .await
    .with_context(|| format!("operation {reference} failed"))?;
  eprintln!("Operation finished: {}", serde_json::to_string(&outcome)?);

  let rendered = engine.render(&JsonView).unwrap_or_default();
  println!("{}", serde_json::to_string_pretty(&rendered)?);
  Ok(())
}

/// Where confirmation answers come from. Piped stdin carries source data,
/// so answers are read from the controlling terminal instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerSource {
  Stdin,
  Tty,
}

impl AnswerSource {
  fn for_stdin(is_terminal: bool) -> Self {
    if is_terminal { Self::Stdin } else { Self::Tty }
  }
}

/// Dialogs on stderr, answers from the terminal.
struct TerminalInteraction {
  assume_yes: bool,
  answers: AnswerSource,
}

impl TerminalInteraction {
  async fn ask(&self, question: &str) -> bool {
    let mut stderr = tokio::io::stderr();
    if stderr.write_all(question.as_bytes()).await.is_err() {
      return false;
    }
    let _ = stderr.flush().await;

    match self.answers {
      AnswerSource::Stdin => read_answer(BufReader::new(tokio::io::stdin())).await,
      AnswerSource::Tty => match tokio::fs::File::open("/dev/tty").await {
        Ok(tty) => read_answer(BufReader::new(tty)).await,
        Err(e) => {
          eprintln!("no terminal to answer on ({e}); pass --yes to accept confirmations");
          false
        }
      },
    }
  }
}

/// Reads one line; only `y` or `yes` accepts.
async fn read_answer<R: AsyncBufRead + Unpin>(mut reader: R) -> bool {
  let mut answer = String::new();
  match reader.read_line(&mut answer).await {
    Ok(0) | Err(_) => false,
    Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
  }
}

#[async_trait]
impl Interaction for TerminalInteraction {
  async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
    if self.assume_yes {
      eprintln!("{} [{}]", prompt.title, prompt.ok_text);
      return true;
    }
    self
      .ask(&format!("{} ({} = y / {} = n): ", prompt.title, prompt.ok_text, prompt.cancel_text))
      .await
  }

  async fn acknowledge(&self, message: &str, success: bool) -> bool {
    let kind = if success { "success" } else { "failure" };
    eprintln!("[{kind}] {message}");
    true
  }

  async fn navigate(&self, url: &str) {
    eprintln!("Navigate: {url}");
  }

  async fn open(&self, url: &str) {
    eprintln!("Open: {url}");
  }
}

fn read_source_from_stdin() -> Result<serde_json::Value> {
  if io::stdin().is_terminal() {
    return Ok(serde_json::json!({}));
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read source data from stdin")?;

  if input.trim().is_empty() {
    return Ok(serde_json::json!({}));
  }
  let source: serde_json::Value =
    serde_json::from_str(&input).context("failed to parse source data JSON from stdin")?;
  if !source.is_object() {
    bail!("source data must be a JSON object");
  }
  Ok(source)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_piped_stdin_answers_from_tty() {
    assert_eq!(AnswerSource::for_stdin(false), AnswerSource::Tty);
    assert_eq!(AnswerSource::for_stdin(true), AnswerSource::Stdin);
  }

  #[tokio::test]
  async fn test_read_answer() {
    assert!(read_answer(&b"y\n"[..]).await);
    assert!(read_answer(&b" YES \n"[..]).await);
    assert!(!read_answer(&b"n\n"[..]).await);
    // EOF declines.
    assert!(!read_answer(&b""[..]).await);
  }

  #[tokio::test]
  async fn test_assume_yes_skips_reading() {
    let interaction = TerminalInteraction {
      assume_yes: true,
      answers: AnswerSource::Tty,
    };
    let prompt = ConfirmPrompt {
      title: "Delete?".to_string(),
      ok_text: "OK".to_string(),
      cancel_text: "Cancel".to_string(),
    };
    assert!(interaction.confirm(&prompt).await);
  }
}
