use clap::{Parser, ValueEnum};
use anyhow::Result;
use std::process::ExitCode;
use std::time::Duration;
use template_audit::records::StripMode;
use template_audit::source::{FileSource, HttpSource, SourceText};
use template_audit::types::Layout;
use template_audit::Auditor;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Format { Text, Json }

#[derive(Parser)]
#[command(name="template-audit", version, about="Count module templates that fail to render on Liquid and Jinja")]
struct Cli {
  /// URL serving the CSV export
  #[arg(env="TEMPLATE_AUDIT_URL", default_value="http://localhost:8080")] url: String,
  /// Read <modules-dir>/<name>.csv instead of fetching the URL
  #[arg(long)] module: Option<String>,
  #[arg(long, default_value="modules")] modules_dir: String,
  /// Scalar columns before the details column (4 or 5)
  #[arg(long, default_value_t=4)] layout: usize,
  /// Only strip a real quote pair around the details column
  #[arg(long)] strict_quotes: bool,
  #[arg(long, value_enum, default_value_t=Format::Text)] format: Format,
  /// HTTP timeout
  #[arg(long, default_value_t=30)] timeout_secs: u64,
  /// Log filter used when RUST_LOG is unset
  #[arg(long, default_value="warn")] log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{e:#}");
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<()> {
  let strip = if cli.strict_quotes { StripMode::Checked } else { StripMode::Blind };
  let auditor = Auditor::standard()?.with_layout(Layout::new(cli.layout)?).with_strip_mode(strip);

  let source: Box<dyn SourceText> = match &cli.module {
    Some(name) => Box::new(FileSource::module(&cli.modules_dir, name)),
    None => Box::new(HttpSource::new(cli.url.clone(), Some(Duration::from_secs(cli.timeout_secs)))?),
  };
  let run = auditor.run(source.as_ref()).await?;

  match cli.format {
    Format::Text => print!("{}", run.report.render_text()),
    Format::Json => println!("{}", serde_json::to_string_pretty(&run.report)?),
  }
  Ok(())
}
