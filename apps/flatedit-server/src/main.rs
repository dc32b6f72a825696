//! flatedit-server: stdio tool server entry point.

mod config;

use std::sync::Arc;

use clap::Parser;
use flatedit_handlers::{Dispatcher, TokioFileAccess, ToolHandlerContext};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServerConfig;

#[derive(Parser)]
#[command(name = "flatedit-server")]
#[command(about = "Whitespace-insensitive fuzzy text locator and editor, served over stdio")]
struct Cli {
    /// Root directory relative paths are resolved against. Overrides
    /// `flatedit.toml`/`FLATEDIT_PROJECT_ROOT` when given.
    #[arg(long)]
    project_root: Option<std::path::PathBuf>,
}

fn init_logging(log_level: &str) {
    let level: tracing::Level = log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // Always write to stderr: stdout is reserved for the framed protocol.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load()?;
    if let Some(project_root) = cli.project_root {
        config.project_root = project_root;
    }

    init_logging(&config.log_level);
    tracing::info!(project_root = %config.project_root.display(), "starting flatedit server");

    let file_access = Arc::new(TokioFileAccess);
    let context = Arc::new(ToolHandlerContext::new(file_access, config.project_root));
    let dispatcher = Arc::new(Dispatcher::new());

    flatedit_transport::start_stdio_server(dispatcher, context).await?;

    tracing::info!("flatedit server stopped");
    Ok(())
}
