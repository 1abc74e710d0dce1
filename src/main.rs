mod analyzer;
mod catalog;
mod cli;
mod config;
mod error;
mod extract;
mod llm;
mod logging;
mod tools;
mod transport;
mod types;
mod uri;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use analyzer::PdfAnalyzer;
use cli::{Cli, Command};
use config::AppConfig;
use extract::PdfTextExtractor;
use llm::RemoteModelClient;
use tools::create_default_router;
use transport::ReqwestTransport;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging.level)?;

    // No credential, no service: this is the only fatal configuration error.
    let settings = config.settings().inspect_err(|e| error!("{}", e))?;
    info!("Using default Gemini model: {}", settings.default_model);

    let client = RemoteModelClient::new(Arc::new(ReqwestTransport::new()), &settings);
    let analyzer = Arc::new(PdfAnalyzer::new(
        client,
        Arc::new(PdfTextExtractor),
        settings.default_model.clone(),
    ));
    let router = create_default_router(analyzer);

    let Some(invocation) = cli.command.to_invocation()? else {
        let definitions = serde_json::to_string_pretty(&router.definitions())
            .context("Failed to serialize tool definitions")?;
        println!("{}", definitions);
        return Ok(ExitCode::SUCCESS);
    };

    let result = router.call(&invocation).await;

    match cli.command {
        Command::Call { .. } => {
            let json = serde_json::to_string(&result).context("Failed to serialize tool result")?;
            println!("{}", json);
        }
        _ => println!("{}", result.text),
    }

    Ok(if result.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
