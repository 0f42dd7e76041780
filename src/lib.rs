pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod history;
pub mod widget;

use agent::RelayAgent;
use cli::{ Args, Command, ServeArgs };
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Some(Command::Chat(chat_args)) => widget::terminal::run_chat(chat_args).await,
        Some(Command::Serve) | None => serve(args.serve).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Gemini API Key Configured: {}", args.gemini_api_key.as_deref().map_or(false, |k| !k.trim().is_empty()));
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("adapter default"));
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("adapter default"));
    info!("Upstream Timeout: {}s", args.upstream_timeout_secs);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("Static Dir: {}", args.static_dir.as_deref().unwrap_or("disabled"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = Arc::new(RelayAgent::from_args(&args)?);
    let server = Server::new(agent, args);
    server.run().await?;

    Ok(())
}
