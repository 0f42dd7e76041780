pub mod api;

use crate::agent::RelayAgent;
use crate::cli::ServeArgs;
use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    agent: Arc<RelayAgent>,
    args: ServeArgs,
}

impl Server {
    pub fn new(agent: Arc<RelayAgent>, args: ServeArgs) -> Self {
        if !agent.is_configured() {
            warn!("Server starting without an upstream API key.");
        }
        Self { agent, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!("Starting server on: {}", self.args.server_addr);
        api::start_http_server(self.agent.clone(), &self.args).await
    }
}
