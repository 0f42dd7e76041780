use clap::{ Args as ClapArgs, Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the chat relay server (default).
    Serve,
    /// Chat with a running relay from the terminal.
    Chat(ChatArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Optional directory of static site files served for every non-API path.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    // --- Chat LLM Provider Args ---
    /// API key for the Gemini API. Chat requests fail with a configuration error while unset.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Model name for chat completion (e.g., gemini-1.5-flash)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Base URL for the Gemini API (e.g., https://generativelanguage.googleapis.com)
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Seconds to wait for the upstream model before giving up on a request.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "30")]
    pub upstream_timeout_secs: u64,

    /// Optional JSON file overriding the built-in persona and instructions.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChatArgs {
    /// Full URL of the relay endpoint.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:4000/api/chat")]
    pub relay_url: String,

    /// Seconds to wait for the relay before showing the apology message.
    #[arg(long, env = "RELAY_TIMEOUT_SECS", default_value = "45")]
    pub timeout_secs: u64,
}
