use clap::Parser;

use crate::config::AppConfig;

#[derive(Parser, Debug, Default)]
#[command(name = "farmacia-web")]
#[command(about = "Farmácia web front-end - storefront and back office for the pharmacy API")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Port to listen on (overrides FARMACIA_PORT/PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Base URL of the pharmacy API (overrides FARMACIA_BACKEND_URL)")]
    pub backend_url: Option<String>,
}

impl Cli {
    /// Command-line flags win over the environment
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            config = config.with_backend_url(url);
        }
        config
    }
}
