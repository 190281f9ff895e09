mod agent;
mod api_key;
mod app;
mod cli;
mod constants;
mod gemini;
mod logging;
mod provider;
mod tools;
mod transcript;

use anyhow::Result;

use crate::app::run_app;
use crate::cli::Config;
use crate::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::from_args();
    run_app(config).await
}
