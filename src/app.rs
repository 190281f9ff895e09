use anyhow::{Context, Result};

use crate::agent::{Agent, AgentConfig};
use crate::api_key;
use crate::cli::Config;
use crate::logging::{log_info, setup_run_file_logging};
use crate::provider::{ProviderConfig, ProviderFactory};
use crate::tools::{Sandbox, ToolContext, ToolExecutor};

pub async fn run_app(config: Config) -> Result<()> {
    setup_run_file_logging().context("Failed to setup file logging")?;

    log_info(&format!(
        "Processing prompt ({} characters) against working directory {}",
        config.prompt.len(),
        config.working_dir
    ));

    let sandbox = Sandbox::new(&config.working_dir)?;
    log_info(&format!("Sandbox root: {}", sandbox.root().display()));

    let api_key = api_key::get_api_key().context("Failed to get API key")?;

    let provider = ProviderFactory::create_provider(ProviderConfig {
        model: config.model.clone(),
        api_key,
    })
    .context("Failed to initialize AI provider")?;

    log_info(&format!(
        "Using {} model: {}",
        provider.provider_name(),
        provider.model_name()
    ));

    let executor = ToolExecutor::new(ToolContext::new(sandbox), config.verbose);
    let agent_config = AgentConfig {
        max_iterations: config.max_iterations,
        verbose: config.verbose,
    };
    let mut agent = Agent::new(provider, executor, agent_config, &config.prompt);

    match agent.run().await? {
        Some(final_text) => {
            println!("Final response:\n{final_text}");
        }
        None => {
            eprintln!(
                "Reached the iteration limit ({}) without a final answer.",
                config.max_iterations
            );
        }
    }

    if let Some(summary) = agent.summarize().await {
        println!("\nSummary:\n{summary}");
    }

    log_info(&format!(
        "Run complete, transcript holds {} message(s)",
        agent.transcript().len()
    ));
    Ok(())
}
