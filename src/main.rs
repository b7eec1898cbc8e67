use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trip_planner::calculator::{calculate_daily_budget, calculate_total};
use trip_planner::config::optional;
use trip_planner::currency::CurrencyError;
use trip_planner::llm::{Agent, AgentEvent, FunctionRegistry, LlmProvider};
use trip_planner::tools::{CurrencyConverterTool, ExpenseCalculatorTool};
use trip_planner::{ConfigError, ConfigStore, Credentials, ModelLoader};

#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(about = "Trip planning helpers: model loading, currency conversion, budgeting")]
#[command(version)]
struct Cli {
    /// YAML configuration file (defaults to $TRIP_PLANNER_CONFIG or config/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the configured model for a provider and print it
    Load {
        /// groq or openai
        #[arg(long, default_value = "openai")]
        provider: String,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    /// Sum trip costs and split them per day
    Budget {
        /// Number of days in the trip
        #[arg(long)]
        days: i64,
        /// Individual costs
        costs: Vec<f64>,
    },
    /// Ask the model, letting it call the calculator and currency tools
    Chat {
        prompt: String,
        /// groq or openai
        #[arg(long, default_value = "openai")]
        provider: String,
        /// System prompt
        #[arg(long)]
        system: Option<String>,
        #[arg(long, default_value_t = 10)]
        max_iterations: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "trip_planner=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(ConfigStore::discover);

    match cli.command {
        Command::Load { provider } => {
            let config = ConfigStore::load(&config_path)?;
            let loader =
                ModelLoader::from_provider_name(&provider, config, Credentials::from_env())?;
            let client = loader.load_llm()?;
            println!("{}: {}", client.provider(), client.model_name());
        }
        Command::Convert { amount, from, to } => {
            let config = ConfigStore::load(&config_path)
                .map_err(|e| debug!(error = %e, "no configuration, using defaults"))
                .ok();
            let tool = currency_tool(currency_base_url(config.as_ref())?)?;
            let converted = tool.converter().convert(amount, &from, &to).await?;
            println!(
                "{:.2} {} = {:.2} {}",
                amount,
                from.to_ascii_uppercase(),
                converted,
                to.to_ascii_uppercase()
            );
        }
        Command::Budget { days, costs } => {
            let total = calculate_total(&costs);
            println!("Total: {:.2}", total);
            println!("Per day: {:.2}", calculate_daily_budget(total, days));
        }
        Command::Chat {
            prompt,
            provider,
            system,
            max_iterations,
        } => {
            let config = ConfigStore::load(&config_path)?;
            let currency = currency_tool(currency_base_url(Some(&config))?);
            let loader =
                ModelLoader::from_provider_name(&provider, config, Credentials::from_env())?;
            let client = loader.load_llm()?;

            let mut registry = FunctionRegistry::new();
            ExpenseCalculatorTool::register(&mut registry)?;
            match currency {
                Ok(tool) => tool.register(&mut registry)?,
                Err(e) => warn!(error = %e, "currency tool disabled"),
            }

            let declarations = registry.get_declarations();
            let generation_config = client.generation_config().clone();
            let mut agent = Agent::new(
                Box::new(client),
                Box::new(registry),
                declarations,
                generation_config,
                system,
            )
            .with_max_iterations(max_iterations);

            let response = agent.run(prompt).await?;
            for event in &response.events {
                match event {
                    AgentEvent::ToolExecutionStarted { name, input, .. } => {
                        println!("[Calling tool: {} with args: {}]", name, input);
                    }
                    AgentEvent::ToolExecutionFailed { name, error, .. } => {
                        println!("[Tool {} failed: {}]", name, error);
                    }
                    _ => {}
                }
            }
            println!("{}", response.text);
        }
    }

    Ok(())
}

/// `currency.base_url`, if set; a non-string value is an error
fn currency_base_url(config: Option<&ConfigStore>) -> Result<Option<String>, ConfigError> {
    let Some(config) = config else {
        return Ok(None);
    };
    Ok(optional(config.get_str("currency.base_url"))?.map(str::to_string))
}

/// Currency tool from `EXCHANGE_RATE_API_KEY`
fn currency_tool(base_url: Option<String>) -> Result<CurrencyConverterTool, CurrencyError> {
    let tool = CurrencyConverterTool::from_env()?;
    Ok(match base_url {
        Some(base_url) => CurrencyConverterTool::with_converter(
            tool.converter().clone().with_base_url(base_url),
        ),
        None => tool,
    })
}
