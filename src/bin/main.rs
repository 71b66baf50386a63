use financial_twin::{config::AppConfig, AssistantPipeline};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:\n  assistant <message...>\n  assistant check-budget <amount> <category>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = AppConfig::from_env()?;
    let pipeline = AssistantPipeline::from_config(&config)?;

    if args[0] == "check-budget" {
        let (Some(amount), Some(category)) = (args.get(1), args.get(2)) else {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        };
        let amount = Decimal::from_str(amount)?;

        let decision = pipeline.check_budget(amount, category);
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    let message = args.join(" ");
    info!(message = %message, "Running chat pipeline");

    let reply = pipeline.handle_chat(&message).await;

    println!("{}", reply.response);
    if !reply.context.is_empty() {
        println!("\nContext:");
        for (i, fact) in reply.context.iter().enumerate() {
            println!("  {}: {}", i + 1, fact);
        }
    }

    Ok(())
}
