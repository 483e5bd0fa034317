//! Health command - check that the server is reachable.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Keep checking until the server answers, using the configured retries
    #[arg(short, long)]
    pub wait: bool,
}

/// Health result for JSON output.
#[derive(Debug, Serialize)]
struct HealthOutput {
    reachable: bool,
    server_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the health command.
pub async fn run(args: HealthArgs, ctx: &Context) -> Result<()> {
    let result = if args.wait {
        langgraph_client::ClientBuilder::from_config(&ctx.config)
            .connect()
            .await
            .map(|_| ())
    } else {
        ctx.client()?.check_connection().await
    };

    let server_url = ctx.config.base_url.clone();
    let error = result.as_ref().err().map(|e| e.to_string());

    if ctx.json_output {
        let output = HealthOutput {
            reachable: error.is_none(),
            server_url,
            error: error.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let dim = Style::new().dim();
        println!("{}", style("LangGraph Server").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        match &error {
            None => {
                let green = Style::new().green();
                println!("  {} {}", dim.apply_to("Status:"), green.apply_to("● reachable"));
            }
            Some(e) => {
                let red = Style::new().red();
                println!("  {} {}", dim.apply_to("Status:"), red.apply_to("● unreachable"));
                if ctx.verbose {
                    println!("  {} {}", dim.apply_to("Error: "), e);
                }
            }
        }
        println!("  {} {}", dim.apply_to("Server:"), server_url);
    }

    if error.is_some() {
        anyhow::bail!("server at {} is unreachable", ctx.config.base_url);
    }
    Ok(())
}
