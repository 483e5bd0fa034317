//! Runs command - list, inspect and cancel runs.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use langgraph_client::{CancelAction, ListRunsQuery, Run, RunStatus};

use super::Context;

/// Arguments for the runs command.
#[derive(Args, Debug)]
pub struct RunsArgs {
    #[command(subcommand)]
    pub command: RunsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RunsCommand {
    /// List runs on a thread
    List {
        /// Thread ID
        thread: String,

        /// Maximum runs to show
        #[arg(short, long, default_value = "10")]
        limit: u32,

        /// Runs to skip
        #[arg(long, default_value = "0")]
        offset: u32,

        /// Only runs with this status
        #[arg(long, value_parser = parse_status)]
        status: Option<RunStatus>,
    },

    /// Show a run
    Get {
        /// Thread ID
        thread: String,

        /// Run ID
        run: String,
    },

    /// Cancel a run
    Cancel {
        /// Thread ID
        thread: String,

        /// Run ID
        run: String,

        /// Wait until the run has stopped
        #[arg(long)]
        wait: bool,

        /// Roll back instead of interrupting
        #[arg(long)]
        rollback: bool,
    },
}

/// Run the runs command.
pub async fn run(args: RunsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    match args.command {
        RunsCommand::List {
            thread,
            limit,
            offset,
            status,
        } => {
            let query = ListRunsQuery {
                limit,
                offset,
                status,
            };
            let runs = client.runs().list(&thread, &query).await?;

            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&runs)?);
            } else {
                println!("{}", style(format!("Runs on {}", thread)).bold());
                println!("{}", dim.apply_to("─".repeat(50)));
                if runs.is_empty() {
                    println!("{}", dim.apply_to("No runs found"));
                }
                for run in &runs {
                    print_run_line(run);
                }
            }
        }
        RunsCommand::Get { thread, run } => {
            let run = client.runs().get(&thread, &run).await?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                println!("{}", style("Run Details").bold());
                println!("{}", dim.apply_to("─".repeat(50)));
                println!("  {} {}", dim.apply_to("ID:       "), run.run_id);
                println!("  {} {}", dim.apply_to("Thread:   "), run.thread_id);
                println!("  {} {}", dim.apply_to("Assistant:"), run.assistant_id);
                println!("  {} {}", dim.apply_to("Status:   "), status_label(run.status));
                println!("  {} {}", dim.apply_to("Created:  "), run.created_at);
                println!("  {} {}", dim.apply_to("Updated:  "), run.updated_at);
            }
        }
        RunsCommand::Cancel {
            thread,
            run,
            wait,
            rollback,
        } => {
            let action = if rollback {
                CancelAction::Rollback
            } else {
                CancelAction::Interrupt
            };
            client.runs().cancel(&thread, &run, wait, action).await?;

            if ctx.json_output {
                println!("{}", serde_json::json!({"cancelled": run}));
            } else {
                let green = Style::new().green();
                println!("{} Run cancelled: {}", green.apply_to("✓"), dim.apply_to(&run));
            }
        }
    }

    Ok(())
}

fn print_run_line(run: &Run) {
    let dim = Style::new().dim();
    println!(
        "{} {:<12} {}",
        dim.apply_to(format!("[{}]", run.run_id)),
        status_label(run.status),
        dim.apply_to(&run.created_at)
    );
}

fn status_label(status: RunStatus) -> String {
    let styled = match status {
        RunStatus::Success => style(status.as_str()).green(),
        RunStatus::Error | RunStatus::Timeout => style(status.as_str()).red(),
        RunStatus::Interrupted => style(status.as_str()).yellow(),
        RunStatus::Pending | RunStatus::Running => style(status.as_str()).cyan(),
    };
    styled.to_string()
}

fn parse_status(raw: &str) -> Result<RunStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown run status '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("success"), Ok(RunStatus::Success));
        assert_eq!(parse_status("interrupted"), Ok(RunStatus::Interrupted));
        assert!(parse_status("finished").is_err());
    }
}
