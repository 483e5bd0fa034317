//! Threads command - create, inspect and delete threads.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use langgraph_client::{CreateThreadRequest, OnConflictBehavior, Thread};

use super::{Context, parse_json_object};

/// Arguments for the threads command.
#[derive(Args, Debug)]
pub struct ThreadsArgs {
    #[command(subcommand)]
    pub command: ThreadsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThreadsCommand {
    /// Create a thread
    Create {
        /// Explicit thread ID
        #[arg(long)]
        id: Option<String>,

        /// Thread metadata as a JSON object
        #[arg(short, long)]
        metadata: Option<String>,

        /// Return the existing thread if the ID is taken
        #[arg(long)]
        if_exists: bool,
    },

    /// Show a thread
    Get {
        /// Thread ID
        id: String,
    },

    /// Delete a thread
    Delete {
        /// Thread ID
        id: String,
    },
}

/// Run the threads command.
pub async fn run(args: ThreadsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();
    let green = Style::new().green();

    match args.command {
        ThreadsCommand::Create {
            id,
            metadata,
            if_exists,
        } => {
            let request = CreateThreadRequest {
                metadata: metadata
                    .as_deref()
                    .map(|raw| parse_json_object("--metadata", raw))
                    .transpose()?,
                thread_id: id,
                if_exists: if_exists.then_some(OnConflictBehavior::DoNothing),
            };
            let thread = client.threads().create(request).await?;

            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&thread)?);
            } else {
                println!(
                    "{} Thread created: {}",
                    green.apply_to("✓"),
                    dim.apply_to(&thread.thread_id)
                );
            }
        }
        ThreadsCommand::Get { id } => {
            let thread = client.threads().get(&id).await?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&thread)?);
            } else {
                print_thread(&thread, ctx.verbose)?;
            }
        }
        ThreadsCommand::Delete { id } => {
            client.threads().delete(&id).await?;
            if ctx.json_output {
                println!("{}", serde_json::json!({"deleted": id}));
            } else {
                println!("{} Thread deleted: {}", green.apply_to("✓"), dim.apply_to(&id));
            }
        }
    }

    Ok(())
}

fn print_thread(thread: &Thread, verbose: bool) -> Result<()> {
    let dim = Style::new().dim();

    println!("{}", style("Thread Details").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!("  {} {}", dim.apply_to("ID:     "), thread.thread_id);
    println!("  {} {:?}", dim.apply_to("Status: "), thread.status);
    println!("  {} {}", dim.apply_to("Created:"), thread.created_at);
    println!("  {} {}", dim.apply_to("Updated:"), thread.updated_at);

    if !thread.metadata.is_empty() {
        println!(
            "  {} {}",
            dim.apply_to("Metadata:"),
            serde_json::to_string(&thread.metadata)?
        );
    }
    if verbose {
        println!();
        println!("{}", serde_json::to_string_pretty(&thread.values)?);
    }

    Ok(())
}
