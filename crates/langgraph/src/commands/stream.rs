//! Stream command - start a run and print its events as they arrive.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use langgraph_client::{CancelHandle, EventStream, RunCreate, StreamEvent, StreamMode, StreamStatus};
use tokio::task::JoinHandle;

use super::{Context, parse_json};

/// Arguments for the stream command.
#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Assistant ID or graph name
    pub assistant: String,

    /// Run on this thread (stateless run if omitted)
    #[arg(short, long)]
    pub thread: Option<String>,

    /// Graph input as JSON
    #[arg(short, long)]
    pub input: Option<String>,

    /// Stream mode (repeatable): values, messages, updates, events, debug,
    /// custom, messages-tuple
    #[arg(short, long = "mode")]
    pub modes: Vec<StreamMode>,
}

/// Run the stream command.
pub async fn run(args: StreamArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let mut run = RunCreate::new(&args.assistant).with_stream_mode(args.modes);
    if let Some(raw) = &args.input {
        run = run.with_input(parse_json("--input", raw)?);
    }

    // Ctrl-C may arrive before the server answers, so the handle exists up front
    let cancel = CancelHandle::new();
    let watcher = cancel_on_ctrl_c(cancel.clone());

    let stream = client
        .runs()
        .stream_with(args.thread.as_deref(), &run, Some(cancel))
        .await;
    let result = match stream {
        Ok(stream) => print_stream(stream, ctx).await,
        Err(e) => Err(e.into()),
    };

    watcher.abort();
    result
}

/// Cancel the handle when the user presses Ctrl-C.
pub(crate) fn cancel_on_ctrl_c(cancel: CancelHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling stream");
            cancel.cancel();
        }
    })
}

/// Print every event until the stream ends, then report how it ended.
pub(crate) async fn print_stream(mut stream: EventStream, ctx: &Context) -> Result<()> {
    let mut count = 0usize;
    while let Some(event) = stream.recv().await {
        print_event(&event, ctx)?;
        count += 1;
    }

    match stream.finished().await {
        StreamStatus::Interrupted(message) => {
            anyhow::bail!("stream interrupted after {count} events: {message}")
        }
        StreamStatus::Cancelled => {
            if !ctx.json_output {
                let dim = Style::new().dim();
                eprintln!("{}", dim.apply_to(format!("Cancelled after {count} events")));
            }
        }
        StreamStatus::Completed | StreamStatus::Running => {
            if ctx.verbose && !ctx.json_output {
                let dim = Style::new().dim();
                eprintln!("{}", dim.apply_to(format!("{count} events")));
            }
        }
    }

    Ok(())
}

fn print_event(event: &StreamEvent, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        // One JSON object per line
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let name = if event.event.is_empty() {
        "message"
    } else {
        event.event.as_str()
    };
    let label = if event.is_error() {
        style(name).red().bold()
    } else {
        style(name).cyan().bold()
    };

    if event.data.is_empty() {
        println!("{}", label);
    } else {
        println!("{} {}", label, event.data);
    }

    if ctx.verbose && !event.metadata.is_empty() {
        let dim = Style::new().dim();
        println!("  {}", dim.apply_to(format!("metadata: {}", event.metadata)));
    }

    Ok(())
}
