//! Join command - follow a run that is already in progress.

use anyhow::Result;
use clap::Args;

use super::Context;
use super::stream::{cancel_on_ctrl_c, print_stream};

/// Arguments for the join command.
#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Thread ID
    pub thread: String,

    /// Run ID
    pub run: String,

    /// Ask the server to cancel the run if this client disconnects
    #[arg(long)]
    pub cancel_on_disconnect: bool,
}

/// Run the join command.
pub async fn run(args: JoinArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let stream = client
        .runs()
        .join_stream(&args.thread, &args.run, args.cancel_on_disconnect)
        .await?;

    let watcher = cancel_on_ctrl_c(stream.cancel_handle());
    let result = print_stream(stream, ctx).await;
    watcher.abort();
    result
}
