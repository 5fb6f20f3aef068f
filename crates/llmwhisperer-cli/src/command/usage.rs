//! The `usage` command.

use anyhow::Context;

use super::{CommandContext, Transport};

pub async fn execute(ctx: &CommandContext) -> anyhow::Result<()> {
    let usage = match ctx.transport()? {
        Transport::Current(client) => client.usage_info().await,
        Transport::Legacy(client) => client.usage_info().await,
    }
    .context("failed to fetch usage info")?;

    ctx.print_json(&usage)
}
