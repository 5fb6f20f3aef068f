//! The `highlight` command.

use anyhow::Context;
use clap::Args;

use super::{CommandContext, HashArgs, Transport};

/// Arguments of `highlight`.
#[derive(Debug, Clone, Args)]
pub struct HighlightArgs {
    #[clap(flatten)]
    pub hash: HashArgs,

    /// Line numbers to look up, for example 1-5,7
    #[arg(long, required_unless_present = "search", conflicts_with = "search")]
    pub lines: Option<String>,

    /// Text to locate in the result (legacy API)
    #[arg(long)]
    pub search: Option<String>,
}

impl HighlightArgs {
    pub async fn execute(self, ctx: &CommandContext) -> anyhow::Result<()> {
        let whisper_hash = self.hash.whisper_hash();

        match (ctx.transport()?, &self.lines, &self.search) {
            (Transport::Current(client), Some(lines), _) => {
                let highlights = client
                    .highlight_data(&whisper_hash, lines)
                    .await
                    .context("failed to fetch highlight data")?;
                ctx.print_json(&highlights)
            }
            (Transport::Legacy(client), _, Some(search)) => {
                let highlights = client
                    .highlight_data(&whisper_hash, search)
                    .await
                    .context("failed to fetch highlight data")?;
                ctx.print_json(&highlights)
            }
            (Transport::Current(_), None, _) => {
                anyhow::bail!("--lines is required, --search needs --legacy")
            }
            (Transport::Legacy(_), _, None) => {
                anyhow::bail!("--search is required with --legacy")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::command::Command;
    use crate::config::Cli;

    #[test]
    fn test_legacy_search_arguments() {
        let cli = Cli::try_parse_from([
            "llmwhisperer",
            "--legacy",
            "highlight",
            "abc|123",
            "--search",
            "total due",
        ])
        .unwrap();

        let Command::Highlight(args) = cli.command else {
            panic!("Expected the highlight command");
        };
        assert!(cli.output.legacy);
        assert_eq!(args.search.as_deref(), Some("total due"));
        assert!(args.lines.is_none());

        let missing = Cli::try_parse_from(["llmwhisperer", "highlight", "abc|123"]);
        assert!(missing.is_err());
    }
}
