use anyhow::Result;
use clap::Args;
use wix_lib::types::TranslatableContent;
use wix_lib::{RetryingClient, TranslationService};

use crate::output::{
    print_json, print_translations_csv, print_translations_markdown, print_translations_table,
    OutputFormat,
};

#[derive(Args)]
pub struct TranslateArgs {
    /// Text to translate. Repeat for several nodes; each is translated on its own.
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Source language tag, e.g. en
    #[arg(long)]
    pub from: String,

    /// Target language tag, e.g. de
    #[arg(long)]
    pub to: String,

    /// Treat the text as HTML instead of plain text
    #[arg(long)]
    pub html: bool,
}

/// One node per text argument, with ids `n0`, `n1`, ...
pub fn build_nodes(args: &TranslateArgs) -> Vec<TranslatableContent> {
    args.text
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let id = format!("n{}", i);
            if args.html {
                TranslatableContent::html(&id, text)
            } else {
                TranslatableContent::plain_text(&id, text)
            }
        })
        .collect()
}

pub async fn run(
    args: &TranslateArgs,
    client: &RetryingClient,
    format: &OutputFormat,
) -> Result<()> {
    let service = TranslationService::new(client);
    let nodes = build_nodes(args);

    let resp = service.translate_bulk(&args.from, &args.to, &nodes).await?;
    let meta = &resp.bulk_action_metadata;
    eprintln!(
        "{} translated, {} failed",
        meta.total_successes, meta.total_failures
    );
    if meta.undetailed_failures > 0 {
        eprintln!("{} failures were not itemized by the service", meta.undetailed_failures);
    }

    match format {
        OutputFormat::Table => print_translations_table(&resp),
        OutputFormat::Json => print_json(&resp),
        OutputFormat::Csv => print_translations_csv(&resp)?,
        OutputFormat::Markdown => print_translations_markdown(&resp),
    }

    Ok(())
}
