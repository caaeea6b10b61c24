use anyhow::Result;
use clap::Args;
use wix_lib::validation;
use wix_lib::{CursorQuery, Filter, Query, RetryingClient, Sorting};

use crate::output::{
    print_embeds_csv, print_embeds_markdown, print_embeds_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct EmbedsArgs {
    /// Get a single site embed by ID
    #[arg(long)]
    pub id: Option<String>,

    /// Only embeds injected at this position: head, body-start, body-end
    #[arg(long)]
    pub position: Option<String>,

    /// Only enabled embeds
    #[arg(long)]
    pub enabled: bool,

    /// Results per page (1-100)
    #[arg(long, default_value = "50")]
    pub limit: i64,

    /// Continue from a cursor printed by an earlier call
    #[arg(long)]
    pub cursor: Option<String>,
}

pub async fn run(args: &EmbedsArgs, client: &RetryingClient, format: &OutputFormat) -> Result<()> {
    if let Some(id) = &args.id {
        let id = validation::validate_id(id)?;
        let embed = client.get_site_embed(&id).await?;
        match format {
            OutputFormat::Table => print_embeds_table(&[embed]),
            OutputFormat::Json => print_json(&embed),
            OutputFormat::Csv => print_embeds_csv(&[embed])?,
            OutputFormat::Markdown => print_embeds_markdown(&[embed]),
        }
        return Ok(());
    }

    let limit = validation::validate_limit(args.limit)?;
    let query = match &args.cursor {
        Some(cursor) => CursorQuery::from_cursor(cursor).with_limit(limit),
        None => {
            let mut filters = Vec::new();
            if let Some(position) = &args.position {
                let value = match position.as_str() {
                    "head" => "HEAD",
                    "body-start" => "BODY_START",
                    "body-end" => "BODY_END",
                    other => anyhow::bail!(
                        "unknown position '{}'. Expected head, body-start or body-end",
                        other
                    ),
                };
                filters.push(Filter::eq("position", value));
            }
            if args.enabled {
                filters.push(Filter::eq("enabled", true));
            }
            let mut query = CursorQuery::default()
                .with_sort(Sorting::asc("order"))
                .with_limit(limit);
            if !filters.is_empty() {
                query = query.with_filter(Filter::and(filters));
            }
            query
        }
    };

    let resp = client.query_site_embeds(&query).await?;
    eprintln!("{} site embeds", resp.site_embeds.len());
    if let Some(next) = resp.paging_metadata.next_cursor() {
        eprintln!("More results: --cursor {}", next);
    }

    match format {
        OutputFormat::Table => print_embeds_table(&resp.site_embeds),
        OutputFormat::Json => print_json(&resp.site_embeds),
        OutputFormat::Csv => print_embeds_csv(&resp.site_embeds)?,
        OutputFormat::Markdown => print_embeds_markdown(&resp.site_embeds),
    }

    Ok(())
}
