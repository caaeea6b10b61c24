use anyhow::Result;
use clap::Args;
use wix_lib::types::Content;
use wix_lib::validation;
use wix_lib::{collect_all, CursorQuery, Filter, Query, RetryingClient, Sorting};

use crate::output::{
    print_contents_csv, print_contents_markdown, print_contents_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct ContentsArgs {
    /// Get a single content item by ID
    #[arg(long)]
    pub id: Option<String>,

    /// Filter by schema ID
    #[arg(long)]
    pub schema_id: Option<String>,

    /// Filter by locale, e.g. de or pt-BR
    #[arg(long)]
    pub locale: Option<String>,

    /// Filter by the ID of the translated entity
    #[arg(long)]
    pub entity_id: Option<String>,

    /// Results per page (1-100)
    #[arg(long, default_value = "50")]
    pub limit: i64,

    /// Follow cursors until every page is fetched
    #[arg(long)]
    pub all: bool,
}

/// Builds the first-page query for the given filters, newest first.
pub fn build_query(args: &ContentsArgs) -> Result<CursorQuery> {
    let limit = validation::validate_limit(args.limit)?;

    let mut filters = Vec::new();
    if let Some(schema_id) = &args.schema_id {
        filters.push(Filter::eq("schemaId", validation::validate_id(schema_id)?));
    }
    if let Some(locale) = &args.locale {
        let locale = validation::validate_locale(locale)?;
        filters.push(Filter::eq("locale", locale.as_str()));
    }
    if let Some(entity_id) = &args.entity_id {
        filters.push(Filter::eq("entityId", validation::validate_id(entity_id)?));
    }

    let mut query = CursorQuery::default()
        .with_sort(Sorting::desc("_updatedDate"))
        .with_limit(limit);
    if !filters.is_empty() {
        query = query.with_filter(Filter::and(filters));
    }
    Ok(query)
}

pub async fn run(
    args: &ContentsArgs,
    client: &RetryingClient,
    format: &OutputFormat,
) -> Result<()> {
    let contents: Vec<Content> = if let Some(id) = &args.id {
        let id = validation::validate_id(id)?;
        vec![client.get_content(&id).await?]
    } else {
        let query = build_query(args)?;
        if args.all {
            collect_all(query, |q: CursorQuery| async move {
                client.query_contents(&q).await
            })
            .await?
        } else {
            let resp = client.query_contents(&query).await?;
            if resp.paging_metadata.has_next {
                eprintln!("More content exists; pass --all to fetch every page");
            }
            resp.contents
        }
    };

    eprintln!("{} content items", contents.len());
    match format {
        OutputFormat::Table => print_contents_table(&contents),
        OutputFormat::Json => print_json(&contents),
        OutputFormat::Csv => print_contents_csv(&contents)?,
        OutputFormat::Markdown => print_contents_markdown(&contents),
    }

    Ok(())
}
