use anyhow::Result;
use clap::Args;
use wix_lib::types::Schema;
use wix_lib::validation;
use wix_lib::{collect_all, CursorPaging, CursorQuery, Filter, Query, RetryingClient};

use crate::output::{
    print_json, print_schemas_csv, print_schemas_markdown, print_schemas_table, OutputFormat,
};

#[derive(Args)]
pub struct SchemasArgs {
    /// Get a single schema by ID
    #[arg(long)]
    pub id: Option<String>,

    /// List the schemas visible to the current site instead of querying
    #[arg(long)]
    pub site: bool,

    /// Filter by owning app ID
    #[arg(long)]
    pub app_id: Option<String>,

    /// Filter by entity type, e.g. blog-post
    #[arg(long)]
    pub entity_type: Option<String>,

    /// Results per page (1-100)
    #[arg(long, default_value = "50")]
    pub limit: i64,

    /// Follow cursors until every page is fetched
    #[arg(long)]
    pub all: bool,
}

pub async fn run(args: &SchemasArgs, client: &RetryingClient, format: &OutputFormat) -> Result<()> {
    let limit = validation::validate_limit(args.limit)?;

    let schemas: Vec<Schema> = if let Some(id) = &args.id {
        let id = validation::validate_id(id)?;
        vec![client.get_schema(&id).await?]
    } else if args.site {
        let paging = CursorPaging {
            limit: Some(limit),
            cursor: None,
        };
        let resp = client.list_site_schemas(&paging).await?;
        if resp.paging_metadata.has_next {
            eprintln!("More site schemas exist; raise --limit to see them");
        }
        resp.schemas
    } else {
        let mut filters = Vec::new();
        if let Some(app_id) = &args.app_id {
            filters.push(Filter::eq("key.appId", validation::validate_id(app_id)?));
        }
        if let Some(entity_type) = &args.entity_type {
            filters.push(Filter::eq(
                "key.entityType",
                validation::validate_id(entity_type)?,
            ));
        }
        let mut query = CursorQuery::default().with_limit(limit);
        if !filters.is_empty() {
            query = query.with_filter(Filter::and(filters));
        }

        if args.all {
            collect_all(query, |q: CursorQuery| async move {
                client.query_schemas(&q).await
            })
            .await?
        } else {
            let resp = client.query_schemas(&query).await?;
            if resp.paging_metadata.has_next {
                eprintln!("More schemas exist; pass --all to fetch every page");
            }
            resp.schemas
        }
    };

    eprintln!("{} schemas", schemas.len());
    match format {
        OutputFormat::Table => print_schemas_table(&schemas),
        OutputFormat::Json => print_json(&schemas),
        OutputFormat::Csv => print_schemas_csv(&schemas)?,
        OutputFormat::Markdown => print_schemas_markdown(&schemas),
    }

    Ok(())
}
