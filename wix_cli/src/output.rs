use anyhow::Result;
use chrono::SecondsFormat;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use wix_lib::types::{
    BulkMachineTranslateResponse, Content, DomainEvent, EventBody, Schema, SiteEmbed,
    SiteEmbedContent,
};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "md" | "markdown" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct EmbedRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    #[serde(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Position")]
    #[serde(rename = "Position")]
    position: String,
    #[tabled(rename = "Order")]
    #[serde(rename = "Order")]
    order: String,
    #[tabled(rename = "Enabled")]
    #[serde(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Revision")]
    #[serde(rename = "Revision")]
    revision: String,
}

#[derive(Tabled, Serialize)]
struct SchemaRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Entity Type")]
    #[serde(rename = "Entity Type")]
    entity_type: String,
    #[tabled(rename = "Scope")]
    #[serde(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Fields")]
    #[serde(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Text Fields")]
    #[serde(rename = "Text Fields")]
    text_fields: String,
}

#[derive(Tabled, Serialize)]
struct ContentRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Entity")]
    #[serde(rename = "Entity")]
    entity_id: String,
    #[tabled(rename = "Locale")]
    #[serde(rename = "Locale")]
    locale: String,
    #[tabled(rename = "Fields")]
    #[serde(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Published")]
    #[serde(rename = "Published")]
    published: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    updated: String,
}

#[derive(Tabled, Serialize)]
struct TranslationRow {
    #[tabled(rename = "Index")]
    #[serde(rename = "Index")]
    index: u32,
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Text")]
    #[serde(rename = "Text")]
    text: String,
}

#[derive(Tabled, Serialize)]
struct EventRow {
    #[tabled(rename = "Event")]
    #[serde(rename = "Event")]
    id: String,
    #[tabled(rename = "Entity")]
    #[serde(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    slug: String,
    #[tabled(rename = "Sequence")]
    #[serde(rename = "Sequence")]
    sequence: String,
    #[tabled(rename = "Time")]
    #[serde(rename = "Time")]
    event_time: String,
}

// -- Row builders --

fn embed_kind(content: Option<&SiteEmbedContent>) -> &'static str {
    match content {
        Some(SiteEmbedContent::CustomHtml(_)) => "html",
        Some(SiteEmbedContent::Script(_)) => "script",
        Some(SiteEmbedContent::TrackingPixel(_)) => "pixel",
        None => "-",
    }
}

fn build_embed_rows(embeds: &[SiteEmbed]) -> Vec<EmbedRow> {
    embeds
        .iter()
        .map(|e| EmbedRow {
            id: e.id.clone().unwrap_or_default(),
            name: e.name.clone().unwrap_or_default(),
            kind: embed_kind(e.content.as_ref()).to_string(),
            position: e.position.map(|p| p.to_string()).unwrap_or_default(),
            order: e.order.map(|o| o.to_string()).unwrap_or_default(),
            enabled: yes_no(e.enabled),
            revision: e.revision.map(|r| r.to_string()).unwrap_or_default(),
        })
        .collect()
}

fn build_schema_rows(schemas: &[Schema]) -> Vec<SchemaRow> {
    schemas
        .iter()
        .map(|s| SchemaRow {
            id: s.id.clone().unwrap_or_default(),
            name: s.display_name.clone().unwrap_or_default(),
            entity_type: s
                .key
                .as_ref()
                .map(|k| k.entity_type.clone())
                .unwrap_or_default(),
            scope: s
                .key
                .as_ref()
                .and_then(|k| serde_json::to_value(k.scope).ok())
                .and_then(|v| v.as_str().map(str::to_lowercase))
                .unwrap_or_default(),
            fields: s.fields.len(),
            text_fields: s.text_field_ids().join(", "),
        })
        .collect()
}

fn build_content_rows(contents: &[Content]) -> Vec<ContentRow> {
    contents
        .iter()
        .map(|c| ContentRow {
            id: c.id.clone().unwrap_or_default(),
            entity_id: c.entity_id.clone().unwrap_or_default(),
            locale: c.locale.as_ref().map(|l| l.to_string()).unwrap_or_default(),
            fields: c.fields.len(),
            published: yes_no(c.published_content),
            updated: c
                .updated_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn build_translation_rows(resp: &BulkMachineTranslateResponse) -> Vec<TranslationRow> {
    resp.results
        .iter()
        .map(|r| {
            let meta = &r.item_metadata;
            let status = if meta.success {
                "ok".to_string()
            } else {
                meta.error
                    .as_ref()
                    .map(|e| e.code.clone())
                    .unwrap_or_else(|| "failed".to_string())
            };
            TranslationRow {
                index: meta.original_index,
                id: meta.id.clone().unwrap_or_default(),
                status,
                text: r.item.as_ref().map(|i| i.text()).unwrap_or_default(),
            }
        })
        .collect()
}

fn build_event_rows(events: &[DomainEvent]) -> Vec<EventRow> {
    events
        .iter()
        .map(|e| EventRow {
            id: e.id.clone(),
            entity: format!("{}/{}", short_fqdn(&e.entity_fqdn), e.entity_id),
            slug: event_slug(e),
            sequence: e
                .entity_event_sequence
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            event_time: e
                .event_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
        })
        .collect()
}

fn event_slug(event: &DomainEvent) -> String {
    if !event.slug.is_empty() {
        return event.slug.clone();
    }
    match event.body {
        Some(EventBody::Created(_)) => "created",
        Some(EventBody::Updated(_)) => "updated",
        Some(EventBody::Deleted(_)) => "deleted",
        Some(EventBody::Action(_)) => "action",
        None => "",
    }
    .to_string()
}

/// Last segment of an entity FQDN, e.g. `content` for
/// `wix.multilingual.translation.v1.content`.
fn short_fqdn(fqdn: &str) -> &str {
    fqdn.rsplit('.').next().unwrap_or(fqdn)
}

fn yes_no(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => String::new(),
    }
}

// -- Table output --

pub fn print_embeds_table(embeds: &[SiteEmbed]) {
    println!("{}", Table::new(build_embed_rows(embeds)));
}

pub fn print_schemas_table(schemas: &[Schema]) {
    println!("{}", Table::new(build_schema_rows(schemas)));
}

pub fn print_contents_table(contents: &[Content]) {
    println!("{}", Table::new(build_content_rows(contents)));
}

pub fn print_translations_table(resp: &BulkMachineTranslateResponse) {
    println!("{}", Table::new(build_translation_rows(resp)));
}

pub fn print_events_table(events: &[DomainEvent]) {
    println!("{}", Table::new(build_event_rows(events)));
}

// -- Markdown output --

pub fn print_embeds_markdown(embeds: &[SiteEmbed]) {
    let mut table = Table::new(build_embed_rows(embeds));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_schemas_markdown(schemas: &[Schema]) {
    let mut table = Table::new(build_schema_rows(schemas));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_contents_markdown(contents: &[Content]) {
    let mut table = Table::new(build_content_rows(contents));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_translations_markdown(resp: &BulkMachineTranslateResponse) {
    let mut table = Table::new(build_translation_rows(resp));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_events_markdown(events: &[DomainEvent]) {
    let mut table = Table::new(build_event_rows(events));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

fn write_csv<R: Serialize>(rows: Vec<R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_embeds_csv(embeds: &[SiteEmbed]) -> Result<()> {
    write_csv(build_embed_rows(embeds))
}

pub fn print_schemas_csv(schemas: &[Schema]) -> Result<()> {
    write_csv(build_schema_rows(schemas))
}

pub fn print_contents_csv(contents: &[Content]) -> Result<()> {
    write_csv(build_content_rows(contents))
}

pub fn print_translations_csv(resp: &BulkMachineTranslateResponse) -> Result<()> {
    write_csv(build_translation_rows(resp))
}

pub fn print_events_csv(events: &[DomainEvent]) -> Result<()> {
    write_csv(build_event_rows(events))
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
