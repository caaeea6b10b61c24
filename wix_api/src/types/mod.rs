mod meta;
pub use self::meta::{
    CursorPage, Cursors, FieldMask, PagingMetadata, Revision, DEFAULT_PAGE_LIMIT,
};

mod oneof;
pub use self::oneof::OneofConflict;

mod bulk;
pub use self::bulk::{BulkActionMetadata, BulkItemResult, BulkResponse, ItemMetadata};

mod locale;
pub use self::locale::{Flag, Locale};

mod rich_content;
pub use self::rich_content::{Node, RichContent, TextData};

mod aggregation;
pub use self::aggregation::{
    Aggregation, AggregationData, AggregationKind, AggregationResult, AggregationResultKind,
    AggregationType, DateHistogramAggregation, DateHistogramResult, DateHistogramResults,
    GroupByValueResults, Interval, MissingValues, NestedAggregation, NestedResults,
    NestedValueAggregationResult, RangeAggregation, RangeBucket, RangeResult, RangeResults,
    ScalarAggregation, ScalarResult, ScalarType, ValueAggregation, ValueResult, ValueResults,
    ValueSortDirection, ValueSortType,
};

mod site_embed;
pub use self::site_embed::{
    CustomHtmlOptions, EmbedPosition, QuerySiteEmbedsResponse, ScriptOptions, SiteEmbed,
    SiteEmbedContent, SiteEmbedID, SiteEmbedResponse, TrackingPixelOptions,
};

mod schema;
pub use self::schema::{
    FieldType, QuerySchemasResponse, Schema, SchemaField, SchemaID, SchemaKey, SchemaResponse,
    SchemaScope,
};

mod content;
pub use self::content::{
    Content, ContentField, ContentID, ContentResponse, FieldValue, Image, MaskedContent,
    PublishedContent, QueryContentsResponse, QueryPublishedContentResponse,
    SearchPublishedContentResponse, UpdatedBy, Video,
};

mod machine_translation;
pub use self::machine_translation::{
    BulkMachineTranslateRequest, BulkMachineTranslateResponse, ContentFormat,
    MachineTranslateRequest, MachineTranslateResponse, TranslatableContent, TranslatableValue,
    MAX_TRANSLATABLE_LENGTH,
};

mod event;
pub use self::event::{
    ActionEvent, DecodedEntity, DomainEvent, EntityCreatedEvent, EntityDeletedEvent,
    EntityUpdatedEvent, EventBody, EventSequence, IdentificationData, Identity, IdentityType,
    MessageEnvelope, RestoreInfo, CONTENT_FQDN, SCHEMA_FQDN, SITE_EMBED_FQDN,
};
