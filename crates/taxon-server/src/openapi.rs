use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taxon API",
        version = "0.2.0",
        description = "Zero-shot classification of web pages and raw text into caller-supplied categories."
    ),
    paths(crate::routes::classify, crate::routes::health),
    components(schemas(
        crate::dto::ClassifyRequest,
        crate::dto::ModeParam,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "classify", description = "Batch classification"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
