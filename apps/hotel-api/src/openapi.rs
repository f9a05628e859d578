use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Hotel API",
        version = "0.1.0",
        description = "Rooms and guest bookings for a hotel"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = domain_rooms::entity::Model::URL, api = domain_rooms::ApiDoc),
        (path = domain_bookings::entity::Model::URL, api = domain_bookings::ApiDoc)
    )
)]
pub struct ApiDoc;
