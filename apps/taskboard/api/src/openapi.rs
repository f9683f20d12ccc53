use utoipa::OpenApi;

/// API documentation root. Domain docs are nested under their route prefix.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Management API",
        description = "CRUD API for tasks with filtering and pagination"
    ),
    nest(
        (path = "/tasks", api = domain_tasks::TasksApiDoc)
    )
)]
pub struct ApiDoc;
