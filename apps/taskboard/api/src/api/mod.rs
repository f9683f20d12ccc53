use axum::{Router, http::HeaderValue, routing::get};
use axum_helpers::{create_cors_layer, server::health_router};
use domain_tasks::{PgTaskRepository, TasksModule};

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod health;

/// API routes without the global prefix; `create_router` nests them.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(
        "/tasks",
        TasksModule::new(PgTaskRepository::new(state.db.clone())).router(),
    )
}

/// `/ready` with the state applied so it can merge into the stateless app.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Full application: prefixed API, docs, CORS, health and readiness.
pub fn app(state: &AppState) -> eyre::Result<Router> {
    let origin = HeaderValue::from_str(&state.config.frontend_url)
        .map_err(|e| eyre::eyre!("Invalid FRONTEND_URL {:?}: {}", state.config.frontend_url, e))?;

    let router = axum_helpers::create_router::<ApiDoc>(
        routes(state),
        &state.config.api_prefix,
        create_cors_layer(origin),
    );

    Ok(router
        .merge(health_router(state.config.app))
        .merge(ready_router(state.clone())))
}
