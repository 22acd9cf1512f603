//! GraphQL endpoint

use std::sync::Arc;

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::http::server::AppState;

/// POST /graphql - execute a query or mutation
async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

/// GET /graphql - interactive playground, when enabled
async fn graphql_playground(State(state): State<Arc<AppState>>) -> Response {
    if !state.playground {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql"))).into_response()
}

/// GraphQL routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/graphql", get(graphql_playground).post(graphql_handler))
}
