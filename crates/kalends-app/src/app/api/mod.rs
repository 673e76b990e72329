mod app_specific;
mod events;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use kalends_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, APP_ROUTE_PREFIX, EVENTS_ROUTE_COMPONENT,
    EVENTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router. The healthcheck is public; everything else
/// requires an authenticated owner.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(Router::new().hoop(AuthMiddleware).push(events::routes()))
}
