use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let read_routes = Router::new()
        .route(
            "/api/permissions",
            get(handlers::permissions::list_permissions_handler),
        )
        .route(
            "/api/permissions/{name}",
            get(handlers::permissions::get_permission_handler),
        )
        .route("/api/roles", get(handlers::roles::list_roles_handler))
        .route("/api/roles/{name}", get(handlers::roles::get_role_handler))
        .route(
            "/api/users/{user_id}",
            get(handlers::principals::get_user_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(handlers::principals::user_permissions_handler),
        )
        .route(
            "/api/groups/{group_id}",
            get(handlers::principals::get_group_handler),
        );

    let mutation_routes = Router::new()
        .route(
            "/api/permissions",
            post(handlers::permissions::create_permission_handler),
        )
        .route(
            "/api/permissions/{name}",
            patch(handlers::permissions::update_permission_handler)
                .delete(handlers::permissions::delete_permission_handler),
        )
        .route(
            "/api/permissions/{name}/owners",
            post(handlers::permissions::add_permission_owners_handler)
                .delete(handlers::permissions::remove_permission_owners_handler),
        )
        .route("/api/roles", post(handlers::roles::create_role_handler))
        .route(
            "/api/roles/{name}",
            patch(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{name}/members",
            post(handlers::roles::add_role_members_handler)
                .delete(handlers::roles::remove_role_members_handler),
        )
        .route(
            "/api/roles/{name}/reconcile",
            post(handlers::roles::reconcile_role_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_actor,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(read_routes)
        .merge(mutation_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
