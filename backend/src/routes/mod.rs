//! Route definitions for the Garden Tracker API

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/seeds", seed_routes())
        .nest("/seedlings", seedling_routes())
        .nest("/containers", container_routes())
        .nest("/plants", plant_routes())
        .nest("/harvests", harvest_routes())
        .nest("/calendar", calendar_routes())
        .nest("/templates", template_routes())
        .nest("/plans", plan_routes())
        .nest("/hydro", hydro_routes())
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/analytics", get(handlers::get_analytics))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        .merge(protected)
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

fn seed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_seeds).post(handlers::create_seed))
        .route(
            "/:seed_id",
            get(handlers::get_seed)
                .put(handlers::update_seed)
                .delete(handlers::delete_seed),
        )
        .route("/:seed_id/schedule", get(handlers::get_seed_schedule))
}

fn seedling_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_seedlings).post(handlers::sow_seedlings))
        .route("/pot-up-ready", get(handlers::list_ready_for_pot_up))
        .route(
            "/:batch_id",
            get(handlers::get_seedling).delete(handlers::delete_seedling),
        )
        .route("/:batch_id/germinate", post(handlers::record_germination))
        .route("/:batch_id/pot-up", post(handlers::pot_up))
        .route("/:batch_id/status", put(handlers::update_seedling_status))
}

fn container_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_containers).post(handlers::create_container))
        .route(
            "/:container_id",
            get(handlers::get_container)
                .put(handlers::update_container)
                .delete(handlers::delete_container),
        )
        .route("/:container_id/capacity", get(handlers::get_capacity))
}

fn plant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plants).post(handlers::create_plants))
        .route(
            "/:plant_id",
            get(handlers::get_plant)
                .put(handlers::update_plant)
                .delete(handlers::delete_plant),
        )
        .route("/:plant_id/status", put(handlers::update_plant_status))
        .route(
            "/:plant_id/logs",
            get(handlers::list_logs).post(handlers::add_log),
        )
}

fn harvest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_harvests).post(handlers::record_harvest))
        .route("/export", get(handlers::export_harvests))
        .route("/:harvest_id", delete(handlers::delete_harvest))
}

fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_month))
        .route("/upcoming", get(handlers::get_upcoming))
}

fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_templates).post(handlers::create_template))
        .route(
            "/:template_id",
            get(handlers::get_template).delete(handlers::delete_template),
        )
}

fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plans).post(handlers::create_plan))
        .route(
            "/:plan_id",
            get(handlers::get_plan).delete(handlers::delete_plan),
        )
        .route("/:plan_id/items", post(handlers::add_plan_item))
        .route("/:plan_id/items/:item_id", delete(handlers::remove_plan_item))
        .route("/:plan_id/compute", get(handlers::compute_plan))
}

fn hydro_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/systems",
            get(handlers::list_systems).post(handlers::create_system),
        )
        .route(
            "/systems/:system_id",
            get(handlers::get_system).delete(handlers::delete_system),
        )
        .route("/systems/:system_id/status", put(handlers::update_system_status))
        .route(
            "/systems/:system_id/readings",
            get(handlers::list_readings).post(handlers::add_reading),
        )
        .route("/plants", post(handlers::create_hydro_plants))
}
