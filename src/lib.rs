pub mod client;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod pages;
pub mod settings;
pub mod validation;
pub mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use handlers::{
    classes_page, close_class_form, close_enrollment_form, confirm_class_delete,
    confirm_enrollment_cancel, dismiss_class_delete, dismiss_enrollment_cancel, edit_class,
    enrollments_page, healthz_live, healthz_ready, open_class_form, open_enrollment_form,
    refresh_classes, refresh_enrollment_classes, request_class_delete, request_enrollment_cancel, root, select_class,
    submit_class_form, submit_enrollment_form,
};
use tokio::sync::Mutex;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::client::{CulturalApi, HttpApiClient};
use crate::openapi::ApiDoc;
use crate::pages::{ClassesPage, EnrollmentsPage};
use crate::settings::Settings;

/// One view-state object per page, shared by every request to that page.
#[derive(Clone)]
pub struct AppState {
    pub(crate) settings: Settings,
    pub(crate) classes: Arc<Mutex<ClassesPage>>,
    pub(crate) enrollments: Arc<Mutex<EnrollmentsPage>>,
}

impl AppState {
    pub fn new(settings: Settings, api: Arc<dyn CulturalApi>) -> Self {
        Self {
            settings,
            classes: Arc::new(Mutex::new(ClassesPage::new(api.clone()))),
            enrollments: Arc::new(Mutex::new(EnrollmentsPage::new(api))),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let api = Arc::new(HttpApiClient::new(settings.api_base_url.clone()));
    info!(api = %api.base_url(), "using cultural classes API");
    let state = AppState::new(settings.clone(), api);

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("Starting Cultural Classes Admin Console on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/admin/classes", get(classes_page))
        .route("/admin/classes/refresh", post(refresh_classes))
        .route(
            "/admin/classes/form",
            post(open_class_form).delete(close_class_form),
        )
        .route("/admin/classes/form/submit", post(submit_class_form))
        .route("/admin/classes/{id}/edit", post(edit_class))
        .route("/admin/classes/{id}/delete", post(request_class_delete))
        .route(
            "/admin/classes/confirmation",
            post(confirm_class_delete).delete(dismiss_class_delete),
        )
        .route("/admin/enrollments", get(enrollments_page))
        .route(
            "/admin/enrollments/classes/refresh",
            post(refresh_enrollment_classes),
        )
        .route("/admin/enrollments/selection", put(select_class))
        .route(
            "/admin/enrollments/form",
            post(open_enrollment_form).delete(close_enrollment_form),
        )
        .route(
            "/admin/enrollments/form/submit",
            post(submit_enrollment_form),
        )
        .route(
            "/admin/enrollments/{id}/cancel",
            post(request_enrollment_cancel),
        )
        .route(
            "/admin/enrollments/confirmation",
            post(confirm_enrollment_cancel).delete(dismiss_enrollment_cancel),
        )
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer).layer(CorsLayer::permissive())
}
