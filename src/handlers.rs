use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::pages::{ClassesView, EnrollmentsView};
use crate::validation::{ClassForm, EnrollmentForm};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub class_id: Option<i64>,
}

#[utoipa::path(get, path = "/", tag = "console")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Cultural Classes Admin Console",
        "endpoints": {
            "/admin/classes": "Cultural classes page",
            "/admin/enrollments": "Enrollments page"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "console")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "console")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/admin/classes",
    responses((status = 200, description = "Classes page, list fetched on every visit", body = ClassesView)),
    tag = "classes"
)]
pub async fn classes_page(State(state): State<AppState>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.mount().await;
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/classes/refresh",
    responses((status = 200, body = ClassesView)),
    tag = "classes"
)]
pub async fn refresh_classes(State(state): State<AppState>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.refresh().await;
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/classes/form",
    responses((status = 200, description = "Create form opened", body = ClassesView)),
    tag = "classes"
)]
pub async fn open_class_form(State(state): State<AppState>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.open_create();
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/classes/{id}/edit",
    params(("id" = i64, Path, description = "Class to edit")),
    responses((status = 200, description = "Edit form opened", body = ClassesView)),
    tag = "classes"
)]
pub async fn edit_class(State(state): State<AppState>, Path(id): Path<i64>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.open_edit(id);
    Json(page.snapshot())
}

#[utoipa::path(
    delete,
    path = "/admin/classes/form",
    responses((status = 200, body = ClassesView)),
    tag = "classes"
)]
pub async fn close_class_form(State(state): State<AppState>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.close_form();
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/classes/form/submit",
    request_body = ClassForm,
    responses((status = 200, description = "Form submitted; outcome in notifications", body = ClassesView)),
    tag = "classes"
)]
pub async fn submit_class_form(
    State(state): State<AppState>,
    Json(form): Json<ClassForm>,
) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.submit(&form).await;
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/classes/{id}/delete",
    params(("id" = i64, Path, description = "Class to delete")),
    responses((status = 200, description = "Confirmation requested", body = ClassesView)),
    tag = "classes"
)]
pub async fn request_class_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.request_delete(id);
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/classes/confirmation",
    responses((status = 200, description = "Pending deletion carried out", body = ClassesView)),
    tag = "classes"
)]
pub async fn confirm_class_delete(State(state): State<AppState>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.confirm_delete().await;
    Json(page.snapshot())
}

#[utoipa::path(
    delete,
    path = "/admin/classes/confirmation",
    responses((status = 200, body = ClassesView)),
    tag = "classes"
)]
pub async fn dismiss_class_delete(State(state): State<AppState>) -> Json<ClassesView> {
    let mut page = state.classes.lock().await;
    page.dismiss_confirmation();
    Json(page.snapshot())
}

#[utoipa::path(
    get,
    path = "/admin/enrollments",
    responses((status = 200, description = "Enrollments page, class list and selected enrollments fetched on every visit", body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn enrollments_page(State(state): State<AppState>) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.mount().await;
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/enrollments/classes/refresh",
    responses((status = 200, description = "Class selector reloaded", body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn refresh_enrollment_classes(State(state): State<AppState>) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.refresh_classes().await;
    Json(page.snapshot())
}

#[utoipa::path(
    put,
    path = "/admin/enrollments/selection",
    request_body = Selection,
    responses((status = 200, description = "Selection changed and its enrollments loaded", body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn select_class(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Json<EnrollmentsView> {
    // The page stays unlocked while the fetch is in flight.
    let (fetch, api) = {
        let mut page = state.enrollments.lock().await;
        (page.select_class(selection.class_id), page.api())
    };

    if let Some(fetch) = fetch {
        let result = fetch.run(&*api).await;
        state.enrollments.lock().await.apply_enrollments(fetch, result);
    }

    let mut page = state.enrollments.lock().await;
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/enrollments/form",
    responses((status = 200, body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn open_enrollment_form(State(state): State<AppState>) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.open_form();
    Json(page.snapshot())
}

#[utoipa::path(
    delete,
    path = "/admin/enrollments/form",
    responses((status = 200, body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn close_enrollment_form(State(state): State<AppState>) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.close_form();
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/enrollments/form/submit",
    request_body = EnrollmentForm,
    responses((status = 200, description = "Form submitted; outcome in notifications", body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn submit_enrollment_form(
    State(state): State<AppState>,
    Json(form): Json<EnrollmentForm>,
) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.submit(&form).await;
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/enrollments/{id}/cancel",
    params(("id" = i64, Path, description = "Enrollment to cancel")),
    responses((status = 200, description = "Confirmation requested", body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn request_enrollment_cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.request_cancellation(id);
    Json(page.snapshot())
}

#[utoipa::path(
    post,
    path = "/admin/enrollments/confirmation",
    responses((status = 200, description = "Pending cancellation carried out", body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn confirm_enrollment_cancel(State(state): State<AppState>) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.confirm_cancellation().await;
    Json(page.snapshot())
}

#[utoipa::path(
    delete,
    path = "/admin/enrollments/confirmation",
    responses((status = 200, body = EnrollmentsView)),
    tag = "enrollments"
)]
pub async fn dismiss_enrollment_cancel(State(state): State<AppState>) -> Json<EnrollmentsView> {
    let mut page = state.enrollments.lock().await;
    page.dismiss_confirmation();
    Json(page.snapshot())
}
