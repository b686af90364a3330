use utoipa::OpenApi;

use crate::handlers::Selection;
use crate::models::{CulturalClass, CulturalClassCategory, Enrollment};
use crate::pages::{ClassDialog, ClassRow, ClassesView, EnrollmentDialog, EnrollmentsView};
use crate::validation::{ClassForm, EnrollmentForm};
use crate::view::{ListStatus, Notification, NotificationLevel};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::classes_page,
        crate::handlers::refresh_classes,
        crate::handlers::open_class_form,
        crate::handlers::edit_class,
        crate::handlers::close_class_form,
        crate::handlers::submit_class_form,
        crate::handlers::request_class_delete,
        crate::handlers::confirm_class_delete,
        crate::handlers::dismiss_class_delete,
        crate::handlers::enrollments_page,
        crate::handlers::refresh_enrollment_classes,
        crate::handlers::select_class,
        crate::handlers::open_enrollment_form,
        crate::handlers::close_enrollment_form,
        crate::handlers::submit_enrollment_form,
        crate::handlers::request_enrollment_cancel,
        crate::handlers::confirm_enrollment_cancel,
        crate::handlers::dismiss_enrollment_cancel
    ),
    components(schemas(
        CulturalClass,
        CulturalClassCategory,
        Enrollment,
        ClassForm,
        EnrollmentForm,
        Selection,
        ClassRow,
        ClassDialog,
        ClassesView,
        EnrollmentDialog,
        EnrollmentsView,
        ListStatus,
        Notification,
        NotificationLevel
    )),
    tags(
        (name = "console", description = "Service endpoints"),
        (name = "classes", description = "Cultural classes page events"),
        (name = "enrollments", description = "Enrollments page events")
    )
)]
pub struct ApiDoc;
