pub mod classes;
pub mod enrollments;

pub use classes::{ClassDialog, ClassRow, ClassesPage, ClassesView};
pub use enrollments::{EnrollmentDialog, EnrollmentFetch, EnrollmentsPage, EnrollmentsView};
