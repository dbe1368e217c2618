//! Domain model for the signed-in student.
use serde::{Deserialize, Serialize};

/// Identity of the student a portal session acts for.
///
/// Authentication happens upstream; this context is passed explicitly
/// wherever records are read or written, so nothing in the backend reads an
/// ambient current-user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentContext {
    pub student_id: String,
    /// Shown in greetings and receipts when known
    pub display_name: Option<String>,
}

impl StudentContext {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(student_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            display_name: Some(display_name.into()),
        }
    }
}
