use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::Facets;
use crate::models::{Category, Complaint, ComplaintId, Priority, Role, Status};

// -- Session claims --

/// JWT claims carried by every authenticated request. `sub` is the student
/// identifier, or `admin` for the administrator session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub identifier: String,
    pub secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub identifier: String,
    pub secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub identifier: String,
    pub role: Role,
    pub token: String,
}

// -- Complaints --

/// Category and priority arrive as text so that a blank selection can be
/// reported as a missing field rather than a malformed body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitComplaintRequest {
    pub name: String,
    pub submitter_id: String,
    pub category: String,
    pub priority: String,
    pub details: String,
    #[serde(default)]
    pub attachment: Option<AttachmentUpload>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    /// Base64 (standard alphabet) file contents.
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub sha256: String,
}

/// Complaint as shown to clients. Attachment bytes are fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintView {
    pub id: ComplaintId,
    pub name: String,
    pub submitter_id: String,
    pub category: Category,
    pub priority: Priority,
    pub details: String,
    pub status: Status,
    pub note: Option<String>,
    pub attachment: Option<AttachmentInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Complaint> for ComplaintView {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id,
            name: c.submitter_name.clone(),
            submitter_id: c.submitter_id.clone(),
            category: c.category,
            priority: c.priority,
            details: c.details.clone(),
            status: c.status,
            note: c.note.clone(),
            attachment: c.attachment.as_ref().map(|a| AttachmentInfo {
                file_name: a.file_name.clone(),
                content_type: a.content_type.clone(),
                size: a.size(),
                sha256: a.sha256.clone(),
            }),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Public status lookup. Leaves out who filed the complaint, what they
/// wrote, and the attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintStatusView {
    pub id: ComplaintId,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Complaint> for ComplaintStatusView {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id,
            category: c.category,
            priority: c.priority,
            status: c.status,
            note: c.note.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComplaintListResponse {
    pub complaints: Vec<ComplaintView>,
    pub facets: Facets,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: Status,
    /// Omitted keeps the current note; an empty string clears it.
    #[serde(default)]
    pub note: Option<String>,
}

/// Outcome of the resolution email for a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailOutcome {
    /// No email was due (status unchanged, or not a resolution).
    Skipped,
    Sent,
    Failed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub complaint: ComplaintView,
    pub changed: bool,
    pub notified: bool,
    pub email: EmailOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// -- Notifications --

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub identifier: String,
    pub notifications: Vec<String>,
}
