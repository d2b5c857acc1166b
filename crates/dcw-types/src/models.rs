use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A text value that did not name any variant of the expected enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of named values with `Display`, `FromStr` and a
/// `ALL` table. Parsing is exact (case-sensitive), matching what the forms send.
macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

named_enum!(
    /// Area of campus life a complaint concerns.
    Category,
    "category",
    [Hostel, Canteen, Library, WiFi, Transport, Classroom, Lab, Mess, Sports, Maintenance, Other]
);

named_enum!(Priority, "priority", [High, Medium, Low]);

named_enum!(
    /// Lifecycle of a complaint. Every complaint starts out `Pending`.
    Status,
    "status",
    [Pending, Resolved]
);

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

/// Stable complaint identifier, assigned from a counter at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(pub u64);

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof file uploaded alongside a complaint. Bytes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    /// Hex-encoded SHA-256 of `data`.
    pub sha256: String,
}

impl Attachment {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    pub id: ComplaintId,
    pub submitter_name: String,
    /// Student ID or email typed into the form. Resolution notices go here.
    pub submitter_id: String,
    pub category: Category,
    pub priority: Priority,
    pub details: String,
    pub attachment: Option<Attachment>,
    pub status: Status,
    /// Free text left by the admin, shown on status lookups and appended to
    /// the resolution email.
    pub note: Option<String>,
    /// Account that was signed in when the complaint was filed.
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who a session token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}
