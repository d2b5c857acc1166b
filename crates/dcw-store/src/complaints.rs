use std::str::FromStr;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use dcw_types::filter::{ComplaintFilter, Facets, Stats};
use dcw_types::models::{
    Attachment, Category, Complaint, ComplaintId, Priority, Status, UnknownVariant,
};

use crate::notifications::resolution_message;
use crate::{Store, StoreError, StoreState};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A complaint as filed, before the store assigns an id and status.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub name: String,
    pub submitter_id: String,
    pub category: Category,
    pub priority: Priority,
    pub details: String,
    pub attachment: Option<NewAttachment>,
    pub submitted_by: String,
}

#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Parse a form selection. Blank input is a missing field.
pub fn parse_choice<T>(field: &str, raw: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(StoreError::missing(field));
    }
    raw.parse()
        .map_err(|e: UnknownVariant| StoreError::Validation(e.to_string()))
}

/// Result of a status update. `notice` is set only when the update moved
/// the complaint to `Resolved`; the notification has already been queued.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub complaint: Complaint,
    pub previous: Status,
    pub note_updated: bool,
    pub notice: Option<ResolutionNotice>,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.previous != self.complaint.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionNotice {
    pub complaint_id: ComplaintId,
    pub recipient: String,
    pub category: Category,
    pub message: String,
    /// Admin note at the time of resolution, for the email.
    pub note: Option<String>,
}

impl Store {
    pub fn submit(&self, new: NewComplaint) -> Result<ComplaintId, StoreError> {
        if new.name.trim().is_empty() {
            return Err(StoreError::missing("name"));
        }
        if new.submitter_id.trim().is_empty() {
            return Err(StoreError::missing("submitter_id"));
        }
        if new.details.trim().is_empty() {
            return Err(StoreError::missing("details"));
        }

        let attachment = match new.attachment {
            Some(upload) => {
                if upload.file_name.trim().is_empty() {
                    return Err(StoreError::missing("attachment file name"));
                }
                let sha256 = hex::encode(Sha256::digest(&upload.data));
                Some(Attachment {
                    file_name: upload.file_name,
                    content_type: upload
                        .content_type
                        .filter(|ct| !ct.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                    data: upload.data,
                    sha256,
                })
            }
            None => None,
        };

        let now = Utc::now();
        let id = self.with_state_mut(|s| {
            s.last_id += 1;
            let id = ComplaintId(s.last_id);
            s.complaints.push(Complaint {
                id,
                submitter_name: new.name,
                submitter_id: new.submitter_id,
                category: new.category,
                priority: new.priority,
                details: new.details,
                attachment,
                status: Status::Pending,
                note: None,
                submitted_by: new.submitted_by,
                created_at: now,
                updated_at: now,
            });
            id
        });

        info!(%id, category = %new.category, priority = %new.priority, "Complaint submitted");
        Ok(id)
    }

    pub fn get(&self, id: ComplaintId) -> Result<Complaint, StoreError> {
        self.with_state(|s| s.find(id).cloned())
            .ok_or(StoreError::NotFound(id))
    }

    /// Complaints passing `filter`, in submission order.
    pub fn list(&self, filter: &ComplaintFilter) -> Vec<Complaint> {
        self.with_state(|s| {
            s.complaints
                .iter()
                .filter(|c| filter.matches(c))
                .cloned()
                .collect()
        })
    }

    /// Complaints filed from a given account.
    pub fn list_submitted_by(&self, account: &str) -> Vec<Complaint> {
        self.with_state(|s| {
            s.complaints
                .iter()
                .filter(|c| c.submitted_by == account)
                .cloned()
                .collect()
        })
    }

    pub fn facets(&self) -> Facets {
        self.with_state(|s| Facets::observe(&s.complaints))
    }

    pub fn stats(&self, filter: &ComplaintFilter) -> Stats {
        self.with_state(|s| Stats::tally(s.complaints.iter().filter(|c| filter.matches(c))))
    }

    pub fn complaint_count(&self) -> usize {
        self.with_state(|s| s.complaints.len())
    }

    /// Set a complaint's status. Only an actual change touches the record,
    /// and only a change to `Resolved` queues a notification for the
    /// submitter. Going back to `Pending` is silent.
    pub fn update_status(
        &self,
        id: ComplaintId,
        status: Status,
    ) -> Result<StatusChange, StoreError> {
        self.update_status_with_note(id, status, None)
    }

    /// Like [`Store::update_status`], also replacing the admin note. `None`
    /// keeps the current note; a blank note clears it.
    pub fn update_status_with_note(
        &self,
        id: ComplaintId,
        status: Status,
        note: Option<&str>,
    ) -> Result<StatusChange, StoreError> {
        let note = note.map(|n| Some(n.trim()).filter(|n| !n.is_empty()).map(str::to_string));

        let change = self.with_state_mut(|s| -> Result<StatusChange, StoreError> {
            let complaint = s.find_mut(id).ok_or(StoreError::NotFound(id))?;
            let previous = complaint.status;
            let note_updated = note.as_ref().is_some_and(|n| *n != complaint.note);

            if previous == status && !note_updated {
                return Ok(StatusChange {
                    complaint: complaint.clone(),
                    previous,
                    note_updated,
                    notice: None,
                });
            }

            complaint.status = status;
            if let Some(note) = note {
                complaint.note = note;
            }
            complaint.updated_at = Utc::now();
            let snapshot = complaint.clone();

            let notice = (status == Status::Resolved && previous != status).then(|| {
                ResolutionNotice {
                    complaint_id: id,
                    recipient: snapshot.submitter_id.clone(),
                    category: snapshot.category,
                    message: resolution_message(snapshot.category),
                    note: snapshot.note.clone(),
                }
            });
            if let Some(notice) = &notice {
                s.push_notification(&notice.recipient, notice.message.clone());
            }

            Ok(StatusChange {
                complaint: snapshot,
                previous,
                note_updated,
                notice,
            })
        })?;

        if change.changed() {
            info!(%id, from = %change.previous, to = %status, "Complaint status changed");
        } else {
            debug!(%id, %status, "Status unchanged");
        }
        if change.note_updated {
            debug!(%id, "Admin note updated");
        }
        Ok(change)
    }
}

impl StoreState {
    fn find(&self, id: ComplaintId) -> Option<&Complaint> {
        self.complaints
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.complaints[i])
    }

    fn find_mut(&mut self, id: ComplaintId) -> Option<&mut Complaint> {
        self.complaints
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &mut self.complaints[i])
    }
}
