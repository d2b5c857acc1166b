use axum::{
    Extension,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tracing::info;

use dcw_types::api::Claims;
use dcw_types::models::{ComplaintId, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /complaints/{id}/attachment: the uploaded proof, byte for byte,
/// under its original file name. Admins may fetch any attachment, students
/// only those on complaints they filed.
pub async fn download_attachment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let complaint = state.store.get(ComplaintId(id))?;

    if claims.role != Role::Admin && complaint.submitted_by != claims.sub {
        return Err(ApiError::Forbidden("access denied".into()));
    }

    let attachment = complaint
        .attachment
        .ok_or_else(|| ApiError::NotFound(format!("complaint {id} has no attachment")))?;

    let content_type = HeaderValue::from_str(&attachment.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&attachment.file_name))
        .map_err(|e| ApiError::Internal(format!("bad disposition header: {e}")))?;

    info!(complaint = id, file = %attachment.file_name, by = %claims.sub, "Attachment downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        attachment.data,
    )
        .into_response())
}

/// `attachment; filename="<ascii fallback>"; filename*=UTF-8''<encoded>`.
/// The RFC 5987 form carries the exact original name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for b in file_name.bytes() {
        if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
            encoded.push(b as char);
        } else {
            encoded.push_str(&format!("%{b:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(
            content_disposition("proof.png"),
            "attachment; filename=\"proof.png\"; filename*=UTF-8''proof.png"
        );
    }

    #[test]
    fn quotes_and_unicode_are_escaped() {
        let header = content_disposition("my \"bill\" é.pdf");
        assert!(header.starts_with("attachment; filename=\"my _bill_ _.pdf\""));
        assert!(header.ends_with("filename*=UTF-8''my%20%22bill%22%20%C3%A9.pdf"));
        assert!(HeaderValue::from_str(&header).is_ok());
    }
}
