//! Conversions from external infrastructure errors into domain errors.

use harvest_domain::constants::CONFLICT_STATUS;
use harvest_domain::HarvestError;
use reqwest::{Error as HttpError, StatusCode};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HarvestError);

impl From<InfraError> for HarvestError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HarvestError> for InfraError {
    fn from(value: HarvestError) -> Self {
        InfraError(value)
    }
}

trait IntoHarvestError {
    fn into_harvest(self) -> HarvestError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → HarvestError */
/* -------------------------------------------------------------------------- */

/// Map a non-success HTTP status plus response body onto the error taxonomy.
///
/// 409 is the upstream's scheduling-conflict signal and keeps its status so
/// the pause controller can tell it apart from other client errors.
pub fn status_error(status: StatusCode, body: &str) -> HarvestError {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let detail = body.trim();
    let message = if detail.is_empty() {
        format!("HTTP {code} {reason}")
    } else {
        format!("HTTP {code} {reason}: {}", truncate(detail, 200))
    };

    match code {
        401 | 403 => HarvestError::Auth(message),
        404 => HarvestError::NotFound(message),
        CONFLICT_STATUS => HarvestError::Conflict { status: code, message },
        429 => HarvestError::Network(message),
        400..=499 => HarvestError::InvalidInput(message),
        _ => HarvestError::Network(message),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → HarvestError */
/* -------------------------------------------------------------------------- */

impl IntoHarvestError for HttpError {
    fn into_harvest(self) -> HarvestError {
        if self.is_timeout() {
            return HarvestError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return HarvestError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return HarvestError::InvalidInput(format!("HTTP response could not be decoded: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, "");
        }

        HarvestError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_harvest())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error / std::io::Error → HarvestError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(HarvestError::InvalidInput(format!("malformed JSON: {value}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        let error = match value.kind() {
            std::io::ErrorKind::NotFound => HarvestError::NotFound(value.to_string()),
            _ => HarvestError::Io(value.to_string()),
        };
        InfraError(error)
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
