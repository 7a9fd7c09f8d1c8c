use thiserror::Error;

/// Failures surfaced to whoever asked for a document.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Company settings not found: {0}")]
    MissingCompanySettings(String),
    #[error("Failed to load company settings: {0}")]
    Settings(String),
    #[error("Failed to generate PDF: {0}")]
    Render(String),
}

impl ReportError {
    /// Precondition failures happen before any page is drawn.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ReportError::MissingCompanySettings(_) | ReportError::Settings(_))
    }
}

/// Object storage and image fetch failures. These never leave the resolver.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no signed URL returned for {0}")]
    MissingUrl(String),
    #[error("image decode failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_errors_carry_context_prefix() {
        let err = ReportError::Render("font table missing".into());
        assert_eq!(err.to_string(), "Failed to generate PDF: font table missing");
        assert!(!err.is_precondition());
    }

    #[test]
    fn missing_settings_is_a_precondition() {
        assert!(ReportError::MissingCompanySettings("no row".into()).is_precondition());
        assert!(ReportError::Settings("timeout".into()).is_precondition());
    }
}
