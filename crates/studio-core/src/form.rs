use crate::constants::FORM_FAILURE_MESSAGE;

/// Result of posting the contact form in the background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { status: u16 },
    NetworkError(String),
}

impl SubmitOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Accepted
        } else {
            Self::Rejected { status }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Blocking alert text for failures; `None` on success.
    pub fn alert_message(&self) -> Option<&'static str> {
        if self.is_success() {
            None
        } else {
            Some(FORM_FAILURE_MESSAGE)
        }
    }
}
