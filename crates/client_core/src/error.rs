use thiserror::Error;

/// Failure modes of one prediction request. Application-level
/// rejections carry the backend's message; everything else collapses
/// into the transport variant, since a non-2xx status, an unreachable
/// host, and an unparsable body are all recovered the same way.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction rejected: {0}")]
    Rejected(String),
    #[error("prediction rejected without an explanation")]
    RejectedUnspecified,
    #[error("prediction response reported success but carried no price")]
    MissingPrice,
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PredictError {
    /// The single user-visible message for this failure. The backend's
    /// own wording wins when it provided one; everything else degrades
    /// to a fixed message.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Rejected(message) => message.clone(),
            PredictError::RejectedUnspecified | PredictError::MissingPrice => {
                "Prediction failed. Please try again.".to_string()
            }
            PredictError::Transport(_) => {
                "Could not reach the prediction service. Check that the backend is running."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_is_surfaced_verbatim() {
        let err = PredictError::Rejected("missing feature: overall_qual".to_string());
        assert_eq!(err.user_message(), "missing feature: overall_qual");
    }

    #[test]
    fn unspecified_rejection_degrades_to_generic_message() {
        assert_eq!(
            PredictError::RejectedUnspecified.user_message(),
            "Prediction failed. Please try again."
        );
        assert_eq!(
            PredictError::MissingPrice.user_message(),
            "Prediction failed. Please try again."
        );
    }
}
