//! UI/backend events and error modeling for the estimator GUI.

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    /// Prediction accepted; the result panel should open at zero.
    PredictionReady { rendered: String },
    /// One frame of the count-up toward the settled price.
    PriceFrame { rendered: String },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Rejection,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Predict,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("could not reach")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("timed out")
            || lower.contains("startup failure")
        {
            UiErrorCategory::Transport
        } else if context == UiErrorContext::Predict {
            UiErrorCategory::Rejection
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connectivity_messages_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::Predict,
            "Could not reach the prediction service. Check that the backend is running.",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_backend_rejections_by_context() {
        let err = UiError::from_message(UiErrorContext::Predict, "missing feature: overall_qual");
        assert_eq!(err.category(), UiErrorCategory::Rejection);
        assert_eq!(err.message(), "missing feature: overall_qual");
    }

    #[test]
    fn classifies_worker_startup_failures_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime: boom",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
    }
}
