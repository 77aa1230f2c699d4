use std::{fmt, sync::Arc};

/// Tri-state outcome of an operation that reports progress.
///
/// `Running` and `Error` may carry a best-known value so callers can keep showing
/// cached data while a refresh is in flight or after it failed.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "Outcome should be matched"]
pub enum Outcome<T> {
    Running(Option<T>),
    Success(T),
    Error(ErrorResult, Option<T>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum OutcomeKind {
    #[display("running")]
    Running,
    #[display("success")]
    Success,
    #[display("error")]
    Error,
}

impl<T> Outcome<T> {
    pub fn running() -> Self {
        Outcome::Running(None)
    }

    pub fn success(data: T) -> Self {
        Outcome::Success(data)
    }

    pub fn error(error: ErrorResult) -> Self {
        Outcome::Error(error, None)
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Running(_) => OutcomeKind::Running,
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::Error(_, _) => OutcomeKind::Error,
        }
    }

    /// `true` for `Success` and `Error`.
    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Outcome::Running(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_, _))
    }

    /// Payload of whichever variant is active.
    pub fn get_or_none(&self) -> Option<&T> {
        match self {
            Outcome::Running(data) | Outcome::Error(_, data) => data.as_ref(),
            Outcome::Success(data) => Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Running(data) | Outcome::Error(_, data) => data,
            Outcome::Success(data) => Some(data),
        }
    }

    pub fn error_or_none(&self) -> Option<&ErrorResult> {
        match self {
            Outcome::Error(error, _) => Some(error),
            _ => None,
        }
    }

    /// Transforms the payload, keeping the variant and the error untouched.
    ///
    /// An absent payload stays absent and `transform` is not called for it.
    pub fn map<U, F: FnOnce(T) -> U>(self, transform: F) -> Outcome<U> {
        match self {
            Outcome::Running(data) => Outcome::Running(data.map(transform)),
            Outcome::Success(data) => Outcome::Success(transform(data)),
            Outcome::Error(error, data) => Outcome::Error(error, data.map(transform)),
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Running(data) => Outcome::Running(data.as_ref()),
            Outcome::Success(data) => Outcome::Success(data),
            Outcome::Error(error, data) => Outcome::Error(error.clone(), data.as_ref()),
        }
    }

    /// Replaces the optional payload of `Running` and `Error`.
    ///
    /// `Success` always holds data, so a `None` leaves it as is.
    pub fn with_data(self, data: Option<T>) -> Self {
        match self {
            Outcome::Running(_) => Outcome::Running(data),
            Outcome::Error(error, _) => Outcome::Error(error, data),
            Outcome::Success(current) => Outcome::Success(data.unwrap_or(current)),
        }
    }

    /// `None` while the operation is still running.
    pub fn into_result(self) -> Option<Result<T, ErrorResult>> {
        match self {
            Outcome::Running(_) => None,
            Outcome::Success(data) => Some(Ok(data)),
            Outcome::Error(error, _) => Some(Err(error)),
        }
    }
}

impl<T> From<anyhow::Result<T>> for Outcome<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(data) => Outcome::Success(data),
            Err(err) => Outcome::Error(ErrorResult::from(err), None),
        }
    }
}

/// Payload of [`Outcome::Error`].
#[derive(Debug, Clone, Default)]
pub struct ErrorResult {
    pub message: Option<String>,
    pub cause: Option<Arc<anyhow::Error>>,
}

impl ErrorResult {
    pub fn new(message: Option<String>, cause: Option<anyhow::Error>) -> Self {
        Self {
            message,
            cause: cause.map(Arc::new),
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            cause: None,
        }
    }

    pub fn caused_by(message: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::new(Some(message.into()), Some(cause))
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }
}

impl From<anyhow::Error> for ErrorResult {
    fn from(err: anyhow::Error) -> Self {
        Self::new(Some(err.to_string()), Some(err))
    }
}

// Causes compare by identity: two results are equal only when they share the same failure.
impl PartialEq for ErrorResult {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.message == other.message && same_cause
    }
}

impl fmt::Display for ErrorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.cause) {
            (Some(message), _) => write!(f, "{message}"),
            (None, Some(cause)) => write!(f, "{cause}"),
            (None, None) => write!(f, "unknown error"),
        }
    }
}

impl std::error::Error for ErrorResult {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| &**cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(feature = "serde")]
mod impl_serde {
    use serde::{Serialize, Serializer, ser::SerializeStruct};

    use super::{ErrorResult, Outcome};

    #[derive(Serialize)]
    struct ErrorView<'a> {
        message: Option<&'a str>,
        cause: Option<String>,
    }

    impl<'a> From<&'a ErrorResult> for ErrorView<'a> {
        fn from(error: &'a ErrorResult) -> Self {
            ErrorView {
                message: error.message(),
                cause: error.cause().map(|cause| format!("{cause:#}")),
            }
        }
    }

    impl Serialize for ErrorResult {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            ErrorView::from(self).serialize(serializer)
        }
    }

    impl<T: Serialize> Serialize for Outcome<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let fields = if self.is_error() { 3 } else { 2 };
            let mut state = serializer.serialize_struct("Outcome", fields)?;
            state.serialize_field("status", &self.kind().to_string())?;
            state.serialize_field("data", &self.get_or_none())?;
            if let Some(error) = self.error_or_none() {
                state.serialize_field("error", error)?;
            }
            state.end()
        }
    }
}
