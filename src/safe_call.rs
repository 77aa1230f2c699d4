use std::{any::Any, panic::AssertUnwindSafe};

use futures_util::FutureExt;

use crate::result::{ErrorResult, Outcome};

/// Runs `operation` and turns any failure it raises into [`Outcome::Error`].
///
/// A returned outcome is passed through unchanged. An `Err` or a panic escaping the
/// operation becomes `Error(ErrorResult { message: error_message, cause }, None)`, so a
/// use case built on this never unwinds into its caller.
pub async fn safe_call<T, F, Fut>(operation: F, error_message: impl Into<String>) -> Outcome<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Outcome<T>>>,
{
    let caught = AssertUnwindSafe(async move { operation().await })
        .catch_unwind()
        .await;

    let (cause, panicked) = match caught {
        Ok(Ok(outcome)) => return outcome,
        Ok(Err(err)) => (err, false),
        Err(payload) => (panic_to_error(payload), true),
    };

    let error_message = error_message.into();
    tracing::warn!(message = %error_message, cause = ?cause, panicked, "safe_call contained a failure");
    Outcome::Error(ErrorResult::caused_by(error_message, cause), None)
}

fn panic_to_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    anyhow::anyhow!("panicked: {message}")
}
