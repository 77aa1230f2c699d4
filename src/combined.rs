use futures_util::Stream;

use crate::result::Outcome;

/// Streams exactly three states for a cached-then-fresh lookup:
/// `Running(None)`, `Running(local)`, then the remote outcome.
///
/// A remote `Error` is re-emitted carrying the local value as its data. The lookups run
/// one after the other and lazily: `local` starts when the second item is polled and
/// `remote` when the third is. Dropping the stream early skips whatever has not started
/// and cancels whatever is in flight.
///
/// A lookup returning `Err` is yielded as is and ends the stream. Wrap `remote` in
/// [`crate::safe_call::safe_call`] to turn its failures into an `Outcome::Error` instead.
pub fn combined_call<T, L, LF, R, RF>(
    local: L,
    remote: R,
) -> impl Stream<Item = anyhow::Result<Outcome<T>>>
where
    T: Clone,
    L: FnOnce() -> LF,
    LF: Future<Output = anyhow::Result<Option<T>>>,
    R: FnOnce() -> RF,
    RF: Future<Output = anyhow::Result<Outcome<T>>>,
{
    async_stream::try_stream! {
        tracing::debug!("combined call started");
        yield Outcome::Running(None);

        let cached = local().await?;
        tracing::debug!(cached = cached.is_some(), "local lookup finished");
        yield Outcome::Running(cached.clone());

        let fresh = remote().await?;
        tracing::debug!(kind = %fresh.kind(), "remote lookup finished");
        if fresh.is_running() {
            tracing::warn!("remote lookup returned a running state, passing it through");
        }
        let settled = if fresh.is_error() {
            fresh.with_data(cached)
        } else {
            fresh
        };
        yield settled;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use futures_util::{StreamExt, TryStreamExt, pin_mut};

    use super::*;
    use crate::{result::ErrorResult, safe_call::safe_call};

    #[tokio::test]
    async fn fresh_data_wins() {
        let states: Vec<_> = combined_call(
            || async { Ok(Some("cached")) },
            || async { Ok(Outcome::Success("fresh")) },
        )
        .try_collect()
        .await
        .unwrap();

        assert_eq!(
            states,
            vec![
                Outcome::Running(None),
                Outcome::Running(Some("cached")),
                Outcome::Success("fresh"),
            ]
        );
    }

    #[tokio::test]
    async fn remote_error_falls_back_to_cache() {
        let error = ErrorResult::with_message("offline");
        let remote_error = error.clone();

        let states: Vec<_> = combined_call(
            || async { Ok(Some("cached")) },
            || async move { Ok(Outcome::Error(remote_error, None)) },
        )
        .try_collect()
        .await
        .unwrap();

        assert_eq!(states.len(), 3);
        assert_eq!(states[2], Outcome::Error(error, Some("cached")));
    }

    #[tokio::test]
    async fn remote_error_without_cache() {
        let states: Vec<Outcome<u8>> = combined_call(
            || async { Ok(None) },
            || async { Ok(Outcome::Error(ErrorResult::with_message("offline"), Some(9))) },
        )
        .try_collect()
        .await
        .unwrap();

        assert_eq!(states[1], Outcome::Running(None));
        assert_eq!(
            states[2],
            Outcome::Error(ErrorResult::with_message("offline"), None)
        );
    }

    #[tokio::test]
    async fn remote_running_passes_through() {
        let states: Vec<_> = combined_call(
            || async { Ok(Some(1)) },
            || async { Ok(Outcome::Running(Some(2))) },
        )
        .try_collect()
        .await
        .unwrap();

        assert_eq!(states[2], Outcome::Running(Some(2)));
    }

    #[tokio::test]
    async fn remote_wrapped_in_safe_call() {
        let states: Vec<Outcome<String>> = combined_call(
            || async { Ok(Some("cached".to_string())) },
            || async {
                let outcome =
                    safe_call(|| async { anyhow::bail!("connection reset") }, "refresh failed")
                        .await;
                Ok(outcome)
            },
        )
        .try_collect()
        .await
        .unwrap();

        let last = &states[2];
        assert_eq!(last.get_or_none().map(String::as_str), Some("cached"));
        assert_eq!(last.error_or_none().unwrap().message(), Some("refresh failed"));
    }

    #[tokio::test]
    async fn local_failure_ends_the_stream() {
        let remote_ran = Arc::new(AtomicBool::new(false));
        let flag = remote_ran.clone();

        let items: Vec<anyhow::Result<Outcome<u8>>> = combined_call(
            || async { Err(anyhow::anyhow!("cache io")) },
            move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(Outcome::Success(1))
            },
        )
        .collect()
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(*items[0].as_ref().unwrap(), Outcome::Running(None));
        assert_eq!(items[1].as_ref().unwrap_err().to_string(), "cache io");
        assert!(!remote_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn remote_failure_is_the_last_item() {
        let items: Vec<anyhow::Result<Outcome<u8>>> = combined_call(
            || async { Ok(Some(1)) },
            || async { Err(anyhow::anyhow!("socket closed")) },
        )
        .collect()
        .await;

        assert_eq!(items.len(), 3);
        assert_eq!(*items[1].as_ref().unwrap(), Outcome::Running(Some(1)));
        assert_eq!(items[2].as_ref().unwrap_err().to_string(), "socket closed");
    }

    #[tokio::test]
    async fn lookups_are_lazy_and_sequential() {
        let local_ran = Arc::new(AtomicBool::new(false));
        let remote_ran = Arc::new(AtomicBool::new(false));
        let (local_flag, remote_flag) = (local_ran.clone(), remote_ran.clone());
        let local_seen_by_remote = local_ran.clone();

        let stream = combined_call(
            move || async move {
                local_flag.store(true, Ordering::SeqCst);
                Ok(Some(1))
            },
            move || async move {
                assert!(local_seen_by_remote.load(Ordering::SeqCst));
                remote_flag.store(true, Ordering::SeqCst);
                Ok(Outcome::Success(2))
            },
        );
        pin_mut!(stream);

        assert_eq!(stream.next().await.unwrap().unwrap(), Outcome::Running(None));
        assert!(!local_ran.load(Ordering::SeqCst));

        assert_eq!(stream.next().await.unwrap().unwrap(), Outcome::Running(Some(1)));
        assert!(local_ran.load(Ordering::SeqCst));
        assert!(!remote_ran.load(Ordering::SeqCst));

        assert_eq!(stream.next().await.unwrap().unwrap(), Outcome::Success(2));
        assert!(remote_ran.load(Ordering::SeqCst));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn early_drop_skips_remote() {
        let remote_ran = Arc::new(AtomicBool::new(false));
        let flag = remote_ran.clone();

        let first_two: Vec<_> = combined_call(
            || async { Ok(Some(1)) },
            move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(Outcome::Success(2))
            },
        )
        .take(2)
        .collect()
        .await;

        assert_eq!(first_two.len(), 2);
        assert!(!remote_ran.load(Ordering::SeqCst));
    }
}
