/// Terminal derived-data fetch engine.
///
/// Same generation/loading discipline as the cascade engine, but keyed off
/// a single upstream value with nothing downstream of it: no selector to
/// re-enable, no children to reset. Used for the two chart series (keyed
/// on the raw location id) and the weather summary (keyed on the resolved
/// location).

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::model::FetchState;
use crate::stream::replay::{ReplayCache, ReplayStream};

/// Spawns a derived stream and returns its state stream.
///
/// A `None` key publishes `{result: None, loading: false}` without
/// fetching. A non-null key publishes `{result: <unchanged>, loading:
/// true}`, issues `fetch`, and on settle of the still-current generation
/// publishes the outcome; a failed settle publishes a null result and logs
/// the error. Settles of superseded generations are discarded.
pub fn spawn_derived<K, R, F, Fut>(
    mut key: ReplayStream<Option<K>>,
    fetch: F,
    stream_name: &'static str,
) -> ReplayStream<FetchState<R>>
where
    K: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    F: Fn(K) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<R>, ProviderError>> + Send + 'static,
{
    let output = ReplayCache::new(FetchState::idle());
    let stream = output.subscribe();

    tokio::spawn(async move {
        let (settle_tx, mut settle_rx) =
            mpsc::unbounded_channel::<(u64, Result<Option<R>, ProviderError>)>();
        let mut generation: u64 = 0;

        loop {
            tokio::select! {
                biased;

                next = key.changed() => {
                    let Some(next) = next else { break };
                    generation += 1;
                    match next {
                        None => {
                            output.publish(FetchState::idle());
                        }
                        Some(value) => {
                            let result = output.latest().result;
                            output.publish(FetchState { result, loading: true });
                            debug!(stream = stream_name, generation, "issuing derived fetch");

                            let settle = settle_tx.clone();
                            let fetch_generation = generation;
                            let in_flight = fetch(value);
                            tokio::spawn(async move {
                                let _ = settle.send((fetch_generation, in_flight.await));
                            });
                        }
                    }
                }

                Some((fetch_generation, outcome)) = settle_rx.recv() => {
                    if fetch_generation != generation {
                        debug!(
                            stream = stream_name,
                            fetch_generation,
                            current_generation = generation,
                            "discarding superseded fetch result"
                        );
                        continue;
                    }

                    let result = match outcome {
                        Ok(result) => result,
                        Err(err) => {
                            warn!(
                                stream = stream_name,
                                error = %err,
                                detail = err.detail().unwrap_or(""),
                                "derived fetch failed"
                            );
                            None
                        }
                    };

                    output.publish(FetchState { result, loading: false });
                }
            }
        }
    });

    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::watch;
    use tokio::time::{sleep, Duration};

    fn key_channel() -> (watch::Sender<Option<&'static str>>, ReplayStream<Option<&'static str>>) {
        let (tx, rx) = watch::channel(None);
        (tx, rx.into())
    }

    fn scripted_fetch(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(&'static str) -> std::pin::Pin<Box<dyn Future<Output = Result<Option<String>, ProviderError>> + Send>>
    {
        move |key: &'static str| {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                match key {
                    "fail" => Err(ProviderError::Network { detail: "connection refused".into() }),
                    "slow" => {
                        sleep(Duration::from_millis(100)).await;
                        Ok(Some(format!("{}-data", key)))
                    }
                    _ => {
                        sleep(Duration::from_millis(10)).await;
                        Ok(Some(format!("{}-data", key)))
                    }
                }
            })
        }
    }

    async fn drain() {
        sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_key_publishes_idle_without_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, key) = key_channel();
        let out = spawn_derived(key, scripted_fetch(calls.clone()), "gage_height");

        tx.send_replace(None);
        drain().await;

        let state = out.current();
        assert!(state.result.is_none());
        assert!(!state.loading);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_key_wins_regardless_of_settle_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, key) = key_channel();
        let out = spawn_derived(key, scripted_fetch(calls.clone()), "gage_height");

        tx.send_replace(Some("slow"));
        drain().await;
        tx.send_replace(Some("fast"));

        sleep(Duration::from_millis(200)).await;
        assert_eq!(
            out.current().result.as_deref(),
            Some("fast-data"),
            "the superseded slow settle must be discarded"
        );
        assert!(!out.current().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_publishes_null_result_with_loading_cleared() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, key) = key_channel();
        let out = spawn_derived(key, scripted_fetch(calls.clone()), "streamflow");

        tx.send_replace(Some("fail"));
        drain().await;

        let state = out.current();
        assert!(state.result.is_none(), "no error value reaches the stream output");
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_previous_result_is_kept_while_reloading() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, key) = key_channel();
        let out = spawn_derived(key, scripted_fetch(calls.clone()), "gage_height");

        tx.send_replace(Some("first"));
        sleep(Duration::from_millis(20)).await;
        assert_eq!(out.current().result.as_deref(), Some("first-data"));

        tx.send_replace(Some("slow"));
        drain().await;

        let reloading = out.current();
        assert!(reloading.loading);
        assert_eq!(
            reloading.result.as_deref(),
            Some("first-data"),
            "the stale result stays visible until the replacement settles"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_the_key_discards_an_in_flight_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, key) = key_channel();
        let out = spawn_derived(key, scripted_fetch(calls.clone()), "weather");

        tx.send_replace(Some("slow"));
        drain().await;
        tx.send_replace(None);
        drain().await;

        assert!(out.current().result.is_none());

        sleep(Duration::from_millis(200)).await;
        assert!(
            out.current().result.is_none(),
            "a settle arriving after the key was cleared must be discarded"
        );
    }
}
