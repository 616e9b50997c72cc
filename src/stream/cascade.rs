/// Dependent-collection fetch engine.
///
/// One cascade level watches a parent selector value and keeps the child
/// collection for it current: state → counties, county → locations. The
/// level owns exactly one loading flag and one collection slot, both
/// written only here.
///
/// Supersession: each trigger increments a generation counter and the
/// fetch is dispatched with its captured generation. A settle whose
/// generation no longer matches the current one is discarded, success or
/// failure alike; its result never reaches the published collection. The
/// in-flight request itself is left to complete; correctness depends only
/// on discarding, not on aborting.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::model::{CollectionResult, SelectorControl};
use crate::stream::replay::{ReplayCache, ReplayStream};

/// Spawns a cascade level and returns its collection stream.
///
/// On a `None` parent the level publishes the empty collection without
/// fetching: "nothing to load", not "loading nothing". On a non-null
/// parent it publishes `{items: <unchanged>, loading: true}`, issues
/// `fetch`, and on settle publishes the result (or the empty collection on
/// failure, logged) and re-enables `control`. Results are observed in the
/// order triggers were issued, never in settle order.
pub fn spawn_cascade<P, C, F, Fut>(
    mut parent: ReplayStream<Option<P>>,
    control: ReplayCache<SelectorControl>,
    fetch: F,
    stream_name: &'static str,
) -> ReplayStream<CollectionResult<C>>
where
    P: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
    F: Fn(P) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<C>, ProviderError>> + Send + 'static,
{
    let output = ReplayCache::new(CollectionResult::empty());
    let stream = output.subscribe();

    tokio::spawn(async move {
        let (settle_tx, mut settle_rx) =
            mpsc::unbounded_channel::<(u64, Result<Vec<C>, ProviderError>)>();
        let mut generation: u64 = 0;

        loop {
            tokio::select! {
                // Triggers take priority over settles: when both are ready
                // the settle belongs to a superseded generation.
                biased;

                next = parent.changed() => {
                    let Some(next) = next else { break };
                    generation += 1;
                    match next {
                        None => {
                            output.publish(CollectionResult::empty());
                        }
                        Some(value) => {
                            let items = output.latest().items;
                            output.publish(CollectionResult { items, loading: true });
                            debug!(stream = stream_name, generation, "issuing collection fetch");

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

                    let items = match outcome {
                        Ok(items) => items,
                        Err(err) => {
                            warn!(
                                stream = stream_name,
                                error = %err,
                                detail = err.detail().unwrap_or(""),
                                "collection fetch failed"
                            );
                            Vec::new()
                        }
                    };

                    output.publish(CollectionResult { items, loading: false });
                    control.publish(SelectorControl::EnabledEmpty);
                }
            }
        }
    });

    stream
}
