/// Selected-location resolution.
///
/// Recombines the raw location-id selection with the most recent locations
/// collection to produce the full location entity. Pure synchronous
/// derivation (no fetch, no loading flag), re-run on every emission from
/// either input, including ones that leave the resolved value unchanged.

use tracing::debug;

use crate::model::{CollectionResult, MonitoringLocation};
use crate::stream::replay::{ReplayCache, ReplayStream};

/// Spawns the resolver and returns the resolved-location stream.
///
/// `None` when no id is selected, or when the selected id is absent from
/// the current collection (a selection made against a now-superseded
/// list).
pub fn spawn_resolver(
    mut location_id: ReplayStream<Option<String>>,
    mut locations: ReplayStream<CollectionResult<MonitoringLocation>>,
) -> ReplayStream<Option<MonitoringLocation>> {
    let output = ReplayCache::new(None);
    let stream = output.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                next = location_id.changed() => {
                    if next.is_none() { break; }
                }
                next = locations.changed() => {
                    if next.is_none() { break; }
                }
            }

            let id = location_id.current();
            let collection = locations.current();
            let resolved = id
                .as_deref()
                .and_then(|id| collection.items.iter().find(|l| l.id == id).cloned());

            if let Some(id) = id.as_deref() {
                if resolved.is_none() {
                    debug!(location_id = id, "selected id not present in current collection");
                }
            }

            output.publish(resolved);
        }
    });

    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::watch;
    use tokio::time::{sleep, Duration};

    fn location(id: &str) -> MonitoringLocation {
        MonitoringLocation {
            id: id.to_string(),
            name: format!("Site {}", id),
            location_type: "Stream".to_string(),
            county_name: "Peoria County".to_string(),
            latitude: 40.5,
            longitude: -89.9,
        }
    }

    fn harness() -> (
        watch::Sender<Option<String>>,
        ReplayCache<CollectionResult<MonitoringLocation>>,
        ReplayStream<Option<MonitoringLocation>>,
    ) {
        let (id_tx, id_rx) = watch::channel(None);
        let collection = ReplayCache::new(CollectionResult::empty());
        let resolved = spawn_resolver(id_rx.into(), collection.subscribe());
        (id_tx, collection, resolved)
    }

    async fn drain() {
        sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_selected_id_against_current_collection() {
        let (id_tx, collection, resolved) = harness();

        collection.publish(CollectionResult::ready(vec![location("A"), location("B")]));
        id_tx.send_replace(Some("B".to_string()));
        drain().await;

        assert_eq!(resolved.current().map(|l| l.id), Some("B".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_id_absent_from_collection_resolves_to_none() {
        let (id_tx, collection, resolved) = harness();

        collection.publish(CollectionResult::ready(vec![location("A")]));
        id_tx.send_replace(Some("B".to_string()));
        drain().await;

        assert!(resolved.current().is_none(), "an id not in the list must not resolve");
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_id_resolves_to_none() {
        let (id_tx, collection, resolved) = harness();

        collection.publish(CollectionResult::ready(vec![location("A")]));
        id_tx.send_replace(None);
        drain().await;

        assert!(resolved.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collection_update_rederives_an_earlier_miss() {
        let (id_tx, collection, resolved) = harness();

        // Selection arrives before the collection contains it.
        id_tx.send_replace(Some("A".to_string()));
        drain().await;
        assert!(resolved.current().is_none());

        // The collection catching up re-runs the derivation.
        collection.publish(CollectionResult::ready(vec![location("A")]));
        drain().await;
        assert_eq!(resolved.current().map(|l| l.id), Some("A".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_collection_invalidates_the_resolution() {
        let (id_tx, collection, resolved) = harness();

        collection.publish(CollectionResult::ready(vec![location("A")]));
        id_tx.send_replace(Some("A".to_string()));
        drain().await;
        assert!(resolved.current().is_some());

        // A new collection without the id arrives (different county).
        collection.publish(CollectionResult::ready(vec![location("C")]));
        drain().await;
        assert!(
            resolved.current().is_none(),
            "a selection made against a superseded list must stop resolving"
        );
    }
}
