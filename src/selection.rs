/// Cascading selection state: state → county → monitoring location.
///
/// Owns the three selector values and their control states. Every
/// operation is synchronous; in particular, choosing a new upstream value
/// clears and disables everything below it BEFORE the new value is
/// published, so no observer can ever pair a stale county or location
/// with a new state. The fetches themselves happen later, in the cascade
/// engines watching these values.

use tokio::sync::watch;
use tracing::warn;

use crate::model::{CountySelection, Selection, SelectorControl};
use crate::stream::replay::{ReplayCache, ReplayStream};

pub struct SelectionState {
    state_tx: watch::Sender<Option<String>>,
    county_tx: watch::Sender<Option<CountySelection>>,
    location_tx: watch::Sender<Option<String>>,
    state_control: ReplayCache<SelectorControl>,
    county_control: ReplayCache<SelectorControl>,
    location_control: ReplayCache<SelectorControl>,
}

impl SelectionState {
    /// Fresh selection: nothing chosen, the state selector usable, the
    /// two dependent selectors disabled until their collections settle.
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(None);
        let (county_tx, _) = watch::channel(None);
        let (location_tx, _) = watch::channel(None);

        Self {
            state_tx,
            county_tx,
            location_tx,
            state_control: ReplayCache::new(SelectorControl::EnabledEmpty),
            county_control: ReplayCache::new(SelectorControl::Disabled),
            location_control: ReplayCache::new(SelectorControl::Disabled),
        }
    }

    /// Chooses a state. Synchronously nulls out the county and location
    /// selections and disables both controls, then publishes the new
    /// state value. Re-selecting the current state is NOT suppressed: the
    /// cascade re-triggers, since value equality is not a guarantee of
    /// identity across collection reloads.
    pub fn select_state(&self, state_code: impl Into<String>) {
        self.location_tx.send_replace(None);
        self.location_control.publish(SelectorControl::Disabled);
        self.county_tx.send_replace(None);
        self.county_control.publish(SelectorControl::Disabled);

        self.state_control.publish(SelectorControl::EnabledWithSelection);
        self.state_tx.send_replace(Some(state_code.into()));
    }

    /// Chooses a county under the currently selected state. A no-op when
    /// no state is selected. The published value carries both FIPS codes,
    /// captured together so a later state change cannot be paired with
    /// this county.
    pub fn select_county(&self, county_code: impl Into<String>) {
        let Some(state_code) = self.state_tx.borrow().clone() else {
            warn!("county selected with no state selected; ignoring");
            return;
        };

        self.location_tx.send_replace(None);
        self.location_control.publish(SelectorControl::Disabled);

        self.county_control.publish(SelectorControl::EnabledWithSelection);
        self.county_tx.send_replace(Some(CountySelection {
            state_code,
            county_code: county_code.into(),
        }));
    }

    /// Chooses a monitoring location under the currently selected county.
    /// A no-op when no county is selected.
    pub fn select_location(&self, location_id: impl Into<String>) {
        if self.county_tx.borrow().is_none() {
            warn!("location selected with no county selected; ignoring");
            return;
        }

        self.location_control.publish(SelectorControl::EnabledWithSelection);
        self.location_tx.send_replace(Some(location_id.into()));
    }

    /// Clears the whole cascade back to its initial state.
    pub fn reset(&self) {
        self.location_tx.send_replace(None);
        self.location_control.publish(SelectorControl::Disabled);
        self.county_tx.send_replace(None);
        self.county_control.publish(SelectorControl::Disabled);
        self.state_control.publish(SelectorControl::EnabledEmpty);
        self.state_tx.send_replace(None);
    }

    /// Point-in-time snapshot of the three selector values.
    pub fn snapshot(&self) -> Selection {
        Selection {
            state_code: self.state_tx.borrow().clone(),
            county_code: self.county_tx.borrow().as_ref().map(|c| c.county_code.clone()),
            location_id: self.location_tx.borrow().clone(),
        }
    }

    // --- Streams consumed by the engines -----------------------------------

    pub fn state_stream(&self) -> ReplayStream<Option<String>> {
        self.state_tx.subscribe().into()
    }

    pub fn county_stream(&self) -> ReplayStream<Option<CountySelection>> {
        self.county_tx.subscribe().into()
    }

    pub fn location_stream(&self) -> ReplayStream<Option<String>> {
        self.location_tx.subscribe().into()
    }

    // --- Control state -----------------------------------------------------

    pub fn state_control(&self) -> ReplayStream<SelectorControl> {
        self.state_control.subscribe()
    }

    pub fn county_control(&self) -> ReplayStream<SelectorControl> {
        self.county_control.subscribe()
    }

    pub fn location_control(&self) -> ReplayStream<SelectorControl> {
        self.location_control.subscribe()
    }

    /// Publisher half of the county control, handed to the counties
    /// cascade so its settle handler can re-enable the selector.
    pub(crate) fn county_control_publisher(&self) -> ReplayCache<SelectorControl> {
        self.county_control.clone()
    }

    /// Publisher half of the location control, handed to the locations
    /// cascade.
    pub(crate) fn location_control_publisher(&self) -> ReplayCache<SelectorControl> {
        self.location_control.clone()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selection_has_dependent_selectors_disabled() {
        let selection = SelectionState::new();
        assert_eq!(selection.state_control().current(), SelectorControl::EnabledEmpty);
        assert_eq!(selection.county_control().current(), SelectorControl::Disabled);
        assert_eq!(selection.location_control().current(), SelectorControl::Disabled);
        assert_eq!(selection.snapshot(), Selection::default());
    }

    #[test]
    fn test_selecting_a_state_clears_and_disables_downstream_synchronously() {
        let selection = SelectionState::new();
        selection.select_state("06");
        selection.select_county("001");
        selection.select_location("USGS-1");

        selection.select_state("55");

        // Observable immediately, with no async machinery having run:
        // the disable happens before any counties fetch can be issued.
        let snapshot = selection.snapshot();
        assert_eq!(snapshot.state_code.as_deref(), Some("55"));
        assert_eq!(snapshot.county_code, None);
        assert_eq!(snapshot.location_id, None);
        assert_eq!(selection.county_control().current(), SelectorControl::Disabled);
        assert_eq!(selection.location_control().current(), SelectorControl::Disabled);
    }

    #[test]
    fn test_selecting_a_county_clears_only_the_location() {
        let selection = SelectionState::new();
        selection.select_state("06");
        selection.select_county("001");
        selection.select_location("USGS-1");

        selection.select_county("055");

        let snapshot = selection.snapshot();
        assert_eq!(snapshot.state_code.as_deref(), Some("06"));
        assert_eq!(snapshot.county_code.as_deref(), Some("055"));
        assert_eq!(snapshot.location_id, None);
        assert_eq!(selection.location_control().current(), SelectorControl::Disabled);
    }

    #[test]
    fn test_county_selection_captures_its_owning_state() {
        let selection = SelectionState::new();
        selection.select_state("06");
        selection.select_county("001");

        let county = selection.county_stream().current().expect("county should be set");
        assert_eq!(county.state_code, "06");
        assert_eq!(county.county_code, "001");
    }

    #[test]
    fn test_selecting_a_county_without_a_state_is_ignored() {
        let selection = SelectionState::new();
        selection.select_county("001");

        assert_eq!(selection.snapshot(), Selection::default());
        assert_eq!(selection.county_control().current(), SelectorControl::Disabled);
    }

    #[test]
    fn test_selecting_a_location_without_a_county_is_ignored() {
        let selection = SelectionState::new();
        selection.select_state("06");
        selection.select_location("USGS-1");

        assert_eq!(selection.snapshot().location_id, None);
    }

    #[test]
    fn test_reselecting_the_same_state_reemits_the_value() {
        // Equality with the current value does not suppress the cascade.
        let selection = SelectionState::new();
        let mut states = selection.state_stream();

        selection.select_state("06");
        assert_eq!(states.poll_next(), Some(Some("06".to_string())));

        selection.select_state("06");
        assert_eq!(
            states.poll_next(),
            Some(Some("06".to_string())),
            "an identical selection must re-trigger, not be swallowed"
        );
    }

    #[test]
    fn test_reset_returns_to_the_initial_state() {
        let selection = SelectionState::new();
        selection.select_state("06");
        selection.select_county("001");
        selection.select_location("USGS-1");

        selection.reset();

        assert_eq!(selection.snapshot(), Selection::default());
        assert_eq!(selection.state_control().current(), SelectorControl::EnabledEmpty);
        assert_eq!(selection.county_control().current(), SelectorControl::Disabled);
        assert_eq!(selection.location_control().current(), SelectorControl::Disabled);
    }
}
