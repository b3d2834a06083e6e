//! Loads everything the map needs and tracks the load state.
//!
//! Feedback and boundaries are fetched together; if either fails the whole
//! load fails and the map shows an error with a retry action. A refresh
//! keeps the current map on screen while the next one is fetched.

use std::sync::Arc;

use feedback_map_analytics::aggregate_by_county;
use feedback_map_analytics_models::CountyAggregation;
use feedback_map_feedback_models::FeedbackRecord;
use feedback_map_geography::boundaries::BoundarySet;
use feedback_map_render::state::{FinishOutcome, LoadState, LoadTracker, RetryUnavailable};
use tokio::sync::Mutex;

use crate::SourceError;
use crate::boundaries::BoundarySource;
use crate::repository::FeedbackRepository;

/// A successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    /// Records, newest first.
    pub records: Vec<FeedbackRecord>,
    /// County geometry.
    pub boundaries: BoundarySet,
    /// Per-county aggregation of `records`.
    pub aggregation: CountyAggregation,
}

/// Drives a feedback repository and a boundary source through a
/// [`LoadTracker`].
pub struct MapDataLoader {
    feedback: Arc<dyn FeedbackRepository>,
    boundaries: Arc<dyn BoundarySource>,
    tracker: Mutex<LoadTracker<Arc<MapData>>>,
}

impl std::fmt::Debug for MapDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapDataLoader")
            .field("boundaries", &self.boundaries.describe())
            .finish_non_exhaustive()
    }
}

impl MapDataLoader {
    /// Builds a loader that has not loaded anything yet.
    #[must_use]
    pub fn new(feedback: Arc<dyn FeedbackRepository>, boundaries: Arc<dyn BoundarySource>) -> Self {
        Self {
            feedback,
            boundaries,
            tracker: Mutex::new(LoadTracker::new()),
        }
    }

    /// Current state.
    pub async fn state(&self) -> LoadState<Arc<MapData>> {
        self.tracker.lock().await.state().clone()
    }

    /// Starts a load, superseding any in flight, and waits for it.
    ///
    /// Returns [`FinishOutcome::Stale`] if another load was started
    /// before this one finished; its result is then discarded.
    pub async fn load(&self) -> FinishOutcome {
        let ticket = self.tracker.lock().await.begin();
        let result = self.fetch().await;
        self.tracker.lock().await.finish(ticket, result)
    }

    /// Fetches fresh data while the current state stays visible, then
    /// applies it unless a newer load has started.
    pub async fn refresh(&self) -> FinishOutcome {
        let ticket = self.tracker.lock().await.refresh();
        let result = self.fetch().await;
        self.tracker.lock().await.finish(ticket, result)
    }

    /// Reloads after a failure.
    ///
    /// # Errors
    ///
    /// * If the last load did not fail
    pub async fn retry(&self) -> Result<FinishOutcome, RetryUnavailable> {
        let ticket = self.tracker.lock().await.retry()?;
        log::info!("Retrying map data load");
        let result = self.fetch().await;
        Ok(self.tracker.lock().await.finish(ticket, result))
    }

    async fn fetch(&self) -> Result<Arc<MapData>, SourceError> {
        log::debug!("Loading feedback and {}", self.boundaries.describe());
        let (records, boundaries) = tokio::try_join!(self.feedback.list(), self.boundaries.load())?;
        let aggregation = aggregate_by_county(&records);

        log::info!(
            "Loaded {} records ({} without a county) and {} county shapes",
            records.len(),
            aggregation.unresolved,
            boundaries.counties.len()
        );

        Ok(Arc::new(MapData {
            records,
            boundaries,
            aggregation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use feedback_map_feedback_models::{DepartmentSelection, GeoLocation, NewFeedback};

    use super::*;
    use crate::boundaries::CatalogBoundaries;
    use crate::config::MockDelays;
    use crate::mock::MockFeedbackRepository;

    /// Fails until `healthy` is set.
    struct FlakyBoundaries {
        healthy: AtomicBool,
    }

    #[async_trait]
    impl BoundarySource for FlakyBoundaries {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        async fn load(&self) -> Result<BoundarySet, SourceError> {
            if self.healthy.load(Ordering::SeqCst) {
                CatalogBoundaries.load().await
            } else {
                Err(SourceError::Status {
                    status: 503,
                    url: "https://example.com/counties.geojson".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn load_aggregates_records() {
        let loader = MapDataLoader::new(
            Arc::new(MockFeedbackRepository::seeded(MockDelays::NONE)),
            Arc::new(CatalogBoundaries),
        );
        assert!(loader.state().await.is_loading());

        assert_eq!(loader.load().await, FinishOutcome::Applied);
        let state = loader.state().await;
        let data = state.data().unwrap();
        assert_eq!(data.boundaries.counties.len(), 47);
        assert_eq!(data.aggregation.get("Nairobi").unwrap().count, 2);
        assert_eq!(data.aggregation.unresolved, 1);
    }

    #[tokio::test]
    async fn failure_is_all_or_nothing_and_retryable() {
        let boundaries = Arc::new(FlakyBoundaries {
            healthy: AtomicBool::new(false),
        });
        let loader = MapDataLoader::new(
            Arc::new(MockFeedbackRepository::seeded(MockDelays::NONE)),
            boundaries.clone(),
        );

        loader.load().await;
        let state = loader.state().await;
        assert!(state.data().is_none());
        assert_eq!(
            state.error(),
            Some("HTTP 503 from https://example.com/counties.geojson")
        );

        boundaries.healthy.store(true, Ordering::SeqCst);
        assert_eq!(loader.retry().await, Ok(FinishOutcome::Applied));
        assert!(loader.state().await.data().is_some());
        assert_eq!(loader.retry().await, Err(RetryUnavailable));
    }

    #[tokio::test]
    async fn refresh_keeps_ready_map_until_new_data_arrives() {
        let repository = Arc::new(MockFeedbackRepository::seeded(MockDelays {
            list: 50,
            ..MockDelays::NONE
        }));
        let loader = MapDataLoader::new(repository.clone(), Arc::new(CatalogBoundaries));
        loader.load().await;
        let before = loader.state().await.data().unwrap().clone();

        repository
            .create(NewFeedback {
                phone_number: "+254711000111".to_string(),
                description: "Clinic ran out of medicine".to_string(),
                department: DepartmentSelection {
                    department_id: "health".to_string(),
                    sub_department_id: "hospitals".to_string(),
                    service_id: "admission".to_string(),
                    ..DepartmentSelection::default()
                },
                location: Some(GeoLocation::new(-1.2864, 36.8172)),
                ..NewFeedback::default()
            })
            .await
            .unwrap();

        let (outcome, during) = tokio::join!(loader.refresh(), async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            loader.state().await
        });

        assert_eq!(outcome, FinishOutcome::Applied);
        assert_eq!(during.data(), Some(&before));
        let after = loader.state().await;
        let after = after.data().unwrap();
        assert_eq!(after.records.len(), before.records.len() + 1);
        assert_eq!(after.aggregation.get("Nairobi").unwrap().count, 3);
    }
}
