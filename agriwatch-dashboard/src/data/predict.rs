//! Prediction cache state machine.
//!
//! The cache ties the currently displayed image to the currently displayed
//! prediction. A classification request is issued only when the controller
//! stream starts showing a different image payload, which gives the one
//! concurrency invariant of the system: never more than one outstanding
//! classification request per distinct image value.
//!
//! A failed request leaves the cache `Pending` with no prediction. The same
//! image persisting does not retry; only an image change issues a new
//! request. Callers wanting retry must add it explicitly on top.

use std::fmt::Debug;

use async_trait::async_trait;

use agriwatch_adapters::{AdapterError, ClassifierClient};
use agriwatch_types::Prediction;

/// Lifecycle state of the prediction cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    /// No tracked image, no prediction.
    #[default]
    Idle,
    /// Tracked image set, no prediction yet (request in flight or failed).
    Pending,
    /// Prediction available and matching the tracked image.
    Ready,
}

/// Freshness-aware cache of the latest classification result.
///
/// The state is derived from the `(tracked image, prediction)` pair rather
/// than stored separately, so it cannot fall out of sync with the data.
#[derive(Debug, Clone, Default)]
pub struct PredictionCache {
    tracked_image: Option<String>,
    prediction: Option<Prediction>,
}

impl PredictionCache {
    /// Create an idle cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CacheState {
        match (&self.tracked_image, &self.prediction) {
            (None, _) => CacheState::Idle,
            (Some(_), None) => CacheState::Pending,
            (Some(_), Some(_)) => CacheState::Ready,
        }
    }

    /// The image payload the displayed prediction belongs to.
    pub fn tracked_image(&self) -> Option<&str> {
        self.tracked_image.as_deref()
    }

    /// The cached prediction, if one matches the tracked image.
    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// Observe the controller stream's current image payload.
    ///
    /// Returns `Some(image)` when exactly one classification request should
    /// be issued for it (the image is new); `None` otherwise. An absent
    /// image clears the cache back to idle. Equality is exact payload
    /// equality.
    pub fn observe(&mut self, image: Option<&str>) -> Option<String> {
        match image {
            None => {
                self.tracked_image = None;
                self.prediction = None;
                None
            }
            Some(image) => {
                if self.tracked_image.as_deref() == Some(image) {
                    return None;
                }
                self.tracked_image = Some(image.to_string());
                self.prediction = None;
                Some(image.to_string())
            }
        }
    }

    /// Record a completed classification for `image`.
    ///
    /// Returns `true` if the result was stored; `false` if the image has
    /// been superseded or cleared, in which case the result is discarded
    /// and nothing changes.
    pub fn complete(&mut self, image: &str, prediction: Prediction) -> bool {
        if self.tracked_image.as_deref() != Some(image) {
            return false;
        }
        self.prediction = Some(prediction);
        true
    }
}

/// Seam for issuing classification requests.
///
/// The poll loop talks to this trait so tests can swap in a scripted
/// classifier.
#[async_trait]
pub trait Classifier: Send + Sync + Debug {
    /// Classify one image payload.
    async fn classify(&self, image_base64: &str) -> Result<Prediction, AdapterError>;
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify(&self, image_base64: &str) -> Result<Prediction, AdapterError> {
        ClassifierClient::classify(self, image_base64).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriwatch_types::{PredictionLabel, Probabilities};

    fn prediction(label: PredictionLabel) -> Prediction {
        Prediction {
            predict: label,
            probs: Probabilities::default(),
        }
    }

    #[test]
    fn starts_idle() {
        let cache = PredictionCache::new();
        assert_eq!(cache.state(), CacheState::Idle);
        assert!(cache.prediction().is_none());
    }

    #[test]
    fn new_image_requests_once() {
        let mut cache = PredictionCache::new();

        // First sighting issues a request and goes pending
        assert_eq!(cache.observe(Some("X")), Some("X".to_string()));
        assert_eq!(cache.state(), CacheState::Pending);

        // The same image persisting across polls never re-requests
        assert_eq!(cache.observe(Some("X")), None);
        assert_eq!(cache.observe(Some("X")), None);
        assert_eq!(cache.state(), CacheState::Pending);
    }

    #[test]
    fn completion_for_tracked_image_is_stored() {
        let mut cache = PredictionCache::new();
        cache.observe(Some("X"));

        assert!(cache.complete("X", prediction(PredictionLabel::Rust)));
        assert_eq!(cache.state(), CacheState::Ready);
        assert_eq!(cache.prediction().unwrap().predict, PredictionLabel::Rust);
    }

    #[test]
    fn image_change_clears_prediction_before_new_result() {
        let mut cache = PredictionCache::new();
        cache.observe(Some("X"));
        cache.complete("X", prediction(PredictionLabel::Healthy));
        assert_eq!(cache.state(), CacheState::Ready);

        // New image: prediction cleared, one request for the new payload
        assert_eq!(cache.observe(Some("Y")), Some("Y".to_string()));
        assert_eq!(cache.state(), CacheState::Pending);
        assert!(cache.prediction().is_none());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut cache = PredictionCache::new();
        cache.observe(Some("X"));
        cache.observe(Some("Y"));

        // The response for the superseded image arrives late
        assert!(!cache.complete("X", prediction(PredictionLabel::Scab)));
        assert_eq!(cache.state(), CacheState::Pending);
        assert!(cache.prediction().is_none());

        // The current image's response still lands
        assert!(cache.complete("Y", prediction(PredictionLabel::Healthy)));
        assert_eq!(cache.state(), CacheState::Ready);
    }

    #[test]
    fn absent_image_clears_to_idle() {
        let mut cache = PredictionCache::new();
        cache.observe(Some("X"));
        cache.complete("X", prediction(PredictionLabel::Healthy));

        assert_eq!(cache.observe(None), None);
        assert_eq!(cache.state(), CacheState::Idle);
        assert!(cache.prediction().is_none());
        assert!(cache.tracked_image().is_none());

        // A completion after clearing is stale
        assert!(!cache.complete("X", prediction(PredictionLabel::Healthy)));
        assert_eq!(cache.state(), CacheState::Idle);
    }

    #[test]
    fn failure_leaves_pending_without_retry() {
        let mut cache = PredictionCache::new();
        cache.observe(Some("X"));

        // The request failed; nothing is recorded. The image persisting
        // does not trigger another request.
        assert_eq!(cache.observe(Some("X")), None);
        assert_eq!(cache.state(), CacheState::Pending);
    }
}
