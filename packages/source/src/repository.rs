//! The feedback store interface.

use async_trait::async_trait;
use feedback_map_analytics_models::FeedbackStats;
use feedback_map_feedback_models::{FeedbackRecord, NewFeedback};

use crate::SourceError;

/// Storage for citizen feedback.
///
/// Records are returned newest first. Implementations must be safe to
/// share between request handlers.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Returns every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the store cannot be read.
    async fn list(&self) -> Result<Vec<FeedbackRecord>, SourceError>;

    /// Validates and stores a submission, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Validation`] for an invalid submission, or
    /// another [`SourceError`] if the store cannot be written.
    async fn create(&self, submission: NewFeedback) -> Result<FeedbackRecord, SourceError>;

    /// Summary counts over every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the store cannot be read.
    async fn stats(&self) -> Result<FeedbackStats, SourceError>;
}
