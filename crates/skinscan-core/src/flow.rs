//! Submission and result flow.
//!
//! [`SubmissionFlow`] is a small state machine driven by the shell:
//!
//! ```text
//! Idle -> Baking -> Submitting -> Success
//!            \           \
//!             +-----------+----> Failed -> (dismiss) -> Idle
//! ```
//!
//! The shell performs the bake and the network round trip between
//! transitions and reports the outcomes back with
//! [`SubmissionFlow::finish_bake`] and [`SubmissionFlow::finish_submit`].
//! At most one bake/submit is in flight.

use chrono::{DateTime, Utc};

use crate::bake::{BakeError, ExportedImage};
use crate::classify::{Classification, SubmitError};
use crate::history::{HistoryRecord, HistoryStore};
use crate::screen::Screen;

/// Where the flow is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    /// Nothing in flight and no result.
    #[default]
    Idle,
    /// Rendering the crop and filter into an export.
    Baking,
    /// Waiting for the classifier.
    Submitting,
    /// A result is available.
    Success,
    /// The last attempt failed with this message.
    Failed(String),
}

impl FlowState {
    /// Whether a bake or submission is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Baking | Self::Submitting)
    }

    /// The screen this state calls for, if it calls for one.
    ///
    /// Baking happens on the editor itself, so `Idle` and `Baking` leave
    /// the current screen alone.
    #[must_use]
    pub const fn screen(&self) -> Option<Screen> {
        match self {
            Self::Idle | Self::Baking => None,
            Self::Submitting => Some(Screen::Loading),
            Self::Success => Some(Screen::Results),
            Self::Failed(_) => Some(Screen::Preprocess),
        }
    }
}

/// Errors from driving the flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// A bake or submission is already in flight.
    #[error("an analysis is already in progress")]
    Busy,
}

/// The current analysis and its result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionFlow {
    state: FlowState,
    thumbnail: Option<String>,
    result: Option<Classification>,
}

impl SubmissionFlow {
    /// A flow with nothing in it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    /// The exported image of the current analysis (`data:` URL).
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    /// The current result.
    #[must_use]
    pub const fn result(&self) -> Option<&Classification> {
        self.result.as_ref()
    }

    /// Message to show for a failed attempt.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match &self.state {
            FlowState::Failed(message) => Some(format!("Error analyzing image: {message}")),
            _ => None,
        }
    }

    /// Start a new analysis. Clears any previous export and result.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Busy`] while a bake or submission is in
    /// flight; the in-flight analysis is not affected.
    pub fn begin_bake(&mut self) -> Result<(), FlowError> {
        if self.state.is_busy() {
            tracing::debug!(state = ?self.state, "rejecting analysis while busy");
            return Err(FlowError::Busy);
        }
        self.state = FlowState::Baking;
        self.thumbnail = None;
        self.result = None;
        Ok(())
    }

    /// Report the bake outcome. On success returns the payload to submit
    /// and moves to `Submitting`; on failure moves to `Failed`.
    ///
    /// Ignored (returns `None`) unless the flow is `Baking`.
    pub fn finish_bake(&mut self, outcome: Result<ExportedImage, BakeError>) -> Option<String> {
        if self.state != FlowState::Baking {
            tracing::warn!(state = ?self.state, "bake finished outside of Baking");
            return None;
        }
        match outcome {
            Ok(export) => {
                let data_url = export.into_data_url();
                self.thumbnail = Some(data_url.clone());
                self.state = FlowState::Submitting;
                Some(data_url)
            }
            Err(e) => {
                tracing::error!("bake failed: {e}");
                self.state = FlowState::Failed(e.to_string());
                None
            }
        }
    }

    /// Report the classifier outcome.
    ///
    /// Ignored unless the flow is `Submitting`.
    pub fn finish_submit(&mut self, outcome: Result<Classification, SubmitError>) {
        if self.state != FlowState::Submitting {
            tracing::warn!(state = ?self.state, "submission finished outside of Submitting");
            return;
        }
        match outcome {
            Ok(classification) => {
                tracing::info!(
                    label = %classification.label,
                    confidence = classification.confidence_percent,
                    "analysis complete"
                );
                self.result = Some(classification);
                self.state = FlowState::Success;
            }
            Err(e) => {
                tracing::error!("analysis error: {e}");
                self.state = FlowState::Failed(e.to_string());
            }
        }
    }

    /// Acknowledge a failure and return to `Idle`.
    pub fn dismiss(&mut self) {
        if matches!(self.state, FlowState::Failed(_)) {
            self.state = FlowState::Idle;
        }
    }

    /// Drop everything and return to `Idle` ("scan again").
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Show a saved record as the current result.
    pub fn restore(&mut self, record: &HistoryRecord) {
        self.thumbnail = Some(record.thumbnail.clone());
        self.result = Some(record.classification());
        self.state = FlowState::Success;
    }

    /// Save the current result to `store`, stamped `now`.
    ///
    /// Returns `Ok(false)` without touching the store when there is no
    /// current result.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    pub fn save<S: HistoryStore>(&self, store: &mut S, now: DateTime<Utc>) -> Result<bool, S::Error> {
        let (Some(result), Some(thumbnail)) = (&self.result, &self.thumbnail) else {
            return Ok(false);
        };
        store.append(HistoryRecord::new(thumbnail.clone(), result, now))?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::bake::bake_with;
    use crate::history::MemoryStore;
    use crate::source::SourceImage;
    use crate::types::{CropRect, Enhancement, Size};

    fn export() -> ExportedImage {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([100, 100, 100, 255]));
        let mut buf = Vec::new();
        image::ImageEncoder::write_image(
            image::codecs::png::PngEncoder::new(&mut buf),
            img.as_raw(),
            4,
            4,
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        let source = SourceImage::from_file(&buf, "image/png").unwrap();
        bake_with(
            &source,
            CropRect::new(0.0, 0.0, 4.0, 4.0),
            Size::new(4.0, 4.0),
            Size::new(4.0, 4.0),
            Enhancement::default(),
        )
        .unwrap()
    }

    fn benign() -> Classification {
        Classification {
            label: "BENIGN".into(),
            detail: "Likely Benign".into(),
            confidence_percent: 91.2,
            disclaimer: Some("Not a diagnosis.".into()),
            raw_score: Some(0.088),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn happy_path() {
        let mut flow = SubmissionFlow::new();
        flow.begin_bake().unwrap();
        assert_eq!(flow.state(), &FlowState::Baking);
        assert_eq!(flow.state().screen(), None);

        let payload = flow.finish_bake(Ok(export())).unwrap();
        assert!(payload.starts_with("data:image/jpeg;base64,"));
        assert_eq!(flow.state(), &FlowState::Submitting);
        assert_eq!(flow.state().screen(), Some(Screen::Loading));
        assert_eq!(flow.thumbnail(), Some(payload.as_str()));

        flow.finish_submit(Ok(benign()));
        assert_eq!(flow.state(), &FlowState::Success);
        assert_eq!(flow.state().screen(), Some(Screen::Results));
        assert_eq!(flow.result(), Some(&benign()));
    }

    #[test]
    fn second_bake_while_submitting_is_rejected() {
        let mut flow = SubmissionFlow::new();
        flow.begin_bake().unwrap();
        assert_eq!(flow.begin_bake(), Err(FlowError::Busy));
        assert_eq!(flow.state(), &FlowState::Baking);

        let payload = flow.finish_bake(Ok(export())).unwrap();
        assert_eq!(flow.begin_bake(), Err(FlowError::Busy));
        assert_eq!(flow.state(), &FlowState::Submitting);
        assert_eq!(flow.thumbnail(), Some(payload.as_str()));
    }

    #[test]
    fn classification_failure_returns_to_editor() {
        let mut flow = SubmissionFlow::new();
        flow.begin_bake().unwrap();
        flow.finish_bake(Ok(export()));
        flow.finish_submit(Err(SubmitError::Classification("low contrast".into())));

        assert_eq!(flow.state(), &FlowState::Failed("low contrast".into()));
        assert_eq!(flow.state().screen(), Some(Screen::Preprocess));
        assert_eq!(
            flow.failure_message().as_deref(),
            Some("Error analyzing image: low contrast")
        );
        assert!(flow.result().is_none());

        let mut store = MemoryStore::default();
        assert!(!flow.save(&mut store, now()).unwrap());
        assert!(store.load().is_empty());

        flow.dismiss();
        assert_eq!(flow.state(), &FlowState::Idle);
    }

    #[test]
    fn bake_failure_skips_submission() {
        let mut flow = SubmissionFlow::new();
        flow.begin_bake().unwrap();
        assert_eq!(flow.finish_bake(Err(BakeError::EmptyExport)), None);
        assert!(matches!(flow.state(), FlowState::Failed(_)));
        assert!(flow.thumbnail().is_none());

        // Failure is not busy; a retry is allowed.
        flow.begin_bake().unwrap();
    }

    #[test]
    fn late_outcomes_are_ignored() {
        let mut flow = SubmissionFlow::new();
        assert_eq!(flow.finish_bake(Ok(export())), None);
        flow.finish_submit(Ok(benign()));
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.result().is_none());
    }

    #[test]
    fn save_prepends_record() {
        let mut flow = SubmissionFlow::new();
        flow.begin_bake().unwrap();
        let payload = flow.finish_bake(Ok(export())).unwrap();
        flow.finish_submit(Ok(benign()));

        let mut store = MemoryStore::default();
        assert!(flow.save(&mut store, now()).unwrap());
        let history = store.load();
        assert_eq!(history.len(), 1);
        let record = history.get(0).unwrap();
        assert_eq!(record.thumbnail, payload);
        assert_eq!(record.result, "BENIGN");
        assert_eq!(record.date, now());
    }

    #[test]
    fn restore_shows_saved_result() {
        let record = HistoryRecord::new("data:image/jpeg;base64,AAAA".into(), &benign(), now());
        let mut flow = SubmissionFlow::new();
        flow.restore(&record);
        assert_eq!(flow.state(), &FlowState::Success);
        assert_eq!(flow.thumbnail(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(flow.result().unwrap().label, "BENIGN");
    }

    #[test]
    fn reset_clears_everything() {
        let mut flow = SubmissionFlow::new();
        flow.begin_bake().unwrap();
        flow.finish_bake(Ok(export()));
        flow.finish_submit(Ok(benign()));
        flow.reset();
        assert_eq!(flow, SubmissionFlow::new());
    }
}
