//! Classifier wire format and response interpretation.
//!
//! The transport itself lives in `skinscan-client`; this module only knows
//! how to build the request body and turn a raw response (status, content
//! type, body text) into either a [`Classification`] or a
//! [`SubmitError`].

use serde::{Deserialize, Serialize};

/// Path of the classification endpoint.
pub const PREDICT_PATH: &str = "/api/predict";

/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// Label the classifier uses for a benign verdict.
pub const BENIGN_LABEL: &str = "BENIGN";

const GENERIC_FAILURE: &str = "Analysis failed";

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    /// The exported image as a `data:` URL.
    pub image: String,
}

/// Body returned by `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictResponse {
    /// Whether classification succeeded.
    pub success: bool,
    /// Headline label, e.g. `BENIGN` or `SUSPICIOUS`.
    #[serde(default)]
    pub result: Option<String>,
    /// Human-readable detail, e.g. `Likely Benign`.
    #[serde(default)]
    pub result_detail: Option<String>,
    /// Confidence in percent.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Disclaimer to show with the result.
    #[serde(default)]
    pub disclaimer: Option<String>,
    /// Failure message when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
    /// Raw model output.
    #[serde(default)]
    pub raw_score: Option<f64>,
}

/// Body returned by `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status string, `healthy` when up.
    pub status: String,
    /// Whether the model finished loading.
    pub model_loaded: bool,
}

/// Coarse reading of a label, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The label is exactly `BENIGN`.
    Benign,
    /// Anything else.
    Suspicious,
}

impl Verdict {
    /// Verdict for a classifier label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == BENIGN_LABEL {
            Self::Benign
        } else {
            Self::Suspicious
        }
    }

    /// Lowercase CSS class name.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Benign => "benign",
            Self::Suspicious => "suspicious",
        }
    }
}

/// A successful classification, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Headline label.
    pub label: String,
    /// Human-readable detail.
    pub detail: String,
    /// Confidence in percent.
    pub confidence_percent: f64,
    /// Optional disclaimer text.
    pub disclaimer: Option<String>,
    /// Raw model score, when the server reports one.
    pub raw_score: Option<f64>,
}

impl Classification {
    /// Styling verdict derived from the label.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(&self.label)
    }

    /// Confidence formatted for display, e.g. `87.3%`.
    #[must_use]
    pub fn confidence_label(&self) -> String {
        format!("{}%", self.confidence_percent)
    }

    /// Confidence clamped to `[0, 100]`, for the confidence bar width.
    #[must_use]
    pub fn confidence_fraction(&self) -> f64 {
        (self.confidence_percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Errors from a classification round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The server answered with something other than JSON.
    #[error("Server Error ({status}): the server returned a non-JSON response")]
    NonJsonResponse {
        /// HTTP status code.
        status: u16,
        /// Raw body, kept for logging.
        body: String,
    },

    /// The server reported that classification failed.
    #[error("{0}")]
    Classification(String),

    /// The JSON body did not have the expected shape.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),
}

/// Whether a `Content-Type` header value denotes JSON.
#[must_use]
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/json"))
}

/// Interpret a raw classifier response.
///
/// A non-JSON content type is an error regardless of status, and the body
/// is not parsed. A JSON body is accepted whatever the status, since the
/// server reports its own failures as `{"success": false, "error": ...}`
/// with a 5xx status.
///
/// # Errors
///
/// Returns [`SubmitError::NonJsonResponse`],
/// [`SubmitError::MalformedResponse`] or
/// [`SubmitError::Classification`] as described above.
pub fn interpret_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<Classification, SubmitError> {
    if !is_json_content_type(content_type) {
        tracing::warn!(status, body, "classifier returned a non-JSON response");
        return Err(SubmitError::NonJsonResponse {
            status,
            body: body.to_owned(),
        });
    }

    let response: PredictResponse =
        serde_json::from_str(body).map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
    classification_from(response)
}

/// Turn a parsed response into a [`Classification`].
///
/// # Errors
///
/// Returns [`SubmitError::Classification`] when `success` is false, and
/// [`SubmitError::MalformedResponse`] when a successful response lacks a
/// label or confidence.
pub fn classification_from(response: PredictResponse) -> Result<Classification, SubmitError> {
    if !response.success {
        let message = response
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
        return Err(SubmitError::Classification(message));
    }

    let label = response
        .result
        .ok_or_else(|| SubmitError::MalformedResponse("missing `result`".to_owned()))?;
    let confidence_percent = response
        .confidence
        .ok_or_else(|| SubmitError::MalformedResponse("missing `confidence`".to_owned()))?;

    Ok(Classification {
        label,
        detail: response.result_detail.unwrap_or_default(),
        confidence_percent,
        disclaimer: response.disclaimer,
        raw_score: response.raw_score,
    })
}
