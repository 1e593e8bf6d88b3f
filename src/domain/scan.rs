//! Scan modalities, upload payloads and inference results.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Imaging modality. Each modality has its own upload endpoint and its own
/// result-rendering nuance (only ultrasound produces segmentation masks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Mammogram,
    Ultrasound,
}

impl Modality {
    /// Wire name, as used in API paths and serialized records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mammogram => "mammogram",
            Self::Ultrasound => "ultrasound",
        }
    }

    /// Short display name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mammogram => "Mammogram",
            Self::Ultrasound => "Ultrasound",
        }
    }

    /// Page title shown in the route header.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Mammogram => "Mammogram Analysis",
            Self::Ultrasound => "Ultrasound Analysis",
        }
    }

    /// One-line description under the page title.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Mammogram => "Upload a mammogram scan for AI-powered detection.",
            Self::Ultrasound => "Upload an ultrasound scan for tumor segmentation and diagnosis.",
        }
    }

    /// Whether results of this modality may carry a segmentation mask.
    #[must_use]
    pub fn supports_segmentation(&self) -> bool {
        matches!(self, Self::Ultrasound)
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification verdict derived from the free-form prediction label.
///
/// The backend returns the label as a string; the client only interprets it
/// for styling and dashboard aggregation, never for clinical logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Malignant,
    Benign,
    Other,
}

impl Verdict {
    /// Classify a prediction label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("malignant") {
            Self::Malignant
        } else if label.eq_ignore_ascii_case("benign") {
            Self::Benign
        } else {
            Self::Other
        }
    }
}

/// Completed prediction for one uploaded scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Prediction label, e.g. "malignant" or "benign".
    pub prediction: String,

    /// Model confidence in `[0, 1]`.
    pub confidence: f64,

    /// URL of the processed scan image on the backend.
    pub image_url: String,

    /// URL of the segmentation mask, when the modality produces one.
    /// Takes display precedence over `image_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_image: Option<String>,
}

impl ScanResult {
    /// The artifact to display: the mask when present, otherwise the image.
    #[must_use]
    pub fn display_image(&self) -> &str {
        self.mask_image.as_deref().unwrap_or(&self.image_url)
    }

    /// Whether a segmentation mask was generated.
    #[must_use]
    pub fn has_mask(&self) -> bool {
        self.mask_image.is_some()
    }

    /// Confidence as a percentage, clamped to `[0, 100]`.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 100.0).clamp(0.0, 100.0)
    }

    /// Verdict derived from the prediction label.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(&self.prediction)
    }
}

/// File extensions accepted by the upload form.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "webp", "tif", "tiff"];

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// A prepared upload payload: the image bytes plus the metadata the
/// multipart request needs. Construction from disk happens in the request
/// worker; this type stays I/O-free.
#[derive(Debug, Clone)]
pub struct ScanUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ScanUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type inferred from the file extension via `mime_guess`.
    #[must_use]
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Check whether a path carries a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
