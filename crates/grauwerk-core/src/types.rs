// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Grauwerk print station.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one print attempt (one capture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bitmap encodings accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    /// MIME type string, as used in data URL prefixes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension used for the spooled file.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// The encoding whose MIME type is exactly `mime`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        [Self::Png, Self::Jpeg]
            .into_iter()
            .find(|e| e.mime_type() == mime)
    }
}

/// One value a printer option can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub value: String,
    /// Marked with a leading `*` in the capability listing.
    pub is_default: bool,
}

/// One advertised printer option, parsed from a capability listing line such
/// as `ColorModel/Color Mode: RGB *Gray`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityOption {
    /// Full identifier as advertised, e.g. `ColorModel/Color Mode`.
    pub key: String,
    /// Identifier with the human-readable suffix stripped, e.g. `ColorModel`.
    pub base_key: String,
    /// Never empty for a parsed option.
    pub choices: Vec<Choice>,
}

impl CapabilityOption {
    /// The choice the printer currently uses, if one is marked.
    pub fn default_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|c| c.is_default)
    }

    /// The offered choice matching `value`, ignoring ASCII case.
    pub fn choice(&self, value: &str) -> Option<&Choice> {
        self.choices
            .iter()
            .find(|c| c.value.eq_ignore_ascii_case(value))
    }
}

/// The option/value pair chosen to force monochrome output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraySelection {
    pub key: String,
    pub value: String,
}

impl GraySelection {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for GraySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// One `-o` argument handed to the submission command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOption {
    pub key: String,
    /// `None` for bare flags such as `fit-to-page`.
    pub value: Option<String>,
}

impl JobOption {
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

impl From<&GraySelection> for JobOption {
    fn from(sel: &GraySelection) -> Self {
        Self::pair(sel.key.clone(), sel.value.clone())
    }
}

impl std::fmt::Display for JobOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.key, v),
            None => f.write_str(&self.key),
        }
    }
}

/// Queue state reported by the OS print system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    Idle,
    Printing,
    Disabled,
    Unknown,
}

/// A printer registered with the OS print system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub status: PrinterStatus,
    pub is_default: bool,
}

impl PrinterInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            description: String::new(),
            status: PrinterStatus::Unknown,
            is_default: false,
        }
    }
}

/// Result of one print attempt as seen by the capture layer.
///
/// Serializes to `{ success, job?, appliedGray?, error? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_gray: Option<GraySelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrintReport {
    pub fn submitted(job: String, applied_gray: Option<GraySelection>) -> Self {
        Self {
            success: true,
            job: Some(job),
            applied_gray,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            job: None,
            applied_gray: None,
            error: Some(error.into()),
        }
    }
}
