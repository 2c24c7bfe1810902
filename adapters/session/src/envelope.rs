use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

/// Prefix of the single-line clipboard form.
pub const LINE_HEADER: &str = "spacecells:v1";

const LINE_DOMAIN: &str = "spacecells";
const LINE_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Errors raised while decoding or checking an envelope.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The envelope was written for another level.
    #[error("submission belongs to level {found:?}, not {expected:?}")]
    LevelMismatch {
        /// Name of the loaded level.
        expected: String,
        /// Name carried by the envelope.
        found: String,
    },
    /// The text was empty.
    #[error("import text was empty")]
    Empty,
    /// The clipboard line has the wrong prefix or version.
    #[error("unsupported clipboard header {0:?}")]
    UnsupportedHeader(String),
    /// The clipboard payload is not valid base64.
    #[error("could not decode clipboard payload")]
    Encoding(#[from] base64::DecodeError),
    /// The JSON does not describe an envelope.
    #[error("could not parse envelope json")]
    Json(#[from] serde_json::Error),
}

/// Exported submission tagged with the level it solves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Position of the level in the level list.
    pub level_number: u32,
    /// Display name of the level.
    pub level_name: String,
    /// Five-grid submission text.
    pub submission_text: String,
}

impl Envelope {
    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String, ImportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Single-line clipboard form `spacecells:v1:<base64>`.
    pub fn encode_line(&self) -> Result<String, ImportError> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("{LINE_HEADER}{FIELD_DELIMITER}{}", STANDARD_NO_PAD.encode(json)))
    }

    /// Decodes either the clipboard line or the JSON form.
    pub fn decode(text: &str) -> Result<Self, ImportError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ImportError::Empty);
        }
        if trimmed.starts_with('{') {
            return Ok(serde_json::from_str(trimmed)?);
        }

        let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
        let domain = parts.next().unwrap_or_default();
        let version = parts.next().unwrap_or_default();
        let payload = parts.next().unwrap_or_default();
        if domain != LINE_DOMAIN || version != LINE_VERSION {
            return Err(ImportError::UnsupportedHeader(format!("{domain}:{version}")));
        }
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Rejects envelopes written for a level other than `level_name`.
    pub fn check_level(&self, level_name: &str) -> Result<(), ImportError> {
        if self.level_name == level_name {
            Ok(())
        } else {
            Err(ImportError::LevelMismatch {
                expected: level_name.to_owned(),
                found: self.level_name.clone(),
            })
        }
    }
}
