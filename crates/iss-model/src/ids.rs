use std::fmt;

use crate::ModelError;

/// Identifier of one registered study, used as a column name and as the
/// `studyid` literal in derivations.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct StudyId(String);

impl StudyId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidStudyId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Default name for the study at `position` (zero based) in upload order.
    pub fn numbered(position: usize) -> Self {
        Self(format!("Study{}", position + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StudyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
