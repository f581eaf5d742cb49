use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentMarker;

/// Type aliases for specific ID types
pub type PageId = Id<PageMarker>;
pub type AttachmentId = Id<AttachmentMarker>;

impl<T> Id<T> {
    /// Parse a Confluence content ID.
    ///
    /// Confluence hands out numeric IDs, but the API treats them as opaque
    /// strings, so anything non-empty without whitespace or path separators
    /// is accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::InvalidId("ID cannot be empty".to_string()));
        }

        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\')
        {
            return Err(ValidationError::InvalidId(format!(
                "ID contains whitespace or path separators: {}",
                input
            )));
        }

        Ok(Self::from_normalized(trimmed.to_string()))
    }

    /// Create an ID from an already validated string (internal use)
    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Numeric value of the ID, when Confluence issued a numeric one.
    pub fn as_number(&self) -> Option<u64> {
        self.value.parse().ok()
    }
}

// Numeric IDs order by value so "9" sorts before "10"; everything else
// falls back to plain string order after the numeric ones.
impl<T: Eq> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.value.cmp(&other.value)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.value.cmp(&other.value),
        }
    }
}

impl<T: Eq> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
