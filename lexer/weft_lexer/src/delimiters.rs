//! Interpolation delimiter configuration.
//!
//! A [`DelimiterConfig`] is the immutable start/end marker pair bounding an
//! embedded expression in text or attribute values. Matching is exact and
//! byte-wise: case-sensitive, no escaping. The pair is validated once at
//! construction; the lexing hot path never re-checks it.

/// Invalid delimiter pair, rejected at construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DelimiterConfigError {
    /// The start delimiter is the empty string.
    #[error("interpolation start delimiter must not be empty")]
    EmptyStart,
    /// The end delimiter is the empty string.
    #[error("interpolation end delimiter must not be empty")]
    EmptyEnd,
    /// Start and end delimiters are the same string, which would make every
    /// occurrence ambiguous between opening and closing.
    #[error("interpolation delimiters must differ (both are {0:?})")]
    Identical(String),
}

/// Immutable interpolation delimiter pair. Defaults to `{{` / `}}`.
///
/// Prefix-overlapping pairs (such as the default, where both delimiters
/// repeat one byte) are accepted; matching is greedy at the current offset,
/// with the start delimiter tested before the end delimiter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawDelimiters")
)]
pub struct DelimiterConfig {
    start: String,
    end: String,
}

impl DelimiterConfig {
    /// Create a validated delimiter pair.
    ///
    /// Rejects empty strings and identical start/end markers; anything else
    /// is accepted as supplied.
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, DelimiterConfigError> {
        let start = start.into();
        let end = end.into();
        if start.is_empty() {
            return Err(DelimiterConfigError::EmptyStart);
        }
        if end.is_empty() {
            return Err(DelimiterConfigError::EmptyEnd);
        }
        if start == end {
            return Err(DelimiterConfigError::Identical(start));
        }
        Ok(Self { start, end })
    }

    /// The start delimiter text.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The end delimiter text.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Start delimiter as bytes, for scanner-level matching.
    pub(crate) fn start_bytes(&self) -> &[u8] {
        self.start.as_bytes()
    }

    /// End delimiter as bytes, for scanner-level matching.
    pub(crate) fn end_bytes(&self) -> &[u8] {
        self.end.as_bytes()
    }

    /// Start delimiter length in bytes.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "delimiters are short marker strings, far below u32::MAX"
    )]
    pub(crate) fn start_len(&self) -> u32 {
        self.start.len() as u32
    }

    /// End delimiter length in bytes.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "delimiters are short marker strings, far below u32::MAX"
    )]
    pub(crate) fn end_len(&self) -> u32 {
        self.end.len() as u32
    }
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            start: "{{".to_owned(),
            end: "}}".to_owned(),
        }
    }
}

/// Unvalidated deserialization shape; converted through [`DelimiterConfig::new`]
/// so persisted configs go through the same validation as constructed ones.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawDelimiters {
    start: String,
    end: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDelimiters> for DelimiterConfig {
    type Error = DelimiterConfigError;

    fn try_from(raw: RawDelimiters) -> Result<Self, Self::Error> {
        DelimiterConfig::new(raw.start, raw.end)
    }
}
