use crate::domain::errors::ValidationError;

/// An entity tag issued by the storage backend for the current content of an object.
///
/// The value is opaque: it is compared byte-for-byte and sent back verbatim in
/// `If-Match`, including any surrounding quotes the backend chose to emit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ETag(String);

impl ETag {
    /// Maximum length accepted for a backend-issued tag
    pub const MAX_LEN: usize = 1024;

    /// Create a new ETag with validation
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyETag);
        }

        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::ETagTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        // Must be representable as an HTTP header value
        if let Some(c) = value.chars().find(|c| c.is_control() || !c.is_ascii()) {
            return Err(ValidationError::InvalidETagCharacter(c));
        }

        Ok(Self(value))
    }

    /// Get the ETag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag with surrounding quotes removed.
    ///
    /// A weak prefix is kept, so `W/"x"` never compares equal to `"x"`.
    pub fn unquoted(&self) -> &str {
        self.0
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(&self.0)
    }

    /// Strong comparison: equal up to surrounding quotes, weak tags never
    /// match strong ones
    pub fn matches(&self, other: &ETag) -> bool {
        self.unquoted() == other.unquoted()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ETag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ETag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ETag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ETag {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
