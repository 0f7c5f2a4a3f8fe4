use super::ETag;

/// Wildcard accepted by `If-None-Match` meaning "any existing object"
pub const ANY_OBJECT: &str = "*";

/// What the caller believes is currently stored at the key.
///
/// A write is only applied if this belief still holds at the backend when the
/// request arrives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PriorVersion {
    /// No object exists at the key; the write creates it.
    #[default]
    Absent,
    /// The object currently carries this tag; the write replaces it.
    Version(ETag),
}

/// The precondition header sent alongside a conditional PUT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition<'a> {
    IfNoneMatch(&'a str),
    IfMatch(&'a str),
}

impl Precondition<'_> {
    pub fn header_name(&self) -> &'static str {
        match self {
            Precondition::IfNoneMatch(_) => "if-none-match",
            Precondition::IfMatch(_) => "if-match",
        }
    }

    pub fn header_value(&self) -> &str {
        match self {
            Precondition::IfNoneMatch(v) | Precondition::IfMatch(v) => v,
        }
    }
}

impl PriorVersion {
    pub fn is_absent(&self) -> bool {
        matches!(self, PriorVersion::Absent)
    }

    pub fn etag(&self) -> Option<&ETag> {
        match self {
            PriorVersion::Absent => None,
            PriorVersion::Version(etag) => Some(etag),
        }
    }

    /// The precondition this belief translates to on the wire
    pub fn precondition(&self) -> Precondition<'_> {
        match self {
            PriorVersion::Absent => Precondition::IfNoneMatch(ANY_OBJECT),
            PriorVersion::Version(etag) => Precondition::IfMatch(etag.as_str()),
        }
    }
}

impl From<ETag> for PriorVersion {
    fn from(etag: ETag) -> Self {
        PriorVersion::Version(etag)
    }
}

impl From<Option<ETag>> for PriorVersion {
    fn from(etag: Option<ETag>) -> Self {
        etag.map_or(PriorVersion::Absent, PriorVersion::Version)
    }
}

impl std::fmt::Display for PriorVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorVersion::Absent => write!(f, "<absent>"),
            PriorVersion::Version(etag) => write!(f, "{}", etag),
        }
    }
}
