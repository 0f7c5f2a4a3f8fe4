/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyETag,
    ETagTooLong { actual: usize, max: usize },
    InvalidETagCharacter(char),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyETag => write!(f, "ETag cannot be empty"),
            ValidationError::ETagTooLong { actual, max } => {
                write!(f, "ETag too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidETagCharacter(c) => {
                write!(f, "Invalid character in ETag: {:?}", c)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
