//! Caller identity and the identity tuple that addresses a chapter record

use std::fmt;

/// Who a chapter record belongs to
///
/// An authenticated user and an anonymous session are stored on separate
/// branches of the experience collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Authenticated { user_id: String },
    Anonymous { session_id: String },
}

impl Identity {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::Authenticated { user_id: user_id.into() }
    }

    pub fn anonymous(session_id: impl Into<String>) -> Self {
        Self::Anonymous { session_id: session_id.into() }
    }

    /// Pick the identity from optional wire fields.
    ///
    /// A non-empty `user_id` takes precedence over `session_id`. Empty strings
    /// count as absent. Returns `None` when neither is usable.
    pub fn from_parts(user_id: Option<&str>, session_id: Option<&str>) -> Option<Self> {
        match (non_empty(user_id), non_empty(session_id)) {
            (Some(user), _) => Some(Self::authenticated(user)),
            (None, Some(session)) => Some(Self::anonymous(session)),
            (None, None) => None,
        }
    }

    /// The document id this identity occupies under its experience
    pub fn key(&self) -> &str {
        match self {
            Self::Authenticated { user_id } => user_id,
            Self::Anonymous { session_id } => session_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated { user_id } => write!(f, "user:{}", user_id),
            Self::Anonymous { session_id } => write!(f, "session:{}", session_id),
        }
    }
}

/// Experience, identity and chapter: everything needed to locate one record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityTuple {
    pub experience_id: String,
    pub identity: Identity,
    pub chapter_id: String,
}

impl IdentityTuple {
    pub fn new(experience_id: impl Into<String>, identity: Identity, chapter_id: impl Into<String>) -> Self {
        Self {
            experience_id: experience_id.into(),
            identity,
            chapter_id: chapter_id.into(),
        }
    }
}

/// Treat empty strings like missing values
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
