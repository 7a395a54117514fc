//! Address resolution: identity tuple to chapter record path

use super::identity::{Identity, IdentityTuple};
use crate::document::DocPath;

/// Collection that holds chapter records under each identity
pub const CHAPTERS_COLLECTION: &str = "chapters";

/// Resolve the path of the chapter record for an identity tuple.
///
/// Layout: `<experienceId>/<userId | sessionId>/chapters/<chapterId>`.
pub fn resolve(tuple: &IdentityTuple) -> DocPath {
    chapters_collection(&tuple.experience_id, &tuple.identity).child(tuple.chapter_id.as_str())
}

/// The collection holding every chapter record of one identity
pub fn chapters_collection(experience_id: &str, identity: &Identity) -> DocPath {
    DocPath::new([experience_id, identity.key(), CHAPTERS_COLLECTION])
}
