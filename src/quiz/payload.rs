//! Request envelopes shared by every transport

use super::model::id_text;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope every quiz request arrives in
///
/// All identity fields are optional on the wire; presence is checked by the
/// service so that a missing field becomes a `MissingParameters` error rather
/// than a decoding failure. Id fields take strings or numbers (numbers in
/// decimal form); any other JSON type reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPayload<T> {
    #[serde(default, deserialize_with = "scalar_id")]
    pub experience_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_id")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_id")]
    pub chapter_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_id")]
    pub user_id: Option<String>,
    pub data: Option<T>,
}

impl<T> ServerPayload<T> {
    /// Payload for an anonymous session
    pub fn for_session(
        experience_id: impl Into<String>,
        session_id: impl Into<String>,
        chapter_id: impl Into<String>,
        data: T,
    ) -> Self {
        Self {
            experience_id: Some(experience_id.into()),
            session_id: Some(session_id.into()),
            chapter_id: Some(chapter_id.into()),
            user_id: None,
            data: Some(data),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

fn scalar_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(id_text))
}

/// Body of a quiz state query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateQuery {
    #[serde(default, deserialize_with = "scalar_id")]
    pub chapter_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_id")]
    pub quiz_id: Option<String>,
}

impl StateQuery {
    pub fn new(chapter_id: impl Into<String>, quiz_id: impl Into<String>) -> Self {
        Self {
            chapter_id: Some(chapter_id.into()),
            quiz_id: Some(quiz_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_envelope_with_null_user() {
        let payload: ServerPayload<StateQuery> = serde_json::from_value(json!({
            "experienceId": "exp",
            "sessionId": "s1",
            "chapterId": "ch",
            "userId": null,
            "data": {"chapterId": "ch", "quizId": "q1"}
        }))
        .unwrap();

        assert_eq!(payload.user_id, None);
        assert_eq!(payload.data, Some(StateQuery::new("ch", "q1")));
    }

    #[test]
    fn numeric_ids_decode_in_decimal_form() {
        let payload: ServerPayload<StateQuery> = serde_json::from_value(json!({
            "experienceId": "exp",
            "sessionId": 5,
            "chapterId": "ch",
            "data": {"chapterId": "ch", "quizId": 7}
        }))
        .unwrap();

        assert_eq!(payload.session_id.as_deref(), Some("5"));
        assert_eq!(payload.data, Some(StateQuery::new("ch", "7")));
    }

    #[test]
    fn non_scalar_ids_read_as_absent() {
        let payload: ServerPayload<StateQuery> = serde_json::from_value(json!({
            "sessionId": {"nested": true},
            "userId": false,
            "data": {"quizId": ["q"]}
        }))
        .unwrap();

        assert!(payload.session_id.is_none());
        assert!(payload.user_id.is_none());
        assert_eq!(payload.data.unwrap().quiz_id, None);
    }

    #[test]
    fn missing_fields_decode_as_none() {
        let payload: ServerPayload<StateQuery> = serde_json::from_value(json!({})).unwrap();
        assert!(payload.experience_id.is_none());
        assert!(payload.data.is_none());
    }
}
