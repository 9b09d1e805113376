//! Per-conversation state. One `SessionState` per candidate, owned by the
//! caller and mutated one turn at a time by the state machine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::screening::fields::FieldSpec;
use crate::screening::prompts::GREETING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    TechQuestions,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// A field's final value. `accepted = false` marks a forced-skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedAnswer {
    pub field_key: String,
    pub raw_text: String,
    pub accepted: bool,
}

impl CollectedAnswer {
    /// The value as it should appear in a candidate profile; forced-skips
    /// are tagged so nobody mistakes them for validated data.
    pub fn recorded_value(&self) -> String {
        if self.accepted {
            self.raw_text.clone()
        } else {
            format!("[Invalid: {}]", self.raw_text)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TechAnswer {
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub transcript: Vec<TranscriptEntry>,
    pub phase: Phase,
    pub current_field_index: usize,
    pub retry_count: u8,
    pub answers: BTreeMap<String, CollectedAnswer>,
    pub tech_topics: Vec<String>,
    pub tech_index: usize,
    pub tech_answers: Vec<TechAnswer>,
    /// The technical question currently awaiting an answer.
    pub pending_question: Option<String>,
}

impl SessionState {
    /// Starts a conversation at the first field, with the greeting and the
    /// first prompt already in the transcript.
    pub fn new(id: Uuid, fields: &[FieldSpec]) -> Self {
        let mut state = Self {
            id,
            created_at: Utc::now(),
            transcript: Vec::new(),
            phase: Phase::Collecting,
            current_field_index: 0,
            retry_count: 0,
            answers: BTreeMap::new(),
            tech_topics: Vec::new(),
            tech_index: 0,
            tech_answers: Vec::new(),
            pending_question: None,
        };
        state.push_assistant(GREETING);
        if let Some(first) = fields.first() {
            state.push_assistant(first.prompt_text);
        }
        state
    }

    /// Discards all progress and starts over under the same id.
    pub fn reset(&mut self, fields: &[FieldSpec]) {
        *self = Self::new(self.id, fields);
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Role::User, text.into());
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(Role::Assistant, text.into());
    }

    fn push(&mut self, role: Role, text: String) {
        self.transcript.push(TranscriptEntry {
            role,
            text,
            at: Utc::now(),
        });
    }

    /// Field key → recorded value, with forced-skips tagged.
    pub fn profile(&self) -> BTreeMap<String, String> {
        self.answers
            .iter()
            .map(|(key, answer)| (key.clone(), answer.recorded_value()))
            .collect()
    }

    /// The assistant's most recent message, if any.
    #[cfg(test)]
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|e| e.role == Role::Assistant)
            .map(|e| e.text.as_str())
    }

    pub fn answer(&self, field_key: &str) -> Option<&CollectedAnswer> {
        self.answers.get(field_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::fields::default_fields;

    #[test]
    fn test_new_session_starts_collecting_with_first_prompt() {
        let fields = default_fields();
        let state = SessionState::new(Uuid::new_v4(), &fields);
        assert_eq!(state.phase, Phase::Collecting);
        assert_eq!(state.current_field_index, 0);
        assert_eq!(state.retry_count, 0);
        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript[0].text, GREETING);
        assert_eq!(state.last_reply(), Some(fields[0].prompt_text));
    }

    #[test]
    fn test_reset_keeps_id_and_clears_progress() {
        let fields = default_fields();
        let id = Uuid::new_v4();
        let mut state = SessionState::new(id, &fields);
        state.push_user("John Smith");
        state.current_field_index = 3;
        state.answers.insert(
            "full_name".to_string(),
            CollectedAnswer {
                field_key: "full_name".to_string(),
                raw_text: "John Smith".to_string(),
                accepted: true,
            },
        );

        state.reset(&fields);

        assert_eq!(state.id, id);
        assert_eq!(state.current_field_index, 0);
        assert!(state.answers.is_empty());
        assert_eq!(state.transcript.len(), 2);
    }

    #[test]
    fn test_recorded_value_tags_forced_skip() {
        let skipped = CollectedAnswer {
            field_key: "phone".to_string(),
            raw_text: "12345".to_string(),
            accepted: false,
        };
        assert_eq!(skipped.recorded_value(), "[Invalid: 12345]");

        let accepted = CollectedAnswer {
            accepted: true,
            ..skipped
        };
        assert_eq!(accepted.recorded_value(), "12345");
    }

    #[test]
    fn test_profile_uses_recorded_values() {
        let mut state = SessionState::new(Uuid::new_v4(), &default_fields());
        for (key, raw, accepted) in [("full_name", "John Smith", true), ("phone", "54", false)] {
            state.answers.insert(
                key.to_string(),
                CollectedAnswer {
                    field_key: key.to_string(),
                    raw_text: raw.to_string(),
                    accepted,
                },
            );
        }

        let profile = state.profile();
        assert_eq!(profile["full_name"], "John Smith");
        assert_eq!(profile["phone"], "[Invalid: 54]");
    }

    #[test]
    fn test_phase_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Phase::TechQuestions).unwrap(),
            "\"tech_questions\""
        );
    }
}
