//! Collection state machine.
//!
//! Collecting(index, retry_count) → TechQuestions(tech_index) → Complete.
//! Every transition is driven by locally tracked counters; collaborator
//! output is only ever shown to the candidate or reduced to a yes/no verdict.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::llm_client::Collaborator;
use crate::screening::fields::{FieldSpec, TECH_STACK_KEY};
use crate::screening::prompts::{
    ALREADY_COMPLETE, CLOSING_MESSAGE, RETRY_TEMPLATE, SKIP_TEMPLATE, TECH_INTRO,
};
use crate::screening::session::{CollectedAnswer, Phase, SessionState, TechAnswer};
use crate::screening::tech_questions::{
    fallback_question, next_question, score, select_topics,
};
use crate::screening::validator::validate;

/// Attempts per field before it is force-skipped.
pub const MAX_ATTEMPTS: u8 = 3;

pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye"];

/// Ordinary words that begin or end with an exit keyword.
const NOT_EXIT_WORDS: &[&str] = &["quite"];

const UNKNOWN_TECH_STACK: &str = "general software engineering";

#[derive(Debug, Clone)]
pub struct ScreeningOptions {
    pub tech_question_count: usize,
    pub enable_answer_scoring: bool,
}

impl Default for ScreeningOptions {
    fn default() -> Self {
        Self {
            tech_question_count: 3,
            enable_answer_scoring: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub phase: Phase,
}

/// Drives sessions through the screening flow. Holds no per-session state;
/// each call mutates only the `SessionState` it is handed.
#[derive(Clone)]
pub struct Screener {
    fields: Arc<[FieldSpec]>,
    collaborator: Arc<dyn Collaborator>,
    options: ScreeningOptions,
}

impl Screener {
    pub fn new(
        fields: Vec<FieldSpec>,
        collaborator: Arc<dyn Collaborator>,
        options: ScreeningOptions,
    ) -> Self {
        Self {
            fields: fields.into(),
            collaborator,
            options,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn start_session(&self, id: Uuid) -> SessionState {
        SessionState::new(id, &self.fields)
    }

    pub fn reset_session(&self, state: &mut SessionState) {
        state.reset(&self.fields);
        info!(session_id = %state.id, "Session reset");
    }

    /// Processes one candidate message: records it, advances the machine,
    /// records and returns the assistant's reply.
    pub async fn handle_turn(&self, state: &mut SessionState, input: &str) -> TurnOutcome {
        state.push_user(input);

        let phase = state.phase;
        let reply = match phase {
            Phase::Complete => ALREADY_COMPLETE.to_string(),
            _ if is_exit_request(input) => {
                info!(session_id = %state.id, ?phase, "Candidate ended the screening");
                self.finish(state);
                CLOSING_MESSAGE.to_string()
            }
            Phase::Collecting => self.collect(state, input).await,
            Phase::TechQuestions => self.record_tech_answer(state, input).await,
        };

        state.push_assistant(reply.clone());
        TurnOutcome {
            reply,
            phase: state.phase,
        }
    }

    async fn collect(&self, state: &mut SessionState, input: &str) -> String {
        let Some(field) = self.fields.get(state.current_field_index) else {
            return self.enter_tech_questions(state).await;
        };

        if validate(input, field, self.collaborator.as_ref()).await {
            store_answer(state, field, input, true);
            return self.advance(state).await;
        }

        if state.retry_count + 1 < MAX_ATTEMPTS {
            state.retry_count += 1;
            let notice = RETRY_TEMPLATE
                .replace("{label}", field.label)
                .replace("{attempt}", &(state.retry_count + 1).to_string())
                .replace("{max_attempts}", &MAX_ATTEMPTS.to_string());
            return format!("{notice}\n\n{}", field.prompt_text);
        }

        info!(
            session_id = %state.id,
            field = field.key,
            "Field failed validation {MAX_ATTEMPTS} times, recording as invalid"
        );
        store_answer(state, field, input, false);
        let notice = SKIP_TEMPLATE.replace("{label}", field.label);
        let next = self.advance(state).await;
        format!("{notice}\n\n{next}")
    }

    /// Moves past the current field and prompts whatever comes next.
    async fn advance(&self, state: &mut SessionState) -> String {
        state.current_field_index += 1;
        state.retry_count = 0;

        match self.fields.get(state.current_field_index) {
            Some(next) => next.prompt_text.to_string(),
            None => self.enter_tech_questions(state).await,
        }
    }

    async fn enter_tech_questions(&self, state: &mut SessionState) -> String {
        state.phase = Phase::TechQuestions;
        state.tech_topics = select_topics(self.options.tech_question_count);
        state.tech_index = 0;
        info!(
            session_id = %state.id,
            topics = state.tech_topics.len(),
            "All fields collected, starting technical questions"
        );

        let question = self.ask_current_topic(state).await;
        format!("{TECH_INTRO}\n\n{question}")
    }

    async fn ask_current_topic(&self, state: &mut SessionState) -> String {
        let Some(topic) = state.tech_topics.get(state.tech_index).cloned() else {
            self.finish(state);
            return CLOSING_MESSAGE.to_string();
        };

        let tech_stack = state
            .answer(TECH_STACK_KEY)
            .map(|a| a.raw_text.clone())
            .unwrap_or_else(|| UNKNOWN_TECH_STACK.to_string());

        let question = next_question(self.collaborator.as_ref(), &tech_stack, &topic).await;
        state.pending_question = Some(question.clone());
        format!(
            "Question {}/{}: {question}",
            state.tech_index + 1,
            state.tech_topics.len()
        )
    }

    /// Accepts the candidate's answer to the pending question. Answers are
    /// never validated.
    async fn record_tech_answer(&self, state: &mut SessionState, input: &str) -> String {
        let Some(topic) = state.tech_topics.get(state.tech_index).cloned() else {
            self.finish(state);
            return CLOSING_MESSAGE.to_string();
        };

        let question = state
            .pending_question
            .take()
            .unwrap_or_else(|| fallback_question(&topic));

        let feedback = if self.options.enable_answer_scoring {
            score(self.collaborator.as_ref(), &question, input).await
        } else {
            None
        };

        state.tech_answers.push(TechAnswer {
            topic,
            question,
            answer: input.to_string(),
            feedback: feedback.clone(),
        });
        state.tech_index += 1;

        let next = if state.tech_index >= state.tech_topics.len() {
            self.finish(state);
            CLOSING_MESSAGE.to_string()
        } else {
            self.ask_current_topic(state).await
        };

        match feedback {
            Some(feedback) => format!("{feedback}\n\n{next}"),
            None => next,
        }
    }

    fn finish(&self, state: &mut SessionState) {
        state.phase = Phase::Complete;
        state.pending_question = None;
        let forced = state.answers.values().filter(|a| !a.accepted).count();
        info!(
            session_id = %state.id,
            collected = state.answers.len(),
            forced_skips = forced,
            tech_answers = state.tech_answers.len(),
            "Screening complete"
        );
    }
}

fn store_answer(state: &mut SessionState, field: &FieldSpec, raw_text: &str, accepted: bool) {
    state.answers.insert(
        field.key.to_string(),
        CollectedAnswer {
            field_key: field.key.to_string(),
            raw_text: raw_text.trim().to_string(),
            accepted,
        },
    );
}

/// True when any word of the message starts or ends with an exit keyword,
/// in any case: "Goodbye", "I'm quitting" and "exiting now" all count.
pub fn is_exit_request(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .any(|word| {
            !NOT_EXIT_WORDS.contains(&word.as_str())
                && EXIT_KEYWORDS
                    .iter()
                    .any(|keyword| word.starts_with(*keyword) || word.ends_with(*keyword))
        })
}
