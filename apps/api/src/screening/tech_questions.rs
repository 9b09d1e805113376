//! Tech Question Phase — question generation and optional answer scoring.
//!
//! Both calls degrade instead of failing: a question falls back to a fixed
//! template, a score is simply omitted.

use tracing::warn;

use crate::llm_client::{Collaborator, GenerationOptions};
use crate::screening::prompts::{FEEDBACK_PROMPT_TEMPLATE, QUESTION_PROMPT_TEMPLATE};

/// Topics asked in order; a session uses the first N.
pub const TOPIC_POOL: &[&str] = &[
    "Algorithms",
    "Data Structures",
    "System Design",
    "Testing",
    "Debugging",
];

/// Derives the fixed topic list for a session. Independent of anything the
/// candidate has said.
pub fn select_topics(count: usize) -> Vec<String> {
    TOPIC_POOL
        .iter()
        .take(count)
        .map(|t| t.to_string())
        .collect()
}

pub fn fallback_question(topic: &str) -> String {
    format!("Explain {topic}.")
}

pub async fn next_question(collaborator: &dyn Collaborator, tech_stack: &str, topic: &str) -> String {
    let prompt = QUESTION_PROMPT_TEMPLATE
        .replace("{tech_stack}", tech_stack)
        .replace("{topic}", topic);

    match collaborator.generate(&prompt, GenerationOptions::QUESTION).await {
        Ok(question) if !question.trim().is_empty() => question.trim().to_string(),
        Ok(_) => {
            warn!(topic, "Collaborator returned a blank question, using fallback");
            fallback_question(topic)
        }
        Err(e) => {
            warn!(topic, "Question generation failed, using fallback: {e}");
            fallback_question(topic)
        }
    }
}

/// Rating and feedback for one answer, or `None` if the collaborator is unavailable.
pub async fn score(collaborator: &dyn Collaborator, question: &str, answer: &str) -> Option<String> {
    let prompt = FEEDBACK_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);

    match collaborator.generate(&prompt, GenerationOptions::FEEDBACK).await {
        Ok(feedback) if !feedback.trim().is_empty() => Some(feedback.trim().to_string()),
        Ok(_) => None,
        Err(e) => {
            warn!("Answer scoring failed, skipping: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedCollaborator;

    #[test]
    fn test_select_topics_takes_pool_prefix() {
        assert_eq!(
            select_topics(3),
            vec!["Algorithms", "Data Structures", "System Design"]
        );
    }

    #[test]
    fn test_select_topics_caps_at_pool_size() {
        assert_eq!(select_topics(50).len(), TOPIC_POOL.len());
    }

    #[tokio::test]
    async fn test_question_from_collaborator_is_trimmed() {
        let collaborator = ScriptedCollaborator::always("  How does a B-tree stay balanced?\n");
        let q = next_question(&collaborator, "Rust, PostgreSQL", "Data Structures").await;
        assert_eq!(q, "How does a B-tree stay balanced?");

        let prompt = &collaborator.prompts()[0];
        assert!(prompt.contains("Rust, PostgreSQL"));
        assert!(prompt.contains("Data Structures"));
    }

    #[tokio::test]
    async fn test_transport_error_falls_back_to_template() {
        let collaborator = ScriptedCollaborator::failing();
        let q = next_question(&collaborator, "Python", "Algorithms").await;
        assert_eq!(q, "Explain Algorithms.");
    }

    #[tokio::test]
    async fn test_blank_question_falls_back_to_template() {
        let collaborator = ScriptedCollaborator::always("   ");
        let q = next_question(&collaborator, "Go", "Testing").await;
        assert_eq!(q, "Explain Testing.");
    }

    #[tokio::test]
    async fn test_score_returns_feedback() {
        let collaborator = ScriptedCollaborator::always("Score: 8/10\nFeedback: Clear and correct.");
        let feedback = score(&collaborator, "What is a mutex?", "A lock.").await;
        assert_eq!(feedback.as_deref(), Some("Score: 8/10\nFeedback: Clear and correct."));
    }

    #[tokio::test]
    async fn test_score_omitted_on_failure() {
        let collaborator = ScriptedCollaborator::failing();
        assert!(score(&collaborator, "What is a mutex?", "A lock.").await.is_none());
    }
}
