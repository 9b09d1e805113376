//! Validator — decides whether a raw answer is acceptable for a field.
//!
//! Local rules are pure and deterministic. Remote checks make exactly one
//! collaborator call and fail closed: any collaborator error is a `false`
//! verdict. Retry policy lives in the state machine, not here.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::llm_client::{Collaborator, GenerationOptions};
use crate::screening::fields::{FieldSpec, PatternRule, RemoteCheck, ValidationPolicy};
use crate::screening::prompts::VERDICT_PROMPT_TEMPLATE;

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

static RE_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2})\+?(\s*(years?|yrs?)(\s+.*)?)?$").expect("valid regex")
});

const MAX_YEARS_EXPERIENCE: u32 = 60;

pub async fn validate(raw_text: &str, field: &FieldSpec, collaborator: &dyn Collaborator) -> bool {
    let text = raw_text.trim();
    if text.is_empty() {
        return false;
    }

    match &field.validation_policy {
        ValidationPolicy::LocalPattern { rule } => matches_pattern(*rule, text),
        ValidationPolicy::RemoteYesNo { check } => {
            let prompt = build_verdict_prompt(check, text);
            match collaborator.generate(&prompt, GenerationOptions::VERDICT).await {
                Ok(reply) => {
                    let verdict = classify_verdict(&reply);
                    debug!(field = field.key, verdict, "Remote validation verdict");
                    verdict
                }
                Err(e) => {
                    warn!(field = field.key, "Remote validation unavailable, failing closed: {e}");
                    false
                }
            }
        }
    }
}

/// Applies a local rule to already-trimmed text.
pub fn matches_pattern(rule: PatternRule, text: &str) -> bool {
    match rule {
        PatternRule::PersonName => is_person_name(text),
        PatternRule::Email => RE_EMAIL.is_match(text),
        PatternRule::Phone => text.len() == 10 && text.chars().all(|c| c.is_ascii_digit()),
        PatternRule::YearsOfExperience => RE_YEARS
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .is_some_and(|years| years <= MAX_YEARS_EXPERIENCE),
    }
}

fn is_person_name(text: &str) -> bool {
    let allowed = text
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'');
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    allowed && letters >= 2
}

/// Two-valued reading of a VALID/INVALID reply.
///
/// "INVALID" is checked first because it contains "VALID" as a substring.
/// Anything that mentions neither token is not valid.
pub fn classify_verdict(reply: &str) -> bool {
    let normalized = reply.trim().to_uppercase();
    if normalized.contains("INVALID") {
        return false;
    }
    normalized.contains("VALID")
}

fn build_verdict_prompt(check: &RemoteCheck, answer: &str) -> String {
    VERDICT_PROMPT_TEMPLATE
        .replace("{criterion}", check.criterion)
        .replace("{valid_examples}", &bullet_list(check.valid_examples))
        .replace("{invalid_examples}", &bullet_list(check.invalid_examples))
        .replace("{answer}", answer)
}

fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
