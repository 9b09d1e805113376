// All LLM prompt templates and fixed candidate-facing copy for the screening module.

/// Yes/no field check. Replace: {criterion}, {valid_examples}, {invalid_examples}, {answer}
pub const VERDICT_PROMPT_TEMPLATE: &str = r#"Decide whether a job candidate's answer is {criterion}.

Reply with exactly one word: VALID or INVALID.

Examples of VALID answers:
{valid_examples}

Examples of INVALID answers:
{invalid_examples}

Candidate answer:
"""
{answer}
"""

Verdict:"#;

/// Technical question generation. Replace: {tech_stack}, {topic}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"The candidate lists this tech stack:
{tech_stack}

Write ONE interview question about {topic} that a candidate with this stack should be able to answer in a few sentences.
Tie it to the listed technologies where it makes sense.
Return only the question text."#;

/// Answer scoring. Replace: {question}, {answer}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Rate the candidate's answer to an interview question.

Question:
{question}

Answer:
"""
{answer}
"""

Respond in this format:
Score: <1-10>/10
Feedback: <one or two sentences>"#;

pub const GREETING: &str = "Hello! I'm the screening assistant. I'll collect a few details \
    and then ask some short technical questions. Type 'exit' at any time to stop.";

pub const CLOSING_MESSAGE: &str = "Thank you! Team will contact you soon.";

pub const TECH_INTRO: &str = "Thanks, that's everything I need. Now a few technical questions.";

pub const ALREADY_COMPLETE: &str = "This screening is already complete. Thank you for your time!";

/// Retry notice. Replace: {label}, {attempt}, {max_attempts}
pub const RETRY_TEMPLATE: &str =
    "That doesn't look like a valid {label}. Please try again ({attempt}/{max_attempts}).";

/// Forced-skip notice. Replace: {label}
pub const SKIP_TEMPLATE: &str =
    "I couldn't validate your {label}, so I've recorded it as-is and we'll move on.";
