// Candidate screening: field collection, validation, technical questions.
// All model calls go through the `Collaborator` trait in llm_client.

pub mod fields;
pub mod handlers;
pub mod machine;
pub mod prompts;
pub mod session;
pub mod store;
pub mod tech_questions;
pub mod validator;
