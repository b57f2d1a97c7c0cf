//! Agent dispatch.
//!
//! A [`Coordinator`] routes each farmer question to one of five domain
//! [`Advisor`]s. The LLM-backed [`DomainAgent`] answers with its domain's
//! instructions and calculator tools, writing into a per-question
//! [`SessionState`](crate::context::SessionState).

pub mod coordinator;
pub mod domain;
mod prompts;

pub use coordinator::{route_question, AdvisoryAnswer, Coordinator};
pub use domain::{Advisor, Domain, DomainAgent, SETTINGS_KEY};
