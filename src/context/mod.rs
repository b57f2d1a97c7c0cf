//! Session context for agents.
//!
//! Every farmer question gets its own [`SessionState`]; tools and agents record
//! their latest results in it under well-known keys.

pub mod session_state;

pub use session_state::SessionState;
