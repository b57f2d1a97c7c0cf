//! Tools the domain agents expose to the model.
//!
//! Each tool wraps one calculator or table lookup. A run stores its result in
//! the question's [`SessionState`](crate::context::SessionState) under the
//! tool's own name, so `get_market_prices` leaves the quote at
//! `session["get_market_prices"]`.

mod context;
pub mod crops;
pub mod economics;
pub mod health;
pub mod resources;
mod tool;
pub mod weather;

pub use context::ToolContext;
pub use tool::{object_schema, parse_args, FunctionDescriptor, LlmTool, ToolDescriptor};
