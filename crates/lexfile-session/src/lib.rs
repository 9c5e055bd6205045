//! Lexfile Session Library
//!
//! Per-user follow-up context for one active document at a time. The state is
//! an explicit tag, not a pile of booleans: a user either has no context
//! (idle/closed), an `Open` context, or is `AwaitingAnswer` for exactly the
//! next plain-text message. Contexts are ephemeral; they live in the
//! injected store for the lifetime of the process.

pub mod followup;
pub mod store;

pub use followup::{FollowupReply, FollowupSessions, SessionError};
pub use store::{FollowupContext, InMemorySessionStore, SessionState, SessionStore};
