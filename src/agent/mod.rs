//! Client abstraction for the external analysis agent
//!
//! The agent exposes six HTTP operations (see [`AgentEndpoint`]); this module
//! provides the trait, the production `reqwest`-backed client, a scripted
//! mock for tests, and the wire types shared by the stage executors.

mod client;
mod error;
mod http;
mod mock;
pub mod types;

pub use client::{AgentClient, AgentEndpoint};
pub use error::AgentError;
pub use http::HttpAgentClient;
pub use mock::MockAgentClient;
pub use types::decode_envelope;
