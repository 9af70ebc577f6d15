//! Client for the messaging bridge: a local HTTP service that logs into a
//! messaging account and posts text to chats on the notepad's behalf.

pub mod api;
pub mod client;

pub use api::{BridgeResponse, LoginOutcome, LoginRequest, SendRequest, SubmitCodeRequest};
pub use client::{compose_message, BridgeClient, Credentials, MessageTarget};
