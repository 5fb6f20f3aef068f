//! Test doubles for the extraction API.
//!
//! [`MockServer`] is an in-process HTTP server that models the job state
//! machine of the remote service for both API versions. [`ScriptedApi`]
//! replays a fixed sequence of statuses for workflow tests that run on a
//! paused clock.

mod scripted;
mod server;

pub(crate) use scripted::{ScriptedApi, ScriptedCall};
pub(crate) use server::MockServer;
