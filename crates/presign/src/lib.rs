//! Authorization client for the uplink backend.
//!
//! Issues the three backend round trips the upload flow needs: a one-time
//! presigned upload authorization, a time-limited read link, and an object
//! delete. Every call is a fresh request; nothing is cached or retried.

pub mod client;

pub use client::{AuthorizationError, Client, ClientOptions};
