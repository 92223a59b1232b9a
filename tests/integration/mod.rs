//! Integration tests for oauth2_bridge
//!
//! Everything runs in-process: a framework request is built, translated for
//! the authorization server, answered, and written back onto a framework
//! response.
//!
//! Run with: cargo test --test integration

mod helpers;

mod end_to_end;
mod request_translation;
mod response_mapping;
