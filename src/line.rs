//! Messaging platform adapter
//!
//! Inbound: signature check and webhook decoding. Outbound: rendering and
//! delivery of replies.

mod client;
mod message;
pub mod signature;
mod webhook;

pub use client::{LineClient, ReplyError, ReplySender, DEFAULT_BASE_URL};
pub use signature::{verify, SignatureError, SIGNATURE_HEADER};
pub use webhook::WebhookBody;
