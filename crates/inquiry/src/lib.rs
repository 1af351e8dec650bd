//! `curio-inquiry` — the inquiry domain: validation, message composition,
//! and the email relay.
//!
//! Inquiries are transient. They are validated, composed into an email,
//! dispatched through an injected [`Mailer`], and discarded; nothing is
//! persisted.

pub mod inquiry;
pub mod relay;

pub use inquiry::Inquiry;
pub use relay::{EmailMessage, InquiryRelay, LogMailer, Mailer, RelayMode};
