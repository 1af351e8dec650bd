//! The inquiry relay: compose a notification email and dispatch it through
//! an injected transport.

use std::sync::Arc;

use async_trait::async_trait;

use curio_core::{DomainError, DomainResult};

use crate::inquiry::Inquiry;

/// A composed, transport-agnostic email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    /// Replies go to the inquirer, not the relay sender.
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Capability for dispatching a composed email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> DomainResult<()>;
}

#[async_trait]
impl<M> Mailer for Arc<M>
where
    M: Mailer + ?Sized,
{
    async fn send(&self, message: &EmailMessage) -> DomainResult<()> {
        (**self).send(message).await
    }
}

/// Mailer used when no SMTP transport is configured. Every send fails
/// with a `Relay` error, so the failure policy stays in [`RelayMode`]:
/// development swallows the failure (local runs work without a mail
/// server), production surfaces it.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> DomainResult<()> {
        tracing::info!(to = %message.to, subject = %message.subject, "no mail transport configured; email not dispatched");
        Err(DomainError::relay("no mail transport configured"))
    }
}

/// Failure policy for the relay.
///
/// In `Development`, a transport failure is logged and the relay still
/// reports success, so local runs work without a reachable mail server.
/// Callers must not read that success as a delivery guarantee. The policy
/// is an explicit configuration value rather than an ambient environment
/// check, so the soft-fail is always visible at the call site that wires
/// the relay.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RelayMode {
    Production,
    Development,
}

impl RelayMode {
    /// Parse a mode from configuration text; anything other than
    /// `production`/`prod` is treated as development.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Validates inquiries, composes the notification email, and dispatches it
/// to the configured recipient.
pub struct InquiryRelay {
    mailer: Arc<dyn Mailer>,
    from: String,
    recipient: String,
    mode: RelayMode,
}

impl InquiryRelay {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        from: impl Into<String>,
        recipient: impl Into<String>,
        mode: RelayMode,
    ) -> Self {
        Self {
            mailer,
            from: from.into(),
            recipient: recipient.into(),
            mode,
        }
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    /// Validate, compose, and dispatch an inquiry.
    pub async fn relay(&self, inquiry: &Inquiry) -> DomainResult<()> {
        inquiry.validate()?;

        let message = self.compose(inquiry);
        match self.mailer.send(&message).await {
            Ok(()) => Ok(()),
            Err(err) => match self.mode {
                RelayMode::Production => Err(err),
                RelayMode::Development => {
                    tracing::warn!(error = %err, "inquiry email dispatch failed; reporting success in development mode");
                    Ok(())
                }
            },
        }
    }

    fn compose(&self, inquiry: &Inquiry) -> EmailMessage {
        let mut subject = inquiry
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("New inquiry")
            .to_string();
        if let Some(item_name) = inquiry.item_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            subject = format!("{subject} (about {item_name})");
        }

        let mut body = String::new();
        body.push_str("New inquiry\n\n");
        body.push_str(&format!("From: {}\n", inquiry.name.trim()));
        body.push_str(&format!("Email: {}\n", inquiry.email.trim()));
        if let Some(phone) = inquiry.phone.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            body.push_str(&format!("Phone: {phone}\n"));
        }
        if let Some(item_name) = inquiry.item_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match inquiry.item_id {
                Some(id) => body.push_str(&format!("Item: {item_name} ({id})\n")),
                None => body.push_str(&format!("Item: {item_name}\n")),
            }
        } else if let Some(id) = inquiry.item_id {
            body.push_str(&format!("Item: {id}\n"));
        }
        body.push_str(&format!("\nMessage:\n{}\n", inquiry.message.trim()));
        body.push_str("\nThis inquiry was sent from the website contact form.\n");

        EmailMessage {
            from: self.from.clone(),
            to: self.recipient.clone(),
            reply_to: Some(inquiry.email.trim().to_string()),
            subject,
            body,
        }
    }
}
