//! SMTP implementation of the inquiry [`Mailer`] capability.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use curio_core::{DomainError, DomainResult};
use curio_inquiry::{EmailMessage, Mailer};

/// SMTP transport settings, from environment configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (SMTPS) when true; STARTTLS otherwise.
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Mailer over an async SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> DomainResult<Self> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| DomainError::relay(format!("smtp transport: {e}")))?;

        let mut builder = builder.port(config.port);
        if let (Some(user), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(addr: &str, what: &str) -> DomainResult<Mailbox> {
    addr.parse::<Mailbox>()
        .map_err(|e| DomainError::relay(format!("invalid {what} address ({addr:?}): {e}")))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> DomainResult<()> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&message.from, "from")?)
            .to(parse_mailbox(&message.to, "to")?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to, "reply-to")?);
        }

        let email = builder
            .body(message.body.clone())
            .map_err(|e| DomainError::relay(format!("compose: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DomainError::relay(format!("smtp send: {e}")))?;

        tracing::debug!(to = %message.to, "inquiry email dispatched");
        Ok(())
    }
}
