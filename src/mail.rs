//! Mail delivery used by the notification worker.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::{Config, MailBackend, SmtpConfig};
use crate::queue::EmailJob;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },
    #[error("could not build message: {0}")]
    Build(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Delivers the email described by a job.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, job: &EmailJob) -> Result<(), MailError>;
}

/// Sends through an SMTP relay with lettre's async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds a plaintext SMTP transport for `config`. Credentials are used
    /// when both username and password are configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&config.from_address)?;
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, job: &EmailJob) -> Result<Message, MailError> {
        build_message(&self.from, job)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, job: &EmailJob) -> Result<(), MailError> {
        let message = self.build_message(job)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Logs the email instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, job: &EmailJob) -> Result<(), MailError> {
        log::info!(
            "mail to {} with subject {:?} not sent (log backend)",
            job.recipient,
            job.subject
        );
        Ok(())
    }
}

/// Picks the mailer selected by `MAIL_BACKEND`.
pub fn mailer_from_config(config: &Config) -> Result<Arc<dyn Mailer>, MailError> {
    let mailer: Arc<dyn Mailer> = match config.mail_backend {
        MailBackend::Log => Arc::new(LogMailer),
        MailBackend::Smtp => Arc::new(SmtpMailer::new(&config.smtp)?),
    };
    Ok(mailer)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

fn build_message(from: &Mailbox, job: &EmailJob) -> Result<Message, MailError> {
    Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&job.recipient)?)
        .subject(job.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(job.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}
