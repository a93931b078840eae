use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::debug;

use crate::config::SmtpSettings;
use crate::error::NotificationError;
use crate::models::Notification;
use crate::notifier::Mailer;

/// Delivers notifications through an SMTP relay upgraded with STARTTLS.
///
/// A fresh connection is opened for every message and closed once it has
/// been accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

impl Mailer for SmtpMailer {
    fn send(&self, settings: &SmtpSettings, notification: &Notification) -> Result<(), NotificationError> {
        let message = build_message(settings, notification)?;

        let smtp_error = |source: lettre::transport::smtp::Error| NotificationError::Smtp {
            host: settings.host.clone(),
            port: settings.port,
            source,
        };

        let transport = SmtpTransport::starttls_relay(&settings.host)
            .map_err(smtp_error)?
            .port(settings.port)
            .credentials(Credentials::new(settings.sender.clone(), settings.password.clone()))
            .build();

        debug!("Sending '{}' via {}:{}", notification.subject, settings.host, settings.port);
        transport.send(&message).map_err(smtp_error)?;
        Ok(())
    }
}

/// Build the plain-text message from the sender to the receiver.
pub fn build_message(settings: &SmtpSettings, notification: &Notification) -> Result<Message, NotificationError> {
    let from = parse_mailbox(&settings.sender)?;
    let to = parse_mailbox(&settings.receiver)?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(notification.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())?;

    Ok(message)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address.parse::<Mailbox>().map_err(|source| NotificationError::Address {
        address: address.to_string(),
        source,
    })
}
