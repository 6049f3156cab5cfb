//! Outbound mail.
//!
//! The engine only talks to the [`Mailer`] trait; [`SmtpMailer`] is the
//! production implementation backed by `lettre`.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub const DEFAULT_MAIL_FROM: &str = "\"Gastos Mensais\" <no-reply@gastosmensais.app>";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Delivers a mail and returns the delivery identifier.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, mail: OutgoingMail) -> ResultEngine<String>;
}

/// SMTP connection parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `Mailer` over SMTP with opportunistic STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").field("host", &self.host).finish()
    }
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> ResultEngine<Self> {
        let tls = TlsParameters::new(config.host.clone())
            .map_err(|err| EngineError::Mail(format!("invalid smtp host: {err}")))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port)
                .tls(Tls::Opportunistic(tls));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }
}

fn message_id(from: &Mailbox) -> String {
    format!("<{}@{}>", Uuid::new_v4(), from.email.domain())
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> ResultEngine<String> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|err| EngineError::Mail(format!("invalid sender '{}': {err}", mail.from)))?;
        let id = message_id(&from);

        let mut builder = Message::builder()
            .from(from)
            .subject(mail.subject)
            .message_id(Some(id.clone()))
            .header(ContentType::TEXT_HTML);
        for to in &mail.to {
            let to: Mailbox = to
                .parse()
                .map_err(|err| EngineError::Mail(format!("invalid recipient '{to}': {err}")))?;
            builder = builder.to(to);
        }
        let message = builder
            .body(mail.html)
            .map_err(|err| EngineError::Mail(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| EngineError::Mail(err.to_string()))?;

        tracing::info!(host = %self.host, message_id = %id, "summary mail delivered");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_uses_sender_domain() {
        let from: Mailbox = DEFAULT_MAIL_FROM.parse().unwrap();
        let id = message_id(&from);
        assert!(id.starts_with('<'));
        assert!(id.ends_with("@gastosmensais.app>"));
    }

    #[tokio::test]
    async fn smtp_mailer_builds_from_config() {
        let mailer = SmtpMailer::new(&SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: DEFAULT_SMTP_PORT,
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
        })
        .unwrap();
        assert!(format!("{mailer:?}").contains("smtp.example.com"));
    }

    #[tokio::test]
    async fn invalid_sender_is_a_mail_error() {
        let mailer = SmtpMailer::new(&SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
        })
        .unwrap();
        let result = mailer
            .send(OutgoingMail {
                from: "not an address".to_string(),
                to: vec!["a@x.com".to_string()],
                subject: "s".to_string(),
                html: "<p>x</p>".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EngineError::Mail(_))));
    }
}
