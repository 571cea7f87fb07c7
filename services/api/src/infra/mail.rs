//! SMTP-backed [`Mailer`].

use anyhow::Context as _;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::{MailMessage, Mailer};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Build a STARTTLS transport to `host:port`, authenticating when credentials are given.
    pub fn new(
        host: &str,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        from: String,
    ) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("build smtp transport for {host}"))?
            .port(port);
        if let (Some(username), Some(password)) = (username, password) {
            builder = builder.credentials(Credentials::new(username, password));
        }
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()> {
        let mut builder = Message::builder()
            .from(self.from.parse().context("parse from address")?)
            .to(message.to.parse().context("parse recipient address")?)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = message.reply_to {
            builder = builder.reply_to(reply_to.parse().context("parse reply-to address")?);
        }
        let email = builder.body(message.body).context("build email")?;
        self.transport.send(email).await.context("send email")?;
        Ok(())
    }
}
