//! Out-of-band notifications for new contact submissions.

use std::time::Duration;

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::json;
use thiserror::Error;

use crate::{config::SmtpConfig, models::ContactSubmission, sitemap::escape_xml};

pub const SLACK_USERNAME: &str = "TechResona Contact Form";

/// Upper bound on a webhook call so a slow Slack never stalls the form.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on each SMTP exchange.
pub const EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub fn email_subject(submission: &ContactSubmission) -> String {
    format!("New Contact Form Submission from {}", submission.name)
}

/// Render the HTML email body. Every submitted value is escaped.
pub fn email_body(submission: &ContactSubmission) -> String {
    let or_missing = |v: Option<&String>| {
        v.map(|s| escape_xml(s))
            .unwrap_or_else(|| "Not provided".to_string())
    };

    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <h2 style="color: #4F46E5;">New Contact Form Submission</h2>
    <div style="background-color: #f9fafb; padding: 20px; border-radius: 8px; margin: 20px 0;">
      <p><strong>Name:</strong> {name}</p>
      <p><strong>Email:</strong> {email}</p>
      <p><strong>Company:</strong> {company}</p>
      <p><strong>Phone:</strong> {phone}</p>
      <p><strong>Message:</strong></p>
      <p style="background-color: white; padding: 15px; border-radius: 5px; border-left: 4px solid #4F46E5;">
        {message}
      </p>
    </div>
    <p style="color: #6b7280; font-size: 14px;">
      Submitted at: {submitted_at}
    </p>
  </body>
</html>"#,
        name = escape_xml(&submission.name),
        email = escape_xml(&submission.email),
        company = or_missing(submission.company.as_ref()),
        phone = or_missing(submission.phone.as_ref()),
        message = escape_xml(&submission.message),
        submitted_at = submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Build the notification sent from the SMTP account to the contact inbox.
pub fn build_email(smtp: &SmtpConfig, submission: &ContactSubmission) -> Result<Message, EmailError> {
    let from: Mailbox = smtp.username.parse()?;
    let to: Mailbox = smtp.contact_email.parse()?;

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(email_subject(submission))
        .header(ContentType::TEXT_HTML)
        .body(email_body(submission))?)
}

async fn send_email(smtp: &SmtpConfig, submission: &ContactSubmission) -> Result<(), EmailError> {
    let message = build_email(smtp, submission)?;

    let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
        .port(smtp.port)
        .timeout(Some(EMAIL_TIMEOUT));
    if let Some(password) = &smtp.password {
        transport = transport.credentials(Credentials::new(smtp.username.clone(), password.clone()));
    }

    transport.build().send(message).await?;
    Ok(())
}

/// Email `submission` to the contact inbox. Returns whether the message was
/// accepted; failures are logged and never propagated.
pub async fn notify_email(smtp: Option<&SmtpConfig>, submission: &ContactSubmission) -> bool {
    let Some(smtp) = smtp else {
        tracing::warn!("SMTP not configured, skipping contact email");
        return false;
    };

    match send_email(smtp, submission).await {
        Ok(()) => {
            tracing::info!(to = %smtp.contact_email, "Contact email sent");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send contact email");
            false
        }
    }
}

/// Render the Slack message body for a submission.
pub fn slack_message(submission: &ContactSubmission) -> String {
    format!(
        "🆕 *New Contact Form Submission*\n\n\
         *Name:* {}\n\
         *Email:* {}\n\
         *Company:* {}\n\
         *Phone:* {}\n\n\
         *Message:*\n{}\n\n\
         _Submitted at: {}_",
        submission.name,
        submission.email,
        submission.company.as_deref().unwrap_or("Not provided"),
        submission.phone.as_deref().unwrap_or("Not provided"),
        submission.message,
        submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Post `submission` to the Slack incoming webhook. Returns whether the
/// notification was delivered; failures are logged and never propagated.
pub async fn notify_slack(
    client: &reqwest::Client,
    webhook_url: Option<&str>,
    submission: &ContactSubmission,
) -> bool {
    let Some(url) = webhook_url.filter(|u| !u.contains("YOUR_WEBHOOK_URL")) else {
        tracing::warn!("Slack webhook URL not configured, skipping Slack notification");
        return false;
    };

    let payload = json!({
        "text": slack_message(submission),
        "username": SLACK_USERNAME,
        "icon_emoji": ":email:",
    });

    match client
        .post(url)
        .timeout(WEBHOOK_TIMEOUT)
        .json(&payload)
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Slack notification sent");
            true
        }
        Ok(resp) => {
            tracing::error!(status = %resp.status(), "Slack notification rejected");
            false
        }
        Err(e) => {
            tracing::error!(error = ?e, "Failed to send Slack notification");
            false
        }
    }
}
