use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::shared::validation_message;
use crate::{
    auth::AuthAdmin,
    error::AppResult,
    models::{ContactStatus, ContactSubmission, CreateContactDto},
    notify::{notify_email, notify_slack},
    state::AppState,
};

const CONTACT_COLUMNS: &str = "id, name, email, company, phone, message, status, submitted_at";

/// POST /api/contact/submit: store the submission, then notify by email and Slack.
///
/// The submission is persisted before any notification is attempted, and a
/// failed notification never fails the request.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(req): Json<CreateContactDto>,
) -> AppResult<(StatusCode, Json<ContactSubmission>)> {
    req.validate().map_err(validation_message)?;

    let submission = sqlx::query_as::<_, ContactSubmission>(&format!(
        "INSERT INTO contact_submissions
             (id, name, email, company, phone, message, status, submitted_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {CONTACT_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(req.name.trim())
    .bind(req.email.trim())
    .bind(req.company.filter(|c| !c.trim().is_empty()))
    .bind(req.phone.filter(|p| !p.trim().is_empty()))
    .bind(&req.message)
    .bind(ContactStatus::New)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    let (email_sent, slack_sent) = tokio::join!(
        notify_email(state.smtp.as_deref(), &submission),
        notify_slack(
            &state.http_client,
            state.slack_webhook_url.as_deref(),
            &submission,
        ),
    );

    info!(
        id = %submission.id,
        email = email_sent,
        slack = slack_sent,
        "Contact form submitted"
    );
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/contact/submissions: newest first.
pub async fn list_submissions(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<Vec<ContactSubmission>>> {
    let submissions = sqlx::query_as::<_, ContactSubmission>(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contact_submissions
         ORDER BY submitted_at DESC, rowid DESC
         LIMIT 1000"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(submissions))
}
