use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Form, Router};
use serde::Deserialize;
use tracing::info;

use crate::directory::{InsertOutcome, UserDirectory, UserEmail};
use crate::error::AppError;
use crate::templates::{email_page, EmailView};

pub const EMPTY_FIELDS_MESSAGE: &str = "Username or email cannot be empty!";

#[derive(Clone)]
pub struct EmailState {
    pub directory: Arc<dyn UserDirectory>,
}

/// Both forms post to `/`; which fields are present decides the action.
#[derive(Debug, Default, Deserialize)]
pub struct EmailForm {
    pub user_keyword: Option<String>,
    pub username: Option<String>,
    pub useremail: Option<String>,
}

pub fn router(state: EmailState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn find_emails(
    directory: &dyn UserDirectory,
    keyword: &str,
) -> Result<Vec<UserEmail>, AppError> {
    directory.find_by_fragment(keyword).await
}

pub async fn insert_email(
    directory: &dyn UserDirectory,
    name: &str,
    email: &str,
) -> Result<String, AppError> {
    if name.is_empty() || email.is_empty() {
        return Ok(EMPTY_FIELDS_MESSAGE.to_string());
    }

    match directory.insert_user(name, email).await? {
        InsertOutcome::Added => {
            info!(username = name, "added user");
            Ok(format!(
                "User {name} with email {email} has been added successfully."
            ))
        }
        InsertOutcome::AlreadyExists => Ok(format!("User {name} already exists.")),
    }
}

async fn index() -> Html<String> {
    Html(email_page(&EmailView::Empty))
}

async fn submit(
    State(state): State<EmailState>,
    Form(form): Form<EmailForm>,
) -> Result<Html<String>, AppError> {
    let view = match form {
        EmailForm {
            user_keyword: Some(keyword),
            ..
        } => EmailView::Matches(find_emails(state.directory.as_ref(), &keyword).await?),
        EmailForm {
            username: Some(name),
            useremail: Some(email),
            ..
        } => EmailView::Feedback(insert_email(state.directory.as_ref(), &name, &email).await?),
        _ => EmailView::Empty,
    };

    Ok(Html(email_page(&view)))
}

async fn healthz() -> &'static str {
    "ok"
}
