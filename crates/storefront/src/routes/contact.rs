//! Contact form route handlers.
//!
//! There is no mail backend: a valid message is logged together with the
//! configured recipient after the simulated sending delay.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::{Layout, NavItem};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::{ContactForm, FieldErrors};
use crate::models::{Notice, push_notice};
use crate::services::simulate_processing;
use crate::state::AppState;

/// Notice shown after a message is accepted.
pub const CONTACT_SUCCESS: &str = "Thank you for contacting us. We will get back to you soon.";

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub form: ContactForm,
    pub errors: FieldErrors,
}

/// Display the contact form.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    Ok(ContactTemplate {
        layout: Layout::load(&state, &session, "Contact Us", NavItem::Contact).await?,
        form: ContactForm::default(),
        errors: FieldErrors::new(),
    })
}

/// Submit the contact form.
///
/// Invalid input re-renders the form with field messages (422).
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let message = match form.validate() {
        Ok(message) => message,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Contact form rejected");
            let page = ContactTemplate {
                layout: Layout::load(&state, &session, "Contact Us", NavItem::Contact).await?,
                form,
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    simulate_processing(state.config().simulated_latency).await;

    tracing::info!(
        recipient = %state.config().contact_recipient,
        from = %message.email,
        name = %message.name,
        subject = %message.subject,
        length = message.message.len(),
        "Contact message received"
    );
    add_breadcrumb(
        "contact",
        "Contact message sent",
        &[("subject", message.subject.as_str())],
    );

    push_notice(&session, Notice::success(CONTACT_SUCCESS)).await?;
    Ok(Redirect::to("/contact").into_response())
}
