//! Volunteer application submissions.
//!
//! Like the contact form there is no backend: an accepted application is
//! logged after the simulated sending delay and acknowledged with a notice.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::NavItem;
use super::pages::{VolunteerSection, render};
use crate::error::{Result, add_breadcrumb};
use crate::forms::VolunteerForm;
use crate::models::{Notice, push_notice};
use crate::services::simulate_processing;
use crate::state::AppState;

pub const VOLUNTEER_SUCCESS: &str =
    "Thank you for applying to volunteer. Our team will contact you soon.";

/// Invalid input re-renders the volunteer page with field messages (422).
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VolunteerForm>,
) -> Result<Response> {
    let application = match form.validate() {
        Ok(application) => application,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Volunteer form rejected");
            let section = VolunteerSection::new(form, errors);
            let page = render(&state, &session, NavItem::Volunteer, Some(section)).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    simulate_processing(state.config().simulated_latency).await;

    tracing::info!(
        recipient = %state.config().contact_recipient,
        from = %application.email,
        name = %application.name,
        role = application.role,
        availability = application.availability,
        has_phone = application.phone.is_some(),
        "Volunteer application received"
    );
    add_breadcrumb("volunteer", "Volunteer application sent", &[("role", application.role)]);

    push_notice(&session, Notice::success(VOLUNTEER_SUCCESS)).await?;
    Ok(Redirect::to("/volunteer").into_response())
}
