//! The markdown-backed sections: about, education and volunteer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, routing::MethodRouter, routing::get};
use tower_sessions::Session;

use super::{Layout, NavItem};
use crate::content::Page;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FieldErrors, VOLUNTEER_AVAILABILITY, VOLUNTEER_ROLES, VolunteerForm};
use crate::state::AppState;

/// Application form shown below the volunteer page body.
#[derive(Debug, Clone)]
pub struct VolunteerSection {
    pub form: VolunteerForm,
    pub errors: FieldErrors,
    pub roles: &'static [(&'static str, &'static str)],
    pub availability: &'static [(&'static str, &'static str)],
}

impl VolunteerSection {
    #[must_use]
    pub fn new(form: VolunteerForm, errors: FieldErrors) -> Self {
        Self {
            form,
            errors,
            roles: &VOLUNTEER_ROLES,
            availability: &VOLUNTEER_AVAILABILITY,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub page: Page,
    pub volunteer: Option<VolunteerSection>,
}

/// GET handler rendering the page whose slug matches the nav entry.
pub fn page(nav: NavItem) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>, session: Session| async move {
        let volunteer = (nav == NavItem::Volunteer)
            .then(|| VolunteerSection::new(VolunteerForm::default(), FieldErrors::new()));
        render(&state, &session, nav, volunteer).await
    })
}

#[tracing::instrument(skip(state, session, volunteer), fields(slug = nav.key()))]
pub(crate) async fn render(
    state: &AppState,
    session: &Session,
    nav: NavItem,
    volunteer: Option<VolunteerSection>,
) -> Result<ContentPageTemplate> {
    let slug = nav.key();
    let page = state
        .content()
        .page(slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        layout: Layout::load(state, session, page.meta.title.clone(), nav).await?,
        page,
        volunteer,
    })
}
