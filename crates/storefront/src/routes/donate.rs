//! Donation route handlers.
//!
//! A valid donation waits out the simulated payment delay, then a
//! certificate is rendered and parked in the download store. The receipt
//! page (one redirect later) links to it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use takshashil_core::PaymentMethod;
use tower_sessions::Session;
use tracing::instrument;

use super::{Layout, NavItem};
use crate::documents::{CertificateDocument, CertificateId, render_certificate};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::{Donation, DonationForm, FieldErrors};
use crate::models::{DonationReceipt, Notice, push_notice, session_keys};
use crate::services::simulate_processing;
use crate::state::AppState;

/// Notice shown after a donation goes through.
pub const DONATION_SUCCESS: &str = "Donation successful! Thank you for your generosity.";

const PAGE_TITLE: &str = "Support Our Mission";

/// Donation form template.
#[derive(Template, WebTemplate)]
#[template(path = "donate/form.html")]
pub struct DonationFormTemplate {
    pub layout: Layout,
    pub form: DonationForm,
    pub errors: FieldErrors,
    pub payment_methods: [PaymentMethod; 3],
}

/// Receipt shown after donating.
#[derive(Template, WebTemplate)]
#[template(path = "donate/certificate.html")]
pub struct DonationReceiptTemplate {
    pub layout: Layout,
    pub receipt: DonationReceipt,
}

async fn form_page(
    state: &AppState,
    session: &Session,
    form: DonationForm,
    errors: FieldErrors,
) -> Result<DonationFormTemplate> {
    Ok(DonationFormTemplate {
        layout: Layout::load(state, session, PAGE_TITLE, NavItem::Donate).await?,
        form,
        errors,
        payment_methods: PaymentMethod::ALL,
    })
}

/// Display the donation form, or the receipt right after a donation.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    if let Some(receipt) = session
        .remove::<DonationReceipt>(session_keys::DONATION_RECEIPT)
        .await?
    {
        let page = DonationReceiptTemplate {
            layout: Layout::load(&state, &session, "Thank You", NavItem::Donate).await?,
            receipt,
        };
        return Ok(page.into_response());
    }

    let page = form_page(&state, &session, DonationForm::default(), FieldErrors::new()).await?;
    Ok(page.into_response())
}

/// Submit a donation.
///
/// Invalid input re-renders the form with field messages (422).
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DonationForm>,
) -> Result<Response> {
    let donation = match form.validate() {
        Ok(donation) => donation,
        Err(errors) => {
            let page = form_page(&state, &session, form, errors).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    simulate_processing(state.config().simulated_latency).await;

    let receipt = issue_certificate(&state, donation).await?;
    tracing::info!(
        certificate_id = %receipt.certificate_id,
        amount = receipt.amount.amount(),
        method = %receipt.payment_method,
        "Donation recorded"
    );
    add_breadcrumb(
        "donation",
        "Donation completed",
        &[("certificate_id", receipt.certificate_id.as_str())],
    );

    session
        .insert(session_keys::DONATION_RECEIPT, &receipt)
        .await?;
    push_notice(&session, Notice::success(DONATION_SUCCESS)).await?;
    Ok(Redirect::to("/donate").into_response())
}

/// Render the certificate and park it for download.
async fn issue_certificate(state: &AppState, donation: Donation) -> Result<DonationReceipt> {
    let org = &state.config().organization;
    let certificate_id = CertificateId::generate(&org.certificate_prefix, &mut rand::rng());
    let certificate = CertificateDocument {
        donor_name: donation.donor_name,
        email: donation.email,
        amount: donation.amount,
        payment_method: donation.payment_method,
        date: Utc::now().date_naive(),
        certificate_id,
    };
    let document = render_certificate(org, &certificate)?;
    let download_token = state.downloads().register(document).await;

    Ok(DonationReceipt {
        donor_name: certificate.donor_name,
        email: certificate.email.into_inner(),
        amount: certificate.amount,
        payment_method: certificate.payment_method,
        certificate_id: certificate.certificate_id.to_string(),
        download_token,
    })
}
