//! Donation certificates.

use std::fmt;

use askama::Template;
use chrono::NaiveDate;
use rand::Rng;
use takshashil_core::{Email, PaymentMethod, Price};

use super::{Document, DocumentError, format_document_date};
use crate::config::OrganizationConfig;
use crate::filters;

/// Certificate identifier such as `TF-0042`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateId {
    prefix: String,
    number: u16,
}

impl CertificateId {
    /// Largest number a certificate ID can carry (four digits).
    pub const MAX_NUMBER: u16 = 9999;

    /// Draw a new ID with a uniformly random four-digit number.
    pub fn generate<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> Self {
        Self {
            prefix: prefix.to_string(),
            number: rng.random_range(0..=Self::MAX_NUMBER),
        }
    }

    #[must_use]
    pub const fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.prefix, self.number)
    }
}

/// Everything printed on a donation certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDocument {
    pub donor_name: String,
    pub email: Email,
    pub amount: Price,
    pub payment_method: PaymentMethod,
    pub date: NaiveDate,
    pub certificate_id: CertificateId,
}

#[derive(Template)]
#[template(path = "documents/certificate.html")]
struct CertificateTemplate<'a> {
    org: &'a OrganizationConfig,
    certificate: &'a CertificateDocument,
    date: String,
}

/// Render a certificate as a downloadable document.
///
/// # Errors
///
/// Returns `DocumentError::Render` if the template fails to render.
pub fn render_certificate(
    org: &OrganizationConfig,
    certificate: &CertificateDocument,
) -> Result<Document, DocumentError> {
    let body = CertificateTemplate {
        org,
        certificate,
        date: format_document_date(certificate.date),
    }
    .render()?;

    Ok(Document {
        filename: Document::filename_for(
            &org.name,
            "Donation Certificate",
            &certificate.donor_name,
        ),
        body,
    })
}
