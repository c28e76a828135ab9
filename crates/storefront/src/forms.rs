//! Form payloads and their validation.
//!
//! Each form deserializes from `application/x-www-form-urlencoded` with every
//! field defaulted, so a missing field surfaces as a field error instead of
//! a 422 from the extractor. `validate` turns the raw strings into domain
//! values or a [`FieldErrors`] map that templates render next to each input.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use takshashil_core::{CheckoutDetails, Email, PaymentMethod, Price};

/// Ordered field-name to message map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Field names in the order they failed.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|(name, _)| *name)
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    fn email(&mut self, field: &'static str, value: &str) -> Option<Email> {
        if value.trim().is_empty() {
            self.add(field, "Email is required.");
            return None;
        }
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(_) => {
                self.add(field, "Please enter a valid email.");
                None
            }
        }
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Contact page form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A validated contact message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<ContactMessage, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("first_name", &self.first_name, "First name is required.");
        errors.required("last_name", &self.last_name, "Last name is required.");
        let email = errors.email("email", &self.email);
        errors.required("subject", &self.subject, "Subject is required.");
        errors.required("message", &self.message, "Message is required.");

        let message = email.map(|email| ContactMessage {
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            email,
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        });
        errors.into_result(message)
    }
}

// =============================================================================
// Volunteer
// =============================================================================

/// `(value, label)` pairs for the preferred-role select.
pub const VOLUNTEER_ROLES: [(&str, &str); 5] = [
    ("library", "Library Assistant"),
    ("mentor", "Subject Mentor"),
    ("event", "Event Organizer"),
    ("outreach", "Community Outreach"),
    ("other", "Other"),
];

/// `(value, label)` pairs for the availability select.
pub const VOLUNTEER_AVAILABILITY: [(&str, &str); 4] = [
    ("weekdays", "Weekdays"),
    ("weekends", "Weekends"),
    ("both", "Both Weekdays and Weekends"),
    ("flexible", "Flexible"),
];

fn option_label(options: &[(&str, &'static str)], value: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|(key, _)| *key == value.trim())
        .map(|&(_, label)| label)
}

/// Volunteer application form on the volunteer page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolunteerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub availability: String,
    pub message: String,
}

/// A validated volunteer application. Phone and message are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerApplication {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub role: &'static str,
    pub availability: &'static str,
    pub message: Option<String>,
}

impl VolunteerForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<VolunteerApplication, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("first_name", &self.first_name, "First name is required.");
        errors.required("last_name", &self.last_name, "Last name is required.");
        let email = errors.email("email", &self.email);

        let phone = self.phone.trim();
        if !phone.is_empty()
            && !phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '))
        {
            errors.add("phone", "Please enter a valid phone number.");
        }

        let role = option_label(&VOLUNTEER_ROLES, &self.role);
        if role.is_none() {
            errors.add("role", "Please select a preferred role.");
        }
        let availability = option_label(&VOLUNTEER_AVAILABILITY, &self.availability);
        if availability.is_none() {
            errors.add("availability", "Please select your availability.");
        }

        let non_empty = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        let application = email.zip(role).zip(availability).map(|((email, role), availability)| {
            VolunteerApplication {
                name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
                email,
                phone: non_empty(phone),
                role,
                availability,
                message: non_empty(&self.message),
            }
        });
        errors.into_result(application)
    }
}

// =============================================================================
// Donation
// =============================================================================

/// Minimum length of a donor name, in characters.
pub const MIN_DONOR_NAME_CHARS: usize = 2;

/// Donation form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DonationForm {
    pub name: String,
    pub email: String,
    pub amount: String,
    pub payment_method: String,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            amount: String::new(),
            payment_method: PaymentMethod::default().as_str().to_string(),
        }
    }
}

/// A validated donation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub donor_name: String,
    pub email: Email,
    pub amount: Price,
    pub payment_method: PaymentMethod,
}

impl DonationForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<Donation, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.chars().count() < MIN_DONOR_NAME_CHARS {
            errors.add("name", "Name must be at least 2 characters.");
        }

        let email = errors.email("email", &self.email);

        let amount = match self.amount.trim() {
            "" => {
                errors.add("amount", "Please enter a donation amount.");
                None
            }
            raw => match raw.parse::<u64>() {
                Ok(n) if n >= 1 => Some(Price::new(n)),
                _ => {
                    errors.add("amount", "Amount must be a whole number of at least 1.");
                    None
                }
            },
        };

        let payment_method = match self.payment_method.trim() {
            "" => Some(PaymentMethod::default()),
            raw => raw.parse::<PaymentMethod>().ok().or_else(|| {
                errors.add("payment_method", "Please select a payment method.");
                None
            }),
        };

        let donation = match (email, amount, payment_method) {
            (Some(email), Some(amount), Some(payment_method)) => Some(Donation {
                donor_name: name.to_string(),
                email,
                amount,
                payment_method,
            }),
            _ => None,
        };
        errors.into_result(donation)
    }
}

// =============================================================================
// Checkout
// =============================================================================

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Shop checkout form. Card number and CVV never reach logs.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub pin_code: String,
    #[serde(default = "empty_secret")]
    pub card_number: SecretString,
    pub expiry: String,
    #[serde(default = "empty_secret")]
    pub cvv: SecretString,
    /// Category filter to return to after submitting.
    pub category: Option<String>,
    /// Search query to return to after submitting.
    pub q: String,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            pin_code: String::new(),
            card_number: empty_secret(),
            expiry: String::new(),
            cvv: empty_secret(),
            category: None,
            q: String::new(),
        }
    }
}

impl std::fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("city", &self.city)
            .field("card_number", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CheckoutForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<CheckoutDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("first_name", &self.first_name, "First name is required.");
        errors.required("last_name", &self.last_name, "Last name is required.");
        let email = errors.email("email", &self.email);
        errors.required("address", &self.address, "Address is required.");
        errors.required("city", &self.city, "City is required.");
        errors.required("pin_code", &self.pin_code, "PIN code is required.");
        errors.required(
            "card_number",
            self.card_number.expose_secret(),
            "Card number is required.",
        );
        errors.required("expiry", &self.expiry, "Expiry date is required.");
        errors.required("cvv", self.cvv.expose_secret(), "CVV is required.");

        let details = email.map(|email| CheckoutDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            pin_code: self.pin_code.trim().to_string(),
            card_last4: last_four(self.card_number.expose_secret()),
        });
        errors.into_result(details)
    }
}

/// Last four non-space characters of a card number.
fn last_four(card_number: &str) -> String {
    let compact: Vec<char> = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    let start = compact.len().saturating_sub(4);
    compact.get(start..).unwrap_or_default().iter().collect()
}
