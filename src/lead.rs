//! Installer quote requests
//!
//! Submission is simulated: requests are validated and acknowledged locally,
//! nothing leaves the process. Independent of the estimate engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Installers every accepted request is matched with
pub const INSTALLERS_MATCHED: u32 = 3;

const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadError {
    #[error("zip code must be digits only, got '{0}'")]
    InvalidZip(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("phone number needs at least 10 digits, got '{0}'")]
    InvalidPhone(String),
}

/// Monthly bill bands offered by the quote form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BillBand {
    #[serde(rename = "100-150")]
    From100To150,
    #[default]
    #[serde(rename = "151-200")]
    From151To200,
    #[serde(rename = "201-300")]
    From201To300,
    #[serde(rename = "300+")]
    Over300,
}

impl BillBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillBand::From100To150 => "$100 - $150",
            BillBand::From151To200 => "$151 - $200",
            BillBand::From201To300 => "$201 - $300",
            BillBand::Over300 => "$300+",
        }
    }

    /// Band a monthly bill falls into (bills under $100 use the lowest band)
    pub fn from_bill(monthly_bill: f64) -> Self {
        if monthly_bill <= 150.0 {
            BillBand::From100To150
        } else if monthly_bill <= 200.0 {
            BillBand::From151To200
        } else if monthly_bill <= 300.0 {
            BillBand::From201To300
        } else {
            BillBand::Over300
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoofShade {
    #[default]
    NoShade,
    SomeShade,
}

/// Contact details collected by the two-step quote form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub zip: String,
    pub monthly_bill_band: BillBand,
    pub shade: RoofShade,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<(), LeadError> {
        let zip = self.zip.trim();
        if zip.is_empty() || !zip.chars().all(|c| c.is_ascii_digit()) {
            return Err(LeadError::InvalidZip(self.zip.clone()));
        }
        if self.first_name.trim().is_empty() {
            return Err(LeadError::MissingField("first name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(LeadError::MissingField("last name"));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(LeadError::InvalidEmail(self.email.clone()));
        }
        if self.phone.chars().filter(|c| c.is_ascii_digit()).count() < MIN_PHONE_DIGITS {
            return Err(LeadError::InvalidPhone(self.phone.clone()));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain.split('.').count() >= 2
                && domain.split('.').all(|label| !label.is_empty())
        }
        _ => false,
    }
}

/// Acknowledgement returned for an accepted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfirmation {
    pub reference: String,
    pub state_code: String,
    pub installers_matched: u32,
    pub submitted_at: DateTime<Utc>,
}

impl QuoteConfirmation {
    pub fn message(&self) -> String {
        format!(
            "We have matched you with {} top-rated installers in {}. \
             They will reach out to you shortly with your custom savings report.",
            self.installers_matched, self.state_code
        )
    }
}

/// Validate and acknowledge a quote request without contacting anyone
pub fn submit_simulated(
    request: &QuoteRequest,
    state_code: &str,
) -> Result<QuoteConfirmation, LeadError> {
    submit_simulated_at(request, state_code, Utc::now())
}

/// As [`submit_simulated`], with an explicit submission time
pub fn submit_simulated_at(
    request: &QuoteRequest,
    state_code: &str,
    submitted_at: DateTime<Utc>,
) -> Result<QuoteConfirmation, LeadError> {
    request.validate()?;

    let reference = format!(
        "Q-{}-{}-{}",
        state_code,
        request.zip.trim(),
        submitted_at.format("%Y%m%d%H%M%S")
    );
    log::info!("Simulated quote request {} accepted", reference);

    Ok(QuoteConfirmation {
        reference,
        state_code: state_code.to_string(),
        installers_matched: INSTALLERS_MATCHED,
        submitted_at,
    })
}
