//! Visitor-facing forms and their validation rules.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::database::models::SubmissionKind;
use crate::error::{SiteError, SiteResult};

/// A form that can be stored as a submission and rendered into an email.
pub trait SubmissionForm: Serialize + DeserializeOwned + Send + Sync {
    const KIND: SubmissionKind;

    fn validate(&self) -> SiteResult<()>;

    fn subject(&self) -> String;

    /// Labeled values in display order. Optional fields that were left
    /// empty are omitted.
    fn fields(&self) -> Vec<(&'static str, String)>;

    fn job_listing_id(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub cargo_type: String,
    pub weight: Option<String>,
    pub notes: Option<String>,
}

impl SubmissionForm for BookingRequest {
    const KIND: SubmissionKind = SubmissionKind::Booking;

    fn validate(&self) -> SiteResult<()> {
        Checks::default()
            .required("name", &self.name)
            .email("email", &self.email)
            .required("phone", &self.phone)
            .required("pickup_address", &self.pickup_address)
            .required("delivery_address", &self.delivery_address)
            .required("pickup_date", &self.pickup_date)
            .required("cargo_type", &self.cargo_type)
            .finish()
    }

    fn subject(&self) -> String {
        format!("New booking request from {}", self.name.trim())
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
            ("Phone", self.phone.clone()),
        ];
        push_optional(&mut fields, "Company", &self.company);
        fields.extend([
            ("Pickup address", self.pickup_address.clone()),
            ("Delivery address", self.delivery_address.clone()),
            ("Pickup date", self.pickup_date.clone()),
            ("Cargo type", self.cargo_type.clone()),
        ]);
        push_optional(&mut fields, "Weight", &self.weight);
        push_optional(&mut fields, "Notes", &self.notes);
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactEnquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl SubmissionForm for ContactEnquiry {
    const KIND: SubmissionKind = SubmissionKind::Enquiry;

    fn validate(&self) -> SiteResult<()> {
        Checks::default()
            .required("name", &self.name)
            .email("email", &self.email)
            .required("message", &self.message)
            .finish()
    }

    fn subject(&self) -> String {
        match self.subject.as_deref().map(str::trim) {
            Some(subject) if !subject.is_empty() => format!("Enquiry: {}", subject),
            _ => format!("New enquiry from {}", self.name.trim()),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("Name", self.name.clone()), ("Email", self.email.clone())];
        push_optional(&mut fields, "Phone", &self.phone);
        push_optional(&mut fields, "Subject", &self.subject);
        fields.push(("Message", self.message.clone()));
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobApplication {
    pub job_listing_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cover_letter: String,
    pub resume_url: Option<String>,
}

impl SubmissionForm for JobApplication {
    const KIND: SubmissionKind = SubmissionKind::Application;

    fn validate(&self) -> SiteResult<()> {
        Checks::default()
            .required("job_listing_id", &self.job_listing_id)
            .required("name", &self.name)
            .email("email", &self.email)
            .required("cover_letter", &self.cover_letter)
            .finish()
    }

    fn subject(&self) -> String {
        format!("Job application from {}", self.name.trim())
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Job listing", self.job_listing_id.clone()),
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
        ];
        push_optional(&mut fields, "Phone", &self.phone);
        fields.push(("Cover letter", self.cover_letter.clone()));
        push_optional(&mut fields, "Resume", &self.resume_url);
        fields
    }

    fn job_listing_id(&self) -> Option<&str> {
        Some(self.job_listing_id.trim())
    }
}

fn push_optional(fields: &mut Vec<(&'static str, String)>, label: &'static str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
        fields.push((label, value.to_string()));
    }
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

/// Collects the names of every field that fails a check.
#[derive(Default)]
struct Checks {
    failed: Vec<&'static str>,
}

impl Checks {
    fn required(mut self, name: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.failed.push(name);
        }
        self
    }

    fn email(mut self, name: &'static str, value: &str) -> Self {
        if !is_valid_email(value) {
            self.failed.push(name);
        }
        self
    }

    fn finish(self) -> SiteResult<()> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(SiteError::missing_fields(&self.failed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> BookingRequest {
        BookingRequest {
            name: "Ava Tan".to_string(),
            email: "ava@example.com".to_string(),
            phone: "+65 5550 1234".to_string(),
            company: None,
            pickup_address: "12 Marina Blvd".to_string(),
            delivery_address: "8 Jurong Port Rd".to_string(),
            pickup_date: "2026-11-02".to_string(),
            cargo_type: "Pallets".to_string(),
            weight: Some("400 kg".to_string()),
            notes: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("ops@freight.co"));
        assert!(is_valid_email(" ops@freight.co "));
        assert!(!is_valid_email("ops@freight"));
        assert!(!is_valid_email("ops freight@x.co"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_booking_validation_lists_failures() {
        assert!(booking().validate().is_ok());

        let mut form = booking();
        form.email = "not-an-email".to_string();
        form.cargo_type = " ".to_string();
        let message = form.validate().unwrap_err().to_string();
        assert!(message.contains("email"));
        assert!(message.contains("cargo_type"));
        assert!(!message.contains("name"));
    }

    #[test]
    fn test_blank_optional_fields_are_omitted() {
        let labels: Vec<&str> = booking().fields().into_iter().map(|(l, _)| l).collect();
        assert!(labels.contains(&"Weight"));
        assert!(!labels.contains(&"Notes"));
        assert!(!labels.contains(&"Company"));
    }

    #[test]
    fn test_enquiry_subject() {
        let mut enquiry = ContactEnquiry {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            message: "Do you ship to Batam?".to_string(),
            ..Default::default()
        };
        assert_eq!(enquiry.subject(), "New enquiry from Lee");
        enquiry.subject = Some("Rates".to_string());
        assert_eq!(enquiry.subject(), "Enquiry: Rates");
    }

    #[test]
    fn test_application_requires_listing() {
        let application = JobApplication {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            cover_letter: "I drive forklifts.".to_string(),
            ..Default::default()
        };
        let err = application.validate().unwrap_err();
        assert!(err.to_string().contains("job_listing_id"));
    }
}
