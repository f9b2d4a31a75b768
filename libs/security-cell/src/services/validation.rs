// =====================================================================================
// VALIDATION SERVICE - INPUT VALIDATION
// =====================================================================================

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::models::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_EMAIL_LOCAL_PART: usize = 64;

/// Profile fields the client may leave at their placeholder value.
pub const NOT_SELECTED: &str = "Not Selected";

pub struct ValidationService {
    name_pattern: Regex,
    email_pattern: Regex,
    address_pattern: Regex,
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationService {
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(r"^[A-Za-z]+(?: [A-Za-z]+)*$").unwrap(),
            email_pattern: Regex::new(
                r"^[a-zA-Z0-9]+(?:[._%+-]?[a-zA-Z0-9]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$",
            )
            .unwrap(),
            address_pattern: Regex::new(r"^[a-zA-Z0-9#][a-zA-Z0-9 ,./#()-]*$").unwrap(),
        }
    }

    /// Letters separated by single spaces, 3 to 50 characters.
    pub fn validate_name(&self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::new("name", "Name is required"));
        }
        if name.trim() != name {
            return Err(ValidationError::new(
                "name",
                "Name should not contain leading or trailing spaces",
            ));
        }
        if !self.name_pattern.is_match(name) {
            return Err(ValidationError::new(
                "name",
                "Name may only contain letters separated by single spaces",
            ));
        }
        let length = name.chars().count();
        if !(3..=50).contains(&length) {
            return Err(ValidationError::new("name", "Name must be between 3 and 50 characters"));
        }
        Ok(())
    }

    /// Returns the normalized (lowercased) address.
    pub fn validate_email(&self, email: &str) -> Result<String, ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::new("email", "Email is required"));
        }
        if email.chars().any(char::is_whitespace) {
            return Err(ValidationError::new("email", "Email cannot contain any spaces"));
        }
        if email.len() > MAX_EMAIL_LENGTH {
            return Err(ValidationError::new("email", "Email is too long"));
        }
        let local_part = email.split('@').next().unwrap_or_default();
        if local_part.len() > MAX_EMAIL_LOCAL_PART {
            return Err(ValidationError::new("email", "Local part of email is too long"));
        }
        if !self.email_pattern.is_match(email) {
            debug!("Rejected email format");
            return Err(ValidationError::new("email", "Please enter a valid email"));
        }
        Ok(email.to_lowercase())
    }

    /// Exactly 10 digits once separators are stripped, not all zeros and not a
    /// single repeated digit. Returns the digits.
    pub fn validate_phone(&self, phone: &str) -> Result<String, ValidationError> {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != 10 {
            return Err(ValidationError::new("phone", "Phone number must be exactly 10 digits"));
        }
        if digits.chars().all(|c| c == '0') {
            return Err(ValidationError::new("phone", "Phone number cannot be all zeros"));
        }
        if has_run(&digits, 10) {
            return Err(ValidationError::new("phone", "Phone number cannot be all same digits"));
        }
        Ok(digits)
    }

    /// `required` is true for the first address line. An empty optional line
    /// is accepted as-is.
    pub fn validate_address_line(&self, line: &str, required: bool) -> Result<(), ValidationError> {
        if line.is_empty() {
            return if required {
                Err(ValidationError::new("address", "Address Line 1 is required"))
            } else {
                Ok(())
            };
        }
        if line.trim() != line {
            return Err(ValidationError::new(
                "address",
                "Address cannot start or end with spaces",
            ));
        }
        if line.contains("  ") {
            return Err(ValidationError::new(
                "address",
                "Address should not contain multiple consecutive spaces",
            ));
        }
        let length = line.chars().count();
        if !(5..=100).contains(&length) {
            return Err(ValidationError::new(
                "address",
                "Address must be between 5 and 100 characters",
            ));
        }
        if !self.address_pattern.is_match(line) {
            return Err(ValidationError::new(
                "address",
                "Address can only contain letters, numbers, spaces and , . - / # ( )",
            ));
        }
        if has_run(line, 5) {
            return Err(ValidationError::new(
                "address",
                "Address contains too many repeated characters",
            ));
        }
        Ok(())
    }

    /// Patient addresses follow the same rules but must open with a letter
    /// or `#`.
    pub fn validate_patient_address_line(
        &self,
        line: &str,
        required: bool,
    ) -> Result<(), ValidationError> {
        if line.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ValidationError::new(
                "address",
                "Address must start with a letter or #",
            ));
        }
        self.validate_address_line(line, required)
    }

    /// `YYYY-MM-DD`, in the past and at most 100 years ago. The placeholder
    /// value is accepted.
    pub fn validate_dob(&self, dob: &str, today: NaiveDate) -> Result<(), ValidationError> {
        if dob == NOT_SELECTED {
            return Ok(());
        }
        let date = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
            .map_err(|_| ValidationError::new("dob", "Date of birth must be YYYY-MM-DD"))?;

        if date >= today {
            return Err(ValidationError::new("dob", "Date of birth must be in the past"));
        }

        let mut age = today.year() - date.year();
        if (today.month(), today.day()) < (date.month(), date.day()) {
            age -= 1;
        }
        if age > 100 {
            return Err(ValidationError::new("dob", "Age cannot be more than 100 years"));
        }
        Ok(())
    }

    pub fn validate_gender(&self, gender: &str) -> Result<(), ValidationError> {
        match gender {
            "Male" | "Female" | "Other" | NOT_SELECTED => Ok(()),
            _ => Err(ValidationError::new("gender", "Gender must be Male, Female or Other")),
        }
    }

    pub fn validate_fees(&self, fees: f64) -> Result<(), ValidationError> {
        if !fees.is_finite() || fees <= 0.0 {
            return Err(ValidationError::new("fees", "Fee must be a positive amount"));
        }
        Ok(())
    }

    /// 10 to 100 words ending in `.`, `!` or `?`.
    pub fn validate_about(&self, about: &str) -> Result<(), ValidationError> {
        let trimmed = about.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("about", "About section is required"));
        }
        let words = trimmed.split_whitespace().count();
        if words < 10 {
            return Err(ValidationError::new("about", "Please write at least 10 words"));
        }
        if words > 100 {
            return Err(ValidationError::new("about", "Please keep it under 100 words"));
        }
        if !trimmed.ends_with(['.', '!', '?']) {
            return Err(ValidationError::new("about", "Please end with proper punctuation"));
        }
        Ok(())
    }

    pub fn validate_required(&self, field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, format!("{} is required", field)));
        }
        Ok(())
    }

    pub fn validate_image_url(&self, url: &str) -> Result<(), ValidationError> {
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(())
        } else {
            Err(ValidationError::new("image", "Image must be an http(s) URL"))
        }
    }
}

/// True if some character repeats `run` or more times in a row.
fn has_run(value: &str, run: usize) -> bool {
    let mut previous = None;
    let mut count = 0;
    for c in value.chars() {
        if Some(c) == previous {
            count += 1;
        } else {
            previous = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}
