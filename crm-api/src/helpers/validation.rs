use anyhow::{bail, Result};
use regex::Regex;
use shared_types::{ContactInput, DealInput, InteractionInput, TaskInput};
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

pub fn validate_contact(input: &ContactInput) -> Result<()> {
    validate_required("Name", &input.name)?;
    validate_required("Email", &input.email)?;
    validate_email(&input.email)?;

    if let Some(day) = input.payment_day {
        validate_payment_day(day)?;
    }

    Ok(())
}

pub fn validate_interaction(input: &InteractionInput) -> Result<()> {
    validate_required("Contact", &input.contact_id)?;
    validate_required("Type", &input.kind)?;
    Ok(())
}

pub fn validate_task(input: &TaskInput) -> Result<()> {
    validate_required("Title", &input.title)?;
    validate_optional_reference(input.contact_id.as_deref())?;
    Ok(())
}

pub fn validate_deal(input: &DealInput) -> Result<()> {
    validate_required("Name", &input.name)?;
    validate_value(input.value)?;
    validate_optional_reference(input.contact_id.as_deref())?;
    Ok(())
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} is required", field);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if !email_regex().is_match(email) {
        bail!("Email address is not valid");
    }
    Ok(())
}

fn validate_payment_day(day: u8) -> Result<()> {
    if !(1..=31).contains(&day) {
        bail!("Payment day must be between 1 and 31");
    }
    Ok(())
}

fn validate_value(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("Value must be a non-negative number");
    }
    Ok(())
}

fn validate_optional_reference(contact_id: Option<&str>) -> Result<()> {
    if matches!(contact_id, Some(id) if id.trim().is_empty()) {
        bail!("Contact reference cannot be blank; omit it for no contact");
    }
    Ok(())
}
