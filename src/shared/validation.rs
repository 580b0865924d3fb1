use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

use crate::shared::constants::{
    INSPECTION_RESULTS, SDR_STATUSES, SMS_LIKELIHOODS, SMS_SEVERITIES, SMS_STATUSES,
    STOCK_STATUSES,
};

lazy_static! {
    /// Verification PIN: exactly six digits, leading zeros allowed
    pub static ref PIN_REGEX: Regex = Regex::new(r"^[0-9]{6}$").unwrap();

    /// Aircraft registration mark (nationality prefix, optional hyphen, suffix)
    /// - Valid: "PK-GMA", "N12345", "9M-MXA", "G-EUPT"
    /// - Invalid: "pk-gma", "-GMA", "PK--GMA", "PK GMA"
    pub static ref AIRCRAFT_REGISTRATION_REGEX: Regex =
        Regex::new(r"^[A-Z0-9]{1,3}-?[A-Z0-9]{1,6}$").unwrap();

    /// Airport identifier: 3-letter IATA or 4-character ICAO code in uppercase
    pub static ref AIRPORT_CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9]{3,4}$").unwrap();

    /// ATA chapter, optionally with section ("32", "32-41", "05-10-00")
    pub static ref ATA_CHAPTER_REGEX: Regex =
        Regex::new(r"^[0-9]{2}(?:-[0-9]{2}){0,2}$").unwrap();
}

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(format!("must be one of: {}", allowed.join(", "))));
    Err(error)
}

pub fn validate_stock_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, STOCK_STATUSES, "stock_status")
}

pub fn validate_inspection_result(value: &str) -> Result<(), ValidationError> {
    one_of(value, INSPECTION_RESULTS, "inspection_result")
}

pub fn validate_sdr_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, SDR_STATUSES, "sdr_status")
}

pub fn validate_sms_severity(value: &str) -> Result<(), ValidationError> {
    one_of(value, SMS_SEVERITIES, "sms_severity")
}

pub fn validate_sms_likelihood(value: &str) -> Result<(), ValidationError> {
    one_of(value, SMS_LIKELIHOODS, "sms_likelihood")
}

pub fn validate_sms_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, SMS_STATUSES, "sms_status")
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some(Cow::Borrowed("must not be negative"));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_sets() {
        assert!(validate_stock_status("serviceable").is_ok());
        assert!(validate_stock_status("Serviceable").is_err());
        assert!(validate_inspection_result("rejected").is_ok());
        assert!(validate_sms_severity("catastrophic").is_ok());
        assert!(validate_sms_severity("meh").is_err());

        let err = validate_sdr_status("archived").unwrap_err();
        assert_eq!(err.code, "sdr_status");
    }

    #[test]
    fn test_non_negative() {
        assert!(validate_non_negative(&Decimal::new(125, 1)).is_ok());
        assert!(validate_non_negative(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative(&Decimal::new(-1, 1)).is_err());
    }

    #[test]
    fn test_pin_regex() {
        assert!(PIN_REGEX.is_match("012345"));
        assert!(PIN_REGEX.is_match("999999"));
        assert!(!PIN_REGEX.is_match("12345"));
        assert!(!PIN_REGEX.is_match("1234567"));
        assert!(!PIN_REGEX.is_match("12a456"));
    }

    #[test]
    fn test_aircraft_registration_regex() {
        assert!(AIRCRAFT_REGISTRATION_REGEX.is_match("PK-GMA"));
        assert!(AIRCRAFT_REGISTRATION_REGEX.is_match("N12345"));
        assert!(AIRCRAFT_REGISTRATION_REGEX.is_match("9M-MXA"));
        assert!(!AIRCRAFT_REGISTRATION_REGEX.is_match("pk-gma")); // lowercase
        assert!(!AIRCRAFT_REGISTRATION_REGEX.is_match("-GMA")); // starts with hyphen
        assert!(!AIRCRAFT_REGISTRATION_REGEX.is_match("PK--GMA")); // double hyphen
        assert!(!AIRCRAFT_REGISTRATION_REGEX.is_match("PK GMA")); // space
    }

    #[test]
    fn test_airport_and_ata_regex() {
        assert!(AIRPORT_CODE_REGEX.is_match("CGK"));
        assert!(AIRPORT_CODE_REGEX.is_match("WIII"));
        assert!(!AIRPORT_CODE_REGEX.is_match("cgk"));
        assert!(!AIRPORT_CODE_REGEX.is_match("WIIII"));

        assert!(ATA_CHAPTER_REGEX.is_match("32"));
        assert!(ATA_CHAPTER_REGEX.is_match("32-41"));
        assert!(ATA_CHAPTER_REGEX.is_match("05-10-00"));
        assert!(!ATA_CHAPTER_REGEX.is_match("3"));
        assert!(!ATA_CHAPTER_REGEX.is_match("32-"));
    }
}
