// Client-side style checks and masks for the HTML forms

pub mod forms;
pub mod masks;

pub use forms::*;
pub use masks::*;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// A rejected form, carrying the message shown to the user
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub(crate) static EXPIRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Empty is allowed (the field is optional); anything else must parse as an absolute URL
pub fn validate_url(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || url::Url::parse(raw).is_ok()
}

/// CPF check digits; sequences of one repeated digit are rejected
pub fn validate_cpf_checksum(cpf: &str) -> bool {
    let digits: Vec<u32> = masks::only_digits(cpf).chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 {
            0
        } else {
            rest
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// `min` attribute of the expiry date input
pub fn min_expiry_date(today: NaiveDate) -> String {
    today.format("%Y-%m-%d").to_string()
}
