use crate::error::{AirInvError, AirInvResult};
use regex::Regex;
use std::sync::OnceLock;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> AirInvResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(AirInvError::from(errors)),
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match error.code.as_ref() {
                "email" => "Invalid email format".to_string(),
                "length" => format!("Length validation failed for field '{}'", field),
                "range" => format!("Value out of range for field '{}'", field),
                "required" => format!("Field '{}' is required", field),
                _ => format!("Validation failed for field '{}': {}", field, error.code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(value))
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(
        &EMAIL,
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        email,
    )
}

/// Point SCCs have 8 digits, nonpoint and mobile SCCs 10.
pub fn is_valid_scc_format(scc: &str) -> bool {
    static SCC: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&SCC, r"^(\d{8}|\d{10})$", scc)
}

pub fn is_valid_naics_format(naics: &str) -> bool {
    static NAICS: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&NAICS, r"^\d{6}$", naics)
}

/// EIS facility ids are numeric, up to 20 digits.
pub fn is_valid_eis_program_id(id: &str) -> bool {
    static EIS: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&EIS, r"^\d{1,20}$", id)
}
