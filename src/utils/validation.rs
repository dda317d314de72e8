use crate::utils::error::{HarnessError, Result};
use std::fmt::Display;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl Display, reason: impl Into<String>) -> HarnessError {
    HarnessError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| HarnessError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_blank(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be blank"));
    }
    Ok(())
}

/// Output file path: non-empty, no NUL bytes, not an existing directory.
pub fn validate_output_path(field_name: &str, path: &std::path::Path) -> Result<()> {
    let shown = path.display();
    if path.as_os_str().is_empty() {
        return Err(invalid(field_name, shown, "Path cannot be empty"));
    }
    if path.to_string_lossy().contains('\0') {
        return Err(invalid(field_name, shown, "Path contains null bytes"));
    }
    if path.is_dir() {
        return Err(invalid(field_name, shown, "Path is a directory"));
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + Display>(field_name: &str, value: T, min: T) -> Result<()> {
    if value < min {
        let reason = format!("Value must be at least {}", min);
        return Err(invalid(field_name, value, reason));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display>(field_name: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        let reason = format!("Value must be between {} and {}", min, max);
        return Err(invalid(field_name, value, reason));
    }
    Ok(())
}
