use crate::error::{AppError, AppResult};

/// Reject empty required string fields with a uniform message
pub fn validate_required(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
