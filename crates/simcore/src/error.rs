use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SimError::InvalidParameter { name, value, reason }
    }
}

/// Fail with [`SimError::InvalidParameter`] unless `value` is finite and strictly positive.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, value, "must be a finite value greater than zero"))
    }
}

/// Fail with [`SimError::InvalidParameter`] unless `value` is finite and not negative.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, value, "must be a finite value of at least zero"))
    }
}
