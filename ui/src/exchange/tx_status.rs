//! The purchase status shown in the banner above the Buy button.

use strum::EnumIs;
use strum::IntoStaticStr;
use thiserror::Error;

pub const PROCESSING_MESSAGE: &str = "Processing your purchase...";
pub const FAILURE_MESSAGE: &str = "Transaction failed. Please try again.";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid status transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}

/// `idle -> loading -> success | error -> idle`. Nothing else is allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, EnumIs, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Idle,
    Loading { message: String },
    Success { message: String },
    Error { message: String },
}

impl TransactionStatus {
    /// A purchase was submitted.
    pub fn begin(&self) -> Result<Self, InvalidTransition> {
        match self {
            Self::Idle => Ok(Self::Loading {
                message: PROCESSING_MESSAGE.to_string(),
            }),
            other => Err(other.invalid("loading")),
        }
    }

    /// The wallet acknowledged the purchase of `token_amount` tokens.
    pub fn succeed(&self, token_amount: &str) -> Result<Self, InvalidTransition> {
        match self {
            Self::Loading { .. } => Ok(Self::Success {
                message: format!("Successfully purchased {token_amount} FanRating tokens!"),
            }),
            other => Err(other.invalid("success")),
        }
    }

    pub fn fail(&self) -> Result<Self, InvalidTransition> {
        match self {
            Self::Loading { .. } => Ok(Self::Error {
                message: FAILURE_MESSAGE.to_string(),
            }),
            other => Err(other.invalid("error")),
        }
    }

    /// The display timeout elapsed.
    pub fn expire(&self) -> Result<Self, InvalidTransition> {
        match self {
            Self::Success { .. } | Self::Error { .. } => Ok(Self::Idle),
            other => Err(other.invalid("idle")),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Loading { message } | Self::Success { message } | Self::Error { message } => {
                message
            }
        }
    }

    /// Banner heading.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading { .. } => "Processing",
            Self::Success { .. } => "Success",
            Self::Error { .. } => "Error",
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    fn invalid(&self, to: &'static str) -> InvalidTransition {
        InvalidTransition {
            from: self.name(),
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let loading = TransactionStatus::Idle.begin().unwrap();
        assert_eq!(loading.message(), PROCESSING_MESSAGE);

        let success = loading.succeed("2.000000").unwrap();
        assert_eq!(
            success.message(),
            "Successfully purchased 2.000000 FanRating tokens!"
        );
        assert_eq!(success.label(), "Success");

        assert!(success.expire().unwrap().is_idle());
    }

    #[test]
    fn failure_path() {
        let error = TransactionStatus::Idle.begin().unwrap().fail().unwrap();
        assert_eq!(error.message(), FAILURE_MESSAGE);
        assert!(error.expire().unwrap().is_idle());
    }

    #[test]
    fn rejects_everything_else() {
        let idle = TransactionStatus::Idle;
        let loading = idle.begin().unwrap();
        let success = loading.succeed("1").unwrap();
        let error = loading.fail().unwrap();

        assert_eq!(
            idle.succeed("1").unwrap_err(),
            InvalidTransition {
                from: "idle",
                to: "success"
            }
        );
        assert!(idle.fail().is_err());
        assert!(idle.expire().is_err());
        assert!(loading.begin().is_err());
        assert!(loading.expire().is_err());
        assert!(success.begin().is_err());
        assert!(success.fail().is_err());
        assert!(error.begin().is_err());
        assert!(error.succeed("1").is_err());
    }

    #[test]
    fn idle_has_no_message() {
        assert_eq!(TransactionStatus::Idle.message(), "");
        assert_eq!(TransactionStatus::Idle.label(), "");
    }
}
