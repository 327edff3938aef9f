pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the payment slip computations. They indicate malformed billing data and are
/// never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlipError {
    #[error("invalid BVR reference '{reference}': {reason}")]
    InvalidReference {
        reference: String,
        reason: &'static str,
    },

    #[error("invalid bank account '{account}': expected three '-' separated numeric segments")]
    InvalidAccount { account: String },

    #[error("no open invoice found")]
    NoOpenInvoice,

    #[error("the company has no BVR bank account")]
    NoBvrAccount,
}

impl SlipError {
    pub(crate) fn invalid_reference(reference: impl Into<String>, reason: &'static str) -> Self {
        SlipError::InvalidReference {
            reference: reference.into(),
            reason,
        }
    }

    pub(crate) fn invalid_account(account: impl Into<String>) -> Self {
        SlipError::InvalidAccount {
            account: account.into(),
        }
    }
}
