use crate::error::SlipError;
use serde::{Deserialize, Serialize};

/// Width of the middle segment of a postal account number.
const MIDDLE_SEGMENT_WIDTH: usize = 6;

/// What kind of account a company bank account is. Only `Bvr` accounts can receive BVR payments.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Bvr,
    Iban,
    Other,
}

serde_plain::derive_display_from_serialize!(AccountKind);
serde_plain::derive_fromstr_from_deserialize!(AccountKind);

/// A bank account of the company, identified by its postal account number, e.g. `01-145-6`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BankAccount {
    number: String,
    #[serde(default)]
    kind: AccountKind,
}

impl BankAccount {
    pub fn new(number: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            number: number.into(),
            kind,
        }
    }

    /// Shorthand for a BVR postal account.
    pub fn bvr(number: impl Into<String>) -> Self {
        Self::new(number, AccountKind::Bvr)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Splits the account number into its three `-` separated segments.
    ///
    /// # Errors
    /// - `SlipError::InvalidAccount` if there are not exactly three non-empty numeric segments.
    pub fn components(&self) -> Result<[&str; 3], SlipError> {
        let segments: Vec<&str> = self.number.trim().split('-').collect();
        match segments.as_slice() {
            [a, b, c] if [a, b, c].iter().all(|s| is_numeric(s)) => Ok([*a, *b, *c]),
            _ => Err(SlipError::invalid_account(&self.number)),
        }
    }

    /// The bank identifier used in scan lines: the three segments concatenated with the middle
    /// one filled up to six digits with trailing zeros. `01-145-6` gives `011450006`.
    pub fn bank_identifier(&self) -> Result<String, SlipError> {
        let [prefix, middle, check] = self.components()?;
        Ok(format!(
            "{prefix}{middle:0<width$}{check}",
            width = MIDDLE_SEGMENT_WIDTH
        ))
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Returns the first account of kind `Bvr`, which is the one printed on every slip.
pub fn company_bvr_account(accounts: &[BankAccount]) -> Result<&BankAccount, SlipError> {
    accounts
        .iter()
        .find(|a| a.kind() == AccountKind::Bvr)
        .ok_or(SlipError::NoBvrAccount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_identifier() {
        let account = BankAccount::bvr("01-145-6");
        assert_eq!(account.bank_identifier().unwrap(), "011450006");
    }

    #[test]
    fn test_bank_identifier_fills_middle_on_the_right() {
        assert_eq!(
            BankAccount::bvr("30-7-2").bank_identifier().unwrap(),
            "307000002"
        );
        assert_ne!(
            BankAccount::bvr("01-145-6").bank_identifier().unwrap(),
            "010001456"
        );
    }

    #[test]
    fn test_bank_identifier_full_width_middle() {
        let account = BankAccount::bvr("17-312562-9");
        assert_eq!(account.bank_identifier().unwrap(), "173125629");
    }

    #[test]
    fn test_two_segments_is_invalid() {
        let account = BankAccount::bvr("01-145");
        assert_eq!(
            account.bank_identifier().unwrap_err(),
            SlipError::InvalidAccount {
                account: "01-145".into()
            }
        );
    }

    #[test]
    fn test_four_segments_is_invalid() {
        let account = BankAccount::bvr("01-145-6-7");
        assert!(matches!(
            account.components(),
            Err(SlipError::InvalidAccount { .. })
        ));
    }

    #[test]
    fn test_non_numeric_segment_is_invalid() {
        assert!(BankAccount::bvr("01-ab-6").components().is_err());
        assert!(BankAccount::bvr("01--6").components().is_err());
    }

    #[test]
    fn test_company_bvr_account_picks_first_bvr() {
        let accounts = vec![
            BankAccount::new("CH93 0076 2011 6238 5295 7", AccountKind::Iban),
            BankAccount::bvr("01-145-6"),
            BankAccount::bvr("17-312562-9"),
        ];
        let account = company_bvr_account(&accounts).unwrap();
        assert_eq!(account.number(), "01-145-6");
    }

    #[test]
    fn test_company_bvr_account_missing() {
        let accounts = vec![BankAccount::new("CH93", AccountKind::Iban)];
        assert_eq!(
            company_bvr_account(&accounts).unwrap_err(),
            SlipError::NoBvrAccount
        );
    }

    #[test]
    fn test_kind_from_json() {
        let account: BankAccount = serde_json::from_str(r#"{"number": "01-145-6"}"#).unwrap();
        assert_eq!(account.kind(), AccountKind::Bvr);
        let account: BankAccount =
            serde_json::from_str(r#"{"number": "x", "kind": "iban"}"#).unwrap();
        assert_eq!(account.kind().to_string(), "iban");
    }
}
