//! BVR/ISR scan line and reference formatting.
//!
//! The scan line is the machine readable line printed at the bottom right of an orange payment
//! slip: `042>` + 27 digit reference + `+ ` + bank identifier + `>`.

use crate::error::SlipError;
use crate::model::BankAccount;
use tracing::trace;

/// Document type code of a BVR in CHF without amount.
const SCAN_LINE_PREFIX: &str = "042>";
const REFERENCE_WIDTH: usize = 27;
const REFERENCE_SEPARATOR: &str = "+ ";
const SCAN_LINE_END: char = '>';
/// Printed references are grouped by five digits, the first group holds the two leftmost digits.
const SPACING: usize = 5;
const FIRST_GROUP: usize = 2;

/// Builds the scan line of a slip paying `reference` into `account`.
///
/// ```
/// # use bvr_slips::model::BankAccount;
/// # use bvr_slips::format_scan_line;
/// let line = format_scan_line(&BankAccount::bvr("01-145-6"), "123").unwrap();
/// assert_eq!(line, "042>000000000000000000000000123+ 011450006>");
/// ```
///
/// # Errors
/// - `SlipError::InvalidReference` if the reference (spaces removed) is empty, holds anything but
///   digits or is longer than 27 digits.
/// - `SlipError::InvalidAccount` if the account number is not made of three numeric segments.
pub fn format_scan_line(account: &BankAccount, reference: &str) -> Result<String, SlipError> {
    let digits = clean_reference(reference)?;
    let bank_identifier = account.bank_identifier()?;
    let line = format!(
        "{SCAN_LINE_PREFIX}{digits:0>REFERENCE_WIDTH$}{REFERENCE_SEPARATOR}{bank_identifier}{SCAN_LINE_END}"
    );
    trace!("Scan line for reference {reference}: {line}");
    Ok(line)
}

/// Formats a reference the way it is printed for humans: leading zeros removed and digits grouped
/// by five, e.g. `123456789012345` becomes `12 34567 89012 345`.
pub fn format_reference(reference: &str) -> Result<String, SlipError> {
    let digits = clean_reference(reference)?;
    let significant = digits.trim_start_matches('0');
    let mut out = String::with_capacity(significant.len() + significant.len() / SPACING + 1);
    for (ix, c) in significant.chars().enumerate() {
        if ix >= FIRST_GROUP && (ix - FIRST_GROUP) % SPACING == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    Ok(out)
}

/// Removes the spaces of a reference and checks that only digits are left.
fn clean_reference(reference: &str) -> Result<String, SlipError> {
    let digits: String = reference.chars().filter(|c| *c != ' ').collect();
    if digits.is_empty() {
        return Err(SlipError::invalid_reference(reference, "the reference is empty"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SlipError::invalid_reference(
            reference,
            "only digits and spaces are allowed",
        ));
    }
    if digits.len() > REFERENCE_WIDTH {
        return Err(SlipError::invalid_reference(
            reference,
            "a reference has at most 27 digits",
        ));
    }
    Ok(digits)
}
