//! The text printed in the communication field of a payment slip, and the phrase describing the
//! payment documents that come with a sponsorship letter.

use crate::grouper::{next_month, MonthRange};
use crate::model::{Amount, Contract, ContractState, PaymentTerm};
use chrono::{Locale, NaiveDate};
use tracing::trace;

const LINE_BREAK: &str = "<br/>";
const MONTH_YEAR: &str = "%B %Y";
const YEARLY: u32 = 12;

/// Turns a month into the label printed on slips. Injected so that slips can be printed in the
/// donor's language.
pub trait MonthLabels {
    fn month_year(&self, month: NaiveDate) -> String;
}

/// English month names, e.g. `January 2024`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishMonths;

impl MonthLabels for EnglishMonths {
    fn month_year(&self, month: NaiveDate) -> String {
        month.format(MONTH_YEAR).to_string()
    }
}

/// Month names of any locale known to chrono, e.g. `fr_CH` gives `janvier 2024`.
#[derive(Debug, Clone, Copy)]
pub struct LocalizedMonths(Locale);

impl LocalizedMonths {
    pub fn new(locale: Locale) -> Self {
        Self(locale)
    }
}

impl MonthLabels for LocalizedMonths {
    fn month_year(&self, month: NaiveDate) -> String {
        month.format_localized(MONTH_YEAR, self.0).to_string()
    }
}

/// What is due during a range of months.
#[derive(Debug, Default)]
struct Due<'a> {
    /// The most contracts due in a single month of the range.
    count: usize,
    /// What all the months of the range add up to.
    amount: Amount,
    /// The contracts due in the last month of the range.
    last: Vec<&'a Contract>,
}

/// Walks `frequency` months from the start of `range`, or the whole range when it is longer.
fn due_in_range<'a>(range: &MonthRange, frequency: u32, contracts: &'a [Contract]) -> Due<'a> {
    let walked = range.months().count().max(frequency.max(1) as usize);
    let months = std::iter::successors(Some(range.start), |m| next_month(*m)).take(walked);
    months.fold(Due::default(), |mut due, month| {
        let valid: Vec<&Contract> = contracts.iter().filter(|c| c.is_due_in(month)).collect();
        due.count = due.count.max(valid.len());
        due.amount = due.amount + valid.iter().map(|c| c.total_amount).sum::<Amount>();
        due.last = valid;
        due
    })
}

/// Builds the communication of the slip paying `range`, e.g.
/// `ISR Monthly CHF 42<br/>Amina (UG1230034)<br/>January 2024`.
///
/// Each of the `frequency` months starting with `range.start` adds the amount of every contract
/// due in that month, so a contract unpaid over the whole period is counted once per month. A
/// standing order slip covers a single month but still charges a full period. A range longer than
/// `frequency` is walked to its end. `matching_contracts` must already be reduced to the contracts
/// printed on this slip.
pub fn build_text(
    range: &MonthRange,
    matching_contracts: &[Contract],
    frequency: u32,
    payment_term: &PaymentTerm,
    frequency_label: &str,
    labels: &dyn MonthLabels,
) -> String {
    let due = due_in_range(range, frequency, matching_contracts);
    trace!(
        "Range {range} with frequency {frequency}: {} contracts due for {}",
        due.count,
        due.amount.value()
    );

    let standing_order = payment_term.is_standing_order();
    let payment_type = if standing_order {
        String::from("ISR for standing order")
    } else {
        format!("ISR {frequency_label}")
    };

    let subject = if due.count > 1 {
        format!("for {} sponsorships", due.count)
    } else {
        due.last
            .first()
            .copied()
            .or_else(|| matching_contracts.first())
            .map(subject_of)
            .unwrap_or_default()
    };

    let date = if standing_order {
        String::new()
    } else if range.is_single_month() {
        labels.month_year(range.start)
    } else {
        format!(
            "{} - {}",
            labels.month_year(range.start),
            labels.month_year(range.end)
        )
    };

    format!(
        "{payment_type} {}{LINE_BREAK}{subject}{LINE_BREAK}{date}",
        due.amount
    )
}

/// The child's name followed by its reference, or nothing for a contract without child.
fn subject_of(contract: &Contract) -> String {
    match &contract.child {
        Some(child) if child.reference.is_empty() => child.name.clone(),
        Some(child) => format!("{} ({})", child.name, child.reference),
        None => String::new(),
    }
}

/// Describes the payment documents sent along with a sponsorship letter.
pub fn attachment_phrase(contract: &Contract) -> &'static str {
    let term = &contract.payment_term;
    if term.name() == "Permanent Order" {
        "1 payment slip to set up a standing order (monthly payment of the sponsorship)"
    } else if term.is_direct_debit() {
        if contract.state == ContractState::Mandate {
            "1 LSV or Direct Debit authorization form to fill in if you don't already have done it!"
        } else {
            "We will continue to withdraw the amount for the sponsorship from your account."
        }
    } else if contract.billing_frequency_months == YEARLY {
        "1 payment slip for the annual sponsorship payment"
    } else {
        "payment slips for the sponsorship payment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Child;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sponsorship(amount: i64, open: NaiveDate, child: (&str, &str)) -> Contract {
        Contract::new(Amount::new(Decimal::from(amount)))
            .with_first_open_invoice(open)
            .with_child(Child::new(child.0, child.1))
    }

    #[test]
    fn test_single_sponsorship_single_month() {
        let contracts = vec![sponsorship(42, date(2024, 1, 1), ("UG1230034", "Amina"))];
        let text = build_text(
            &MonthRange::single(date(2024, 1, 1)),
            &contracts,
            1,
            &PaymentTerm::new("BVR"),
            "Monthly",
            &EnglishMonths,
        );
        assert_eq!(text, "ISR Monthly CHF 42<br/>Amina (UG1230034)<br/>January 2024");
    }

    #[test]
    fn test_amount_is_summed_per_month() {
        let contracts = vec![sponsorship(42, date(2024, 1, 1), ("UG1230034", "Amina"))];
        let range = MonthRange::new(date(2024, 1, 1), date(2024, 3, 1));
        let text = build_text(
            &range,
            &contracts,
            3,
            &PaymentTerm::new("BVR"),
            "Quarterly",
            &EnglishMonths,
        );
        assert_eq!(
            text,
            "ISR Quarterly CHF 126<br/>Amina (UG1230034)<br/>January 2024 - March 2024"
        );
    }

    #[test]
    fn test_several_sponsorships() {
        let contracts = vec![
            sponsorship(42, date(2024, 1, 1), ("UG1230034", "Amina")),
            sponsorship(42, date(2024, 2, 1), ("PE8830121", "Luis")),
            // Not due during the range
            sponsorship(42, date(2024, 6, 1), ("IN5520077", "Priya")),
        ];
        let range = MonthRange::new(date(2024, 1, 1), date(2024, 2, 1));
        let text = build_text(
            &range,
            &contracts,
            2,
            &PaymentTerm::new("BVR"),
            "Bimonthly",
            &EnglishMonths,
        );
        // January: 1 contract, February: 2 contracts
        assert_eq!(
            text,
            "ISR Bimonthly CHF 126<br/>for 2 sponsorships<br/>January 2024 - February 2024"
        );
    }

    #[test]
    fn test_next_invoice_date_used_without_open_invoice() {
        let contracts = vec![Contract::new(Amount::new(Decimal::from(50)))
            .with_next_invoice_date(date(2024, 2, 1))
            .with_child(Child::new("UG1230034", "Amina"))];
        let range = MonthRange::new(date(2024, 1, 1), date(2024, 2, 1));
        let text = build_text(
            &range,
            &contracts,
            2,
            &PaymentTerm::new("BVR"),
            "Bimonthly",
            &EnglishMonths,
        );
        assert!(text.starts_with("ISR Bimonthly CHF 50<br/>"));
    }

    #[test]
    fn test_standing_order_has_no_date() {
        let contracts = vec![sponsorship(42, date(2024, 1, 1), ("UG1230034", "Amina"))];
        let text = build_text(
            &MonthRange::single(date(2024, 1, 1)),
            &contracts,
            1,
            &PaymentTerm::new("Permanent Order"),
            "Monthly",
            &EnglishMonths,
        );
        assert_eq!(
            text,
            "ISR for standing order CHF 42<br/>Amina (UG1230034)<br/>"
        );
    }

    #[test]
    fn test_standing_order_charges_a_full_period() {
        let contracts = vec![sponsorship(42, date(2024, 1, 1), ("UG1230034", "Amina"))];
        let text = build_text(
            &MonthRange::single(date(2024, 1, 1)),
            &contracts,
            3,
            &PaymentTerm::new("Permanent Order"),
            "Quarterly",
            &EnglishMonths,
        );
        assert_eq!(
            text,
            "ISR for standing order CHF 126<br/>Amina (UG1230034)<br/>"
        );
    }

    #[test]
    fn test_short_final_run_charges_a_full_period() {
        let contracts = vec![sponsorship(42, date(2024, 1, 1), ("UG1230034", "Amina"))];
        let text = build_text(
            &MonthRange::single(date(2024, 7, 1)),
            &contracts,
            3,
            &PaymentTerm::new("BVR"),
            "Quarterly",
            &EnglishMonths,
        );
        assert_eq!(
            text,
            "ISR Quarterly CHF 126<br/>Amina (UG1230034)<br/>July 2024"
        );
    }

    #[test]
    fn test_localized_months() {
        let labels = LocalizedMonths::new(Locale::fr_CH);
        assert_eq!(labels.month_year(date(2024, 3, 1)), "mars 2024");
        let labels = LocalizedMonths::new(Locale::de_CH);
        assert_eq!(labels.month_year(date(2024, 3, 1)), "März 2024");
    }

    #[test]
    fn test_attachment_phrase() {
        let mut contract = Contract::new(Amount::ZERO);
        contract.payment_term = PaymentTerm::new("Permanent Order");
        assert!(attachment_phrase(&contract).contains("standing order"));

        contract.payment_term = PaymentTerm::new("LSV");
        contract.state = ContractState::Mandate;
        assert!(attachment_phrase(&contract).contains("authorization form"));
        contract.state = ContractState::Active;
        assert!(attachment_phrase(&contract).contains("continue to withdraw"));

        contract.payment_term = PaymentTerm::new("BVR");
        contract.billing_frequency_months = 12;
        assert_eq!(
            attachment_phrase(&contract),
            "1 payment slip for the annual sponsorship payment"
        );
        contract.billing_frequency_months = 1;
        assert_eq!(
            attachment_phrase(&contract),
            "payment slips for the sponsorship payment"
        );
    }
}
