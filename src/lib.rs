//! Swiss BVR/ISR payment slips for sponsorship billing groups: scan lines, grouping of the
//! invoice months into slips and the communication printed on each slip.

pub mod args;
pub mod commands;
pub mod communication;
mod config;
mod error;
pub mod grouper;
pub mod model;
mod scan_line;
pub mod slips;
mod utils;


pub use communication::{
    attachment_phrase, build_text, EnglishMonths, LocalizedMonths, MonthLabels,
};
pub use config::{month_labels, Config};
pub use error::{Error, Result, SlipError};
pub use grouper::{first_unpaid_month, group_months, MonthRange};
pub use scan_line::{format_reference, format_scan_line};
pub use slips::{prepare_batch, prepare_group, BatchReport, PaymentSlip};
