//! These structs provide the CLI interface for the bvr CLI.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// bvr: prints Swiss BVR/ISR payment slip data for sponsorship billing groups.
///
/// Billing groups are read from JSON files exported by the ERP. For every group, bvr computes the
/// scan line of its reference, groups the requested months into slips according to the group's
/// billing frequency (leaving out paid months), and writes the communication printed on each slip.
///
/// Run `bvr init --bvr-account 01-145-6` once to create the configuration.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the bvr home directory and its configuration file.
    Init(InitArgs),
    /// Print the scan line of a BVR reference.
    ScanLine(ScanLineArgs),
    /// Print a BVR reference the way it reads on a slip, e.g. `12 34567 89012 345`.
    FormatRef(FormatRefArgs),
    /// Print how the months of one billing group are grouped into slips.
    Months(MonthsArgs),
    /// Prepare the slips of every billing group found in a file.
    Print(PrintArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the bvr configuration and output are held. Defaults to ~/bvr
    #[arg(long, env = "BVR_HOME", default_value_t = default_bvr_home())]
    bvr_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, bvr_home: PathBuf) -> Self {
        Self {
            log_level,
            bvr_home: bvr_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn bvr_home(&self) -> &DisplayPath {
        &self.bvr_home
    }
}

/// Args for the `bvr init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The company's BVR postal account, e.g. 01-145-6
    #[arg(long)]
    bvr_account: String,

    /// The locale of the month names printed on slips, e.g. fr_CH
    #[arg(long, default_value = "en_US")]
    locale: String,
}

impl InitArgs {
    pub fn new(bvr_account: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            bvr_account: bvr_account.into(),
            locale: locale.into(),
        }
    }

    pub fn bvr_account(&self) -> &str {
        &self.bvr_account
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

/// Args for the `bvr scan-line` command.
#[derive(Debug, Parser, Clone)]
pub struct ScanLineArgs {
    /// The BVR reference, spaces are allowed
    reference: String,

    /// Use this postal account instead of the configured one
    #[arg(long)]
    account: Option<String>,
}

impl ScanLineArgs {
    pub fn new(reference: impl Into<String>, account: Option<String>) -> Self {
        Self {
            reference: reference.into(),
            account,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }
}

/// Args for the `bvr format-ref` command.
#[derive(Debug, Parser, Clone)]
pub struct FormatRefArgs {
    /// The BVR reference, spaces are allowed
    reference: String,
}

impl FormatRefArgs {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// The months to print: `count` months starting with `from`.
#[derive(Debug, Parser, Clone)]
pub struct MonthSpan {
    /// The first month to print, as YYYY-MM
    #[arg(long, value_parser = parse_month)]
    from: NaiveDate,

    /// How many months to print
    #[arg(long, default_value_t = 12)]
    count: usize,
}

impl MonthSpan {
    pub fn new(from: NaiveDate, count: usize) -> Self {
        Self { from, count }
    }

    pub fn first_month(&self) -> NaiveDate {
        self.from
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Args for the `bvr months` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthsArgs {
    /// A JSON file holding a single billing group
    #[arg(long)]
    group: PathBuf,

    #[clap(flatten)]
    span: MonthSpan,
}

impl MonthsArgs {
    pub fn new(group: impl Into<PathBuf>, span: MonthSpan) -> Self {
        Self {
            group: group.into(),
            span,
        }
    }

    pub fn group(&self) -> &Path {
        &self.group
    }

    pub fn span(&self) -> &MonthSpan {
        &self.span
    }
}

/// Args for the `bvr print` command.
#[derive(Debug, Parser, Clone)]
pub struct PrintArgs {
    /// A JSON file holding `{"groups": [...]}`
    #[arg(long)]
    groups: PathBuf,

    #[clap(flatten)]
    span: MonthSpan,

    /// Also save the report to $BVR_HOME/output/slips.json
    #[arg(long)]
    save: bool,
}

impl PrintArgs {
    pub fn new(groups: impl Into<PathBuf>, span: MonthSpan, save: bool) -> Self {
        Self {
            groups: groups.into(),
            span,
            save,
        }
    }

    pub fn groups(&self) -> &Path {
        &self.groups
    }

    pub fn span(&self) -> &MonthSpan {
        &self.span
    }

    pub fn save(&self) -> bool {
        self.save
    }
}

/// Parses `YYYY-MM` (or a full `YYYY-MM-DD` date) into the first day of that month.
fn parse_month(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map(crate::grouper::first_of_month)
        .map_err(|e| format!("Expected a month like 2024-01: {e}"))
}

fn default_bvr_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("bvr"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --bvr-home or BVR_HOME instead of relying on the default \
                bvr home directory.",
            );
            PathBuf::from("bvr")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_month("2024-03").unwrap(), expected);
        assert_eq!(parse_month("2024-03-17").unwrap(), expected);
        assert!(parse_month("March").is_err());
    }

    #[test]
    fn test_parse_print_args() {
        let args = Args::try_parse_from([
            "bvr",
            "--bvr-home",
            "/tmp/bvr",
            "print",
            "--groups",
            "groups.json",
            "--from",
            "2024-01",
            "--count",
            "6",
            "--save",
        ])
        .unwrap();
        assert_eq!(args.common().bvr_home().path(), Path::new("/tmp/bvr"));
        match args.command() {
            Command::Print(print) => {
                assert_eq!(print.groups(), Path::new("groups.json"));
                assert_eq!(print.span().count(), 6);
                assert!(print.save());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_scan_line_args() {
        let args = Args::try_parse_from(["bvr", "scan-line", "00 123", "--account", "01-145-6"])
            .unwrap();
        match args.command() {
            Command::ScanLine(scan) => {
                assert_eq!(scan.reference(), "00 123");
                assert_eq!(scan.account(), Some("01-145-6"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
