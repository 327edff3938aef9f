//! Configuration file handling for bvr.
//!
//! The configuration file is stored at `$BVR_HOME/config.json` and holds the company bank accounts
//! and the locale used to print month names.

use crate::communication::{EnglishMonths, LocalizedMonths, MonthLabels};
use crate::model::{company_bvr_account, BankAccount};
use crate::{utils, Result};
use anyhow::{bail, Context};
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "bvr";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_LOCALE: &str = "en_US";
const OUTPUT: &str = "output";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BVR_HOME` and from there it loads `$BVR_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    output: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its `output` subdirectory and an initial `config.json` holding
    /// `bvr_account` as the company's BVR account.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if `locale` is unknown.
    pub async fn create(dir: impl Into<PathBuf>, bvr_account: &str, locale: &str) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the bvr home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let output = root.join(OUTPUT);
        utils::make_dir(&output).await?;

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            bank_accounts: vec![BankAccount::bvr(bvr_account)],
            locale: locale.to_string(),
        };
        config_file.validate()?;
        let config_path = root.join(CONFIG_JSON);
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            output,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `bvr_home` exists and that the config file exists
    /// - load and validate the config file
    /// - validate that the output directory exists
    pub async fn load(bvr_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = bvr_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("BVR Home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            output: root.join(OUTPUT),
            config_path,
            config_file,
        };
        if !config.output.is_dir() {
            bail!(
                "The output directory is missing '{}'",
                config.output.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn bank_accounts(&self) -> &[BankAccount] {
        &self.config_file.bank_accounts
    }

    /// The account printed on every slip.
    pub fn bvr_account(&self) -> Result<&BankAccount> {
        Ok(company_bvr_account(self.bank_accounts())?)
    }

    pub fn locale(&self) -> &str {
        &self.config_file.locale
    }

    /// Month names in the configured locale.
    ///
    /// # Errors
    /// - Returns an error if the configured locale is unknown.
    pub fn month_labels(&self) -> Result<Box<dyn MonthLabels + Send + Sync>> {
        month_labels(self.locale())
    }
}

/// Picks the month names for `locale`, English month names being the default.
pub fn month_labels(locale: &str) -> Result<Box<dyn MonthLabels + Send + Sync>> {
    if locale == DEFAULT_LOCALE {
        return Ok(Box::new(EnglishMonths));
    }
    let locale = Locale::try_from(locale)
        .map_err(|_| anyhow::anyhow!("Unknown locale '{locale}'"))?;
    Ok(Box::new(LocalizedMonths::new(locale)))
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "bvr",
///   "config_version": 1,
///   "bank_accounts": [{ "number": "01-145-6", "kind": "bvr" }],
///   "locale": "fr_CH"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "bvr"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The company bank accounts, the first BVR account is printed on slips
    bank_accounts: Vec<BankAccount>,

    /// Locale of the month names printed on slips
    #[serde(default = "default_locale")]
    locale: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            bank_accounts: Vec::new(),
            locale: default_locale(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it is invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        let account = company_bvr_account(&self.bank_accounts)?;
        let _ = account
            .bank_identifier()
            .context("Invalid BVR account in config file")?;
        let _ = month_labels(&self.locale)?;
        Ok(())
    }
}
