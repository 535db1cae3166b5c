//! Data-directory configuration loaded from `config.toml`.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskdeck_core::{SortMode, StateFilter};
use taskdeck_store::DEFAULT_KEY;
use time::UtcOffset;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

/// Top-level configuration loaded from `<dir>/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// `[storage]` table.
    #[serde(default)]
    pub storage: StorageConfig,
    /// `[display]` table.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl ProjectConfig {
    /// Load configuration from a data directory. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", config_path.display()))
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    /// Returns an error for malformed TOML or invalid values.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.ensure_valid_key()?;
        self.display.ensure_valid()
    }
}

/// Where the task list blob lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_key")]
    key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key() }
    }
}

fn default_key() -> String {
    DEFAULT_KEY.to_owned()
}

impl StorageConfig {
    /// Namespace key of the task list.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn ensure_valid_key(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            bail!("storage key must not be empty");
        }
        Ok(())
    }
}

/// Presentation defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    utc_offset: Option<String>,
    #[serde(default)]
    default_sort: Option<String>,
    #[serde(default)]
    default_filter: Option<String>,
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,
    #[serde(default = "default_new_highlight_ms")]
    new_highlight_ms: u64,
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_new_highlight_ms() -> u64 {
    400
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset: None,
            default_sort: None,
            default_filter: None,
            tick_interval_ms: default_tick_interval_ms(),
            new_highlight_ms: default_new_highlight_ms(),
        }
    }
}

impl DisplayConfig {
    /// Offset pinned in the config file, if any.
    #[must_use]
    pub fn utc_offset(&self) -> Option<UtcOffset> {
        self.utc_offset
            .as_deref()
            .and_then(|raw| parse_offset(raw).ok())
    }

    /// Offset used for "today" and for formatting due dates: the configured
    /// one, otherwise `local`.
    #[must_use]
    pub fn effective_offset(&self, local: UtcOffset) -> UtcOffset {
        self.utc_offset().unwrap_or(local)
    }

    /// Sort mode used when none is given on the command line.
    #[must_use]
    pub fn default_sort(&self) -> SortMode {
        self.default_sort
            .as_deref()
            .map_or(SortMode::DueAsc, SortMode::from_token)
    }

    /// Filter used when none is given on the command line.
    #[must_use]
    pub fn default_filter(&self) -> StateFilter {
        self.default_filter
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Interval of the live re-render tick.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// How long a freshly added task stays highlighted.
    #[must_use]
    pub fn new_highlight(&self) -> time::Duration {
        time::Duration::milliseconds(i64::try_from(self.new_highlight_ms).unwrap_or(i64::MAX))
    }

    fn ensure_valid(&self) -> Result<()> {
        if let Some(raw) = self.utc_offset.as_deref() {
            parse_offset(raw)?;
        }
        if let Some(raw) = self.default_filter.as_deref() {
            raw.parse::<StateFilter>()?;
        }
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Parse `Z`, `UTC` or a `+HH:MM` / `-HH:MM` offset.
///
/// # Errors
/// Returns an error when `raw` is none of those forms.
pub fn parse_offset(raw: &str) -> Result<UtcOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(trimmed, OFFSET_FORMAT)
        .with_context(|| format!("invalid utc_offset '{trimmed}' (expected +HH:MM, -HH:MM or UTC)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use taskdeck_core::build_due;
    use time::macros::{datetime, offset};

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ProjectConfig::from_dir(dir.path())?;
        assert_eq!(cfg.storage.key(), "modern-tasks");
        assert_eq!(cfg.display.utc_offset(), None);
        assert_eq!(cfg.display.effective_offset(offset!(-3)), offset!(-3));
        assert_eq!(cfg.display.default_sort(), SortMode::DueAsc);
        assert_eq!(cfg.display.default_filter(), StateFilter::All);
        assert_eq!(cfg.display.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.display.new_highlight(), time::Duration::milliseconds(400));
        Ok(())
    }

    #[test]
    fn load_config_with_display_settings() -> Result<()> {
        let dir = tempdir()?;
        let mut file = fs::File::create(dir.path().join(CONFIG_FILE))?;
        writeln!(
            file,
            "[storage]\nkey = \"work-tasks\"\n\n[display]\nutc_offset = \"+09:00\"\ndefault_sort = \"priority\"\ndefault_filter = \"overdue\"\ntick_interval_ms = 250"
        )?;

        let cfg = ProjectConfig::from_dir(dir.path())?;
        assert_eq!(cfg.storage.key(), "work-tasks");
        assert_eq!(cfg.display.utc_offset(), Some(offset!(+9)));
        assert_eq!(cfg.display.effective_offset(UtcOffset::UTC), offset!(+9));
        assert_eq!(cfg.display.default_sort(), SortMode::Priority);
        assert_eq!(cfg.display.default_filter().as_str(), "overdue");
        assert_eq!(cfg.display.tick_interval(), Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn due_input_is_read_in_local_offset_unless_pinned() -> Result<()> {
        let local = offset!(+9);
        let now = datetime!(2024-12-31 20:00 UTC);

        let fallback = ProjectConfig::default().display.effective_offset(local);
        assert_eq!(fallback, local);
        assert_eq!(
            build_due("2025-01-01", "09:00", now, fallback),
            Some(datetime!(2025-01-01 00:00 UTC))
        );
        // 20:00 UTC is already Jan 1 at +09:00.
        assert_eq!(
            build_due("", "07:00", now, fallback),
            Some(datetime!(2024-12-31 22:00 UTC))
        );

        let pinned = ProjectConfig::parse("[display]\nutc_offset = \"-05:00\"")?;
        let explicit = pinned.display.effective_offset(local);
        assert_eq!(explicit, offset!(-5));
        assert_eq!(
            build_due("2025-01-01", "09:00", now, explicit),
            Some(datetime!(2025-01-01 14:00 UTC))
        );
        Ok(())
    }

    #[test]
    fn unknown_sort_token_means_store_order() -> Result<()> {
        let cfg = ProjectConfig::parse("[display]\ndefault_sort = \"alphabetical\"")?;
        assert_eq!(cfg.display.default_sort(), SortMode::Unsorted);
        Ok(())
    }

    #[test]
    fn invalid_offset_is_rejected() {
        let Err(err) = ProjectConfig::parse("[display]\nutc_offset = \"tokyo\"") else {
            panic!("invalid offset should error");
        };
        assert!(format!("{err:#}").contains("invalid utc_offset"));
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let Err(err) = ProjectConfig::parse("[storage]\nkey = \"  \"") else {
            panic!("blank key should error");
        };
        assert!(err.to_string().contains("storage key must not be empty"));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let Err(err) = ProjectConfig::parse("[display]\ntick_interval_ms = 0") else {
            panic!("zero tick should error");
        };
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn invalid_filter_is_rejected() {
        assert!(ProjectConfig::parse("[display]\ndefault_filter = \"someday\"").is_err());
    }

    #[test]
    fn offsets_accept_utc_aliases_and_negative_values() -> Result<()> {
        assert_eq!(parse_offset("UTC")?, UtcOffset::UTC);
        assert_eq!(parse_offset("z")?, UtcOffset::UTC);
        assert_eq!(parse_offset("-05:30")?, offset!(-5:30));
        Ok(())
    }
}
