//! Log rotation configuration and period arithmetic

use chrono::{Datelike, Local, NaiveDate};
use rotalog_core::LogRotationSettings;
use std::path::PathBuf;

/// `num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Log rotation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Directory the dated files and the alias live in
    pub dir: PathBuf,
    /// File name stem, `<base>-<date>.log`
    pub base_filename: String,
    /// Length of one rotation period in days
    pub rotation_days: u32,
    /// Maximum number of dated files to keep, 0 keeps everything
    pub max_files: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self::from_settings(&LogRotationSettings::default())
    }
}

impl RotationConfig {
    pub fn new(
        dir: impl Into<PathBuf>,
        base_filename: impl Into<String>,
        rotation_days: u32,
        max_files: usize,
    ) -> Self {
        Self {
            dir: dir.into(),
            base_filename: base_filename.into(),
            rotation_days,
            max_files,
        }
    }

    pub fn from_settings(settings: &LogRotationSettings) -> Self {
        Self::new(
            settings.log_dir.clone(),
            settings.base_filename.clone(),
            settings.rotate_days,
            settings.max_remain_count as usize,
        )
    }

    /// Path of the dated file for the period starting on `date`
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.log",
            self.base_filename,
            date.format("%Y-%m-%d")
        ))
    }

    /// Path of the stable alias pointing at the current file
    pub fn link_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_filename))
    }

    /// First day of the rotation period containing `date`.
    ///
    /// Periods are aligned to multiples of `rotation_days` since the Unix
    /// epoch; a period length of 0 counts as 1.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        let days = i32::try_from(self.rotation_days.max(1)).unwrap_or(i32::MAX);
        let since_epoch = date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE;
        let start = since_epoch.div_euclid(days) * days + UNIX_EPOCH_DAYS_FROM_CE;
        NaiveDate::from_num_days_from_ce_opt(start).unwrap_or(date)
    }
}
