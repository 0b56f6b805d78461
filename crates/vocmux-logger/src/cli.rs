//! Command line handling
//!
//! The logger takes a single optional positional argument: the prefix of the
//! CSV file name. There are no flags.

use std::path::{Path, PathBuf};

use log::warn;

/// Prefix used when none is given on the command line.
pub const DEFAULT_LOG_PREFIX: &str = "log";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Args {
    prefix: Option<String>,
}

impl Args {
    /// Parse a full argument list, program name first.
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().skip(1);
        let prefix = args.next().filter(|prefix| !prefix.is_empty());

        let extra = args.count();
        if extra > 0 {
            warn!("Ignoring {} extra argument(s)", extra);
        }

        Self { prefix }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::args())
    }

    /// File name prefix, or [`DEFAULT_LOG_PREFIX`].
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_LOG_PREFIX)
    }
}

/// `<dir>/<prefix>_<stamp>.csv`
pub fn log_file_path(dir: &Path, prefix: &str, stamp: &str) -> PathBuf {
    dir.join(format!("{prefix}_{stamp}.csv"))
}
