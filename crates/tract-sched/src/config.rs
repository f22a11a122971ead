//! Scheduler selection and sizing.

use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::Deserialize;
use thiserror::Error;
use tract_deque::DEFAULT_CAPACITY;

use crate::{Scheduler, Sequential, StaticPartition, WorkStealing};

/// Which scheduling strategy runs the join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Single thread, input order.
    Sequential,
    /// Contiguous ranges per worker, reduced after a barrier.
    StaticPartition,
    /// Per-worker deques with stealing.
    WorkStealing,
}

impl Mode {
    /// All modes, baseline first.
    pub const ALL: [Mode; 3] = [Mode::Sequential, Mode::StaticPartition, Mode::WorkStealing];

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::StaticPartition => "static-partition",
            Self::WorkStealing => "work-stealing",
        }
    }

    /// Whether the mode needs a thread count.
    #[must_use]
    pub const fn is_parallel(self) -> bool {
        !matches!(self, Self::Sequential)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    /// Accepts the canonical names and the short `s`, `pb`, `ps` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sequential" | "s" => Ok(Self::Sequential),
            "static-partition" | "pb" => Ok(Self::StaticPartition),
            "work-stealing" | "ps" => Ok(Self::WorkStealing),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Configuration error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "unknown scheduling mode {0:?} (expected sequential, static-partition or work-stealing)"
    )]
    UnknownMode(String),

    #[error("mode {mode} requires a thread count")]
    MissingThreadCount { mode: Mode },

    #[error("thread count must be a positive integer, got {0:?}")]
    InvalidThreadCount(String),

    #[error("deque capacity must be a positive integer, got {0:?}")]
    InvalidDequeCapacity(String),
}

/// Validated scheduler configuration.
///
/// Deserializes from e.g. `{"mode": "work-stealing", "threads": 8}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct SchedulerConfig {
    pub mode: Mode,
    /// Worker count; always 1 for [`Mode::Sequential`].
    pub threads: NonZeroUsize,
    /// Slots per work-stealing deque.
    pub deque_capacity: NonZeroUsize,
}

impl SchedulerConfig {
    /// Single-threaded baseline.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            mode: Mode::Sequential,
            threads: NonZeroUsize::MIN,
            deque_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Parallel mode with `threads` workers.
    ///
    /// Passing [`Mode::Sequential`] ignores `threads`.
    pub fn parallel(mode: Mode, threads: usize) -> Result<Self, ConfigError> {
        if !mode.is_parallel() {
            return Ok(Self::sequential());
        }
        let threads = NonZeroUsize::new(threads)
            .ok_or_else(|| ConfigError::InvalidThreadCount(threads.to_string()))?;
        Ok(Self {
            mode,
            threads,
            deque_capacity: DEFAULT_CAPACITY,
        })
    }

    /// Parse from command-line style strings.
    pub fn parse(mode: &str, threads: Option<&str>) -> Result<Self, ConfigError> {
        let mode: Mode = mode.parse()?;
        if !mode.is_parallel() {
            return Ok(Self::sequential());
        }

        let raw = threads.ok_or(ConfigError::MissingThreadCount { mode })?;
        let threads = parse_positive(raw)
            .ok_or_else(|| ConfigError::InvalidThreadCount(raw.to_string()))?;
        Ok(Self {
            mode,
            threads,
            deque_capacity: DEFAULT_CAPACITY,
        })
    }

    /// Override the work-stealing deque capacity.
    #[must_use]
    pub const fn with_deque_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.deque_capacity = capacity;
        self
    }

    /// Override the deque capacity from a string such as an environment value.
    pub fn with_deque_capacity_str(self, raw: &str) -> Result<Self, ConfigError> {
        let capacity =
            parse_positive(raw).ok_or_else(|| ConfigError::InvalidDequeCapacity(raw.to_string()))?;
        Ok(self.with_deque_capacity(capacity))
    }

    /// Build the scheduler this configuration describes.
    #[must_use]
    pub fn scheduler(&self) -> Box<dyn Scheduler> {
        match self.mode {
            Mode::Sequential => Box::new(Sequential),
            Mode::StaticPartition => Box::new(StaticPartition::new(self.threads)),
            Mode::WorkStealing => Box::new(WorkStealing::new(self.threads, self.deque_capacity)),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

fn parse_positive(raw: &str) -> Option<NonZeroUsize> {
    raw.trim().parse::<usize>().ok().and_then(NonZeroUsize::new)
}

/// Unvalidated shape of [`SchedulerConfig`] on the wire.
#[derive(Deserialize)]
struct RawConfig {
    mode: String,
    #[serde(default)]
    threads: Option<i64>,
    #[serde(default)]
    deque_capacity: Option<i64>,
}

impl TryFrom<RawConfig> for SchedulerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let threads = raw.threads.map(|t| t.to_string());
        let config = Self::parse(&raw.mode, threads.as_deref())?;
        match raw.deque_capacity {
            Some(capacity) => config.with_deque_capacity_str(&capacity.to_string()),
            None => Ok(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_and_aliases() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
        assert_eq!("s".parse::<Mode>(), Ok(Mode::Sequential));
        assert_eq!("pb".parse::<Mode>(), Ok(Mode::StaticPartition));
        assert_eq!("ps".parse::<Mode>(), Ok(Mode::WorkStealing));
        assert_eq!(
            "parallel".parse::<Mode>(),
            Err(ConfigError::UnknownMode("parallel".to_string()))
        );
    }

    #[test]
    fn test_parse_parallel_requires_positive_threads() {
        let config = SchedulerConfig::parse("work-stealing", Some("4")).unwrap();
        assert_eq!(config.mode, Mode::WorkStealing);
        assert_eq!(config.threads.get(), 4);
        assert_eq!(config.deque_capacity, DEFAULT_CAPACITY);

        assert_eq!(
            SchedulerConfig::parse("static-partition", None),
            Err(ConfigError::MissingThreadCount {
                mode: Mode::StaticPartition
            })
        );
        for bad in ["0", "-2", "four", ""] {
            assert_eq!(
                SchedulerConfig::parse("pb", Some(bad)),
                Err(ConfigError::InvalidThreadCount(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_sequential_ignores_threads() {
        let config = SchedulerConfig::parse("s", Some("0")).unwrap();
        assert_eq!(config, SchedulerConfig::sequential());
        assert_eq!(SchedulerConfig::parallel(Mode::Sequential, 8).unwrap().threads.get(), 1);
    }

    #[test]
    fn test_deque_capacity_override() {
        let config = SchedulerConfig::parse("ps", Some("2"))
            .unwrap()
            .with_deque_capacity_str("16")
            .unwrap();
        assert_eq!(config.deque_capacity.get(), 16);

        assert_eq!(
            SchedulerConfig::sequential().with_deque_capacity_str("0"),
            Err(ConfigError::InvalidDequeCapacity("0".to_string()))
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"mode": "static-partition", "threads": 3}"#).unwrap();
        assert_eq!(config.mode, Mode::StaticPartition);
        assert_eq!(config.threads.get(), 3);

        let config: SchedulerConfig = serde_json::from_str(
            r#"{"mode": "work-stealing", "threads": 2, "deque_capacity": 64}"#,
        )
        .unwrap();
        assert_eq!(config.deque_capacity.get(), 64);

        assert!(serde_json::from_str::<SchedulerConfig>(r#"{"mode": "fast"}"#).is_err());
        assert!(
            serde_json::from_str::<SchedulerConfig>(r#"{"mode": "ps", "threads": -1}"#).is_err()
        );
    }

    #[test]
    fn test_scheduler_names_follow_mode() {
        for mode in Mode::ALL {
            let config = SchedulerConfig::parallel(mode, 2).unwrap();
            assert_eq!(config.scheduler().mode(), mode);
        }
    }
}
