use std::path::PathBuf;

use thiserror::Error;

use crate::extsort::{DEFAULT_RUN_SIZE, DEFAULT_WAYS};

/// Slot count the table REPL starts with
pub const DEFAULT_TABLE_CAPACITY: usize = 6;
pub const DEFAULT_QUEUE_CAPACITY: usize = collections::circular_queue::DEFAULT_QUEUE_CAPACITY;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing argument: <{0}>")]
    MissingArg(&'static str),

    #[error("Invalid {name}: {value}")]
    InvalidArg { name: &'static str, value: String },

    #[error("Too many arguments")]
    TooManyArgs,
}

/// `hashtable [capacity]`
#[derive(Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub capacity: usize,
}

/// `queue [capacity]`
#[derive(Debug, PartialEq, Eq)]
pub struct QueueConfig {
    pub capacity: usize,
}

/// `extsort <input> <output> [ways] [run_size]`
#[derive(Debug, PartialEq, Eq)]
pub struct SortConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ways: usize,
    pub run_size: usize,
}

/// Positional arguments, program name already skipped
struct Args<I> {
    inner: I,
}

impl<I: Iterator<Item = String>> Args<I> {
    fn required(&mut self, name: &'static str) -> Result<String, ConfigError> {
        self.inner.next().ok_or(ConfigError::MissingArg(name))
    }

    fn usize_or(&mut self, name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match self.inner.next() {
            None => Ok(default),
            Some(value) => match value.parse() {
                Ok(0) | Err(_) => Err(ConfigError::InvalidArg { name, value }),
                Ok(n) => Ok(n),
            },
        }
    }

    fn finish(mut self) -> Result<(), ConfigError> {
        match self.inner.next() {
            Some(_) => Err(ConfigError::TooManyArgs),
            None => Ok(()),
        }
    }
}

fn args<A: IntoIterator<Item = String>>(args: A) -> Args<A::IntoIter> {
    Args {
        inner: args.into_iter(),
    }
}

impl TableConfig {
    pub fn from_args<A: IntoIterator<Item = String>>(raw: A) -> Result<Self, ConfigError> {
        let mut args = args(raw);
        let capacity = args.usize_or("capacity", DEFAULT_TABLE_CAPACITY)?;
        args.finish()?;
        Ok(Self { capacity })
    }
}

impl QueueConfig {
    pub fn from_args<A: IntoIterator<Item = String>>(raw: A) -> Result<Self, ConfigError> {
        let mut args = args(raw);
        let capacity = args.usize_or("capacity", DEFAULT_QUEUE_CAPACITY)?;
        args.finish()?;
        Ok(Self { capacity })
    }
}

impl SortConfig {
    pub fn from_args<A: IntoIterator<Item = String>>(raw: A) -> Result<Self, ConfigError> {
        let mut args = args(raw);
        let input = args.required("input")?.into();
        let output = args.required("output")?.into();
        let ways = args.usize_or("ways", DEFAULT_WAYS)?;
        let run_size = args.usize_or("run_size", DEFAULT_RUN_SIZE)?;
        args.finish()?;
        Ok(Self {
            input,
            output,
            ways,
            run_size,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{ConfigError, SortConfig, TableConfig};

    fn owned(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        assert_eq!(TableConfig::from_args(owned(&[])), Ok(TableConfig { capacity: 6 }));

        let cfg = SortConfig::from_args(owned(&["in.txt", "out.txt"])).unwrap();
        assert_eq!(cfg.ways, 10);
        assert_eq!(cfg.run_size, 1000);
        assert_eq!(cfg.output.to_str(), Some("out.txt"));
    }

    #[test]
    fn overrides() {
        assert_eq!(
            TableConfig::from_args(owned(&["12"])),
            Ok(TableConfig { capacity: 12 })
        );
        let cfg = SortConfig::from_args(owned(&["in", "out", "3", "64"])).unwrap();
        assert_eq!((cfg.ways, cfg.run_size), (3, 64));
    }

    #[test]
    fn rejects_bad_args() {
        assert_eq!(
            TableConfig::from_args(owned(&["0"])),
            Err(ConfigError::InvalidArg {
                name: "capacity",
                value: "0".into()
            })
        );
        assert_eq!(
            TableConfig::from_args(owned(&["6", "7"])),
            Err(ConfigError::TooManyArgs)
        );
        assert_eq!(
            SortConfig::from_args(owned(&["in"])),
            Err(ConfigError::MissingArg("output"))
        );
    }
}
