//! External k-way merge sort over files of whitespace separated integers.
//!
//! Sorting happens in two phases. First the input is cut into runs of at most
//! `run_size` values, each sorted in memory and written to its own file.
//! Then the runs are merged through a min-heap, reading from at most `ways`
//! files at a time. If there are more runs than ways, groups of runs are merged
//! into bigger runs first, until a single pass can produce the output.

use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, trace, warn};
use thiserror::Error;

pub const DEFAULT_WAYS: usize = 10;
pub const DEFAULT_RUN_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum SortError {
    /// Derived IO error
    #[error("Io error: {0}")]
    Io(#[from] io::Error),

    /// A token of the input is not an integer
    #[error("Invalid value in input: {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortStats {
    /// Number of values sorted
    pub values: usize,
    /// Number of runs created from the input
    pub runs: usize,
    /// Number of merge passes, including the final one
    pub passes: usize,
}

#[derive(Debug, Clone)]
pub struct ExternalSorter {
    ways: usize,
    run_size: usize,
    work_dir: PathBuf,
}

/// Run files on disk, deleted when dropped so a failed sort leaves nothing behind
#[derive(Debug, Default)]
struct RunFiles {
    paths: Vec<PathBuf>,
}

/// Pulls whitespace separated integers out of a reader
/// without buffering more than one token
struct ValueReader<R> {
    inner: R,
    token: Vec<u8>,
}

impl<R: BufRead> ValueReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            token: Vec::new(),
        }
    }

    fn next_value(&mut self) -> Result<Option<i64>, SortError> {
        self.token.clear();

        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                break;
            }

            let mut used = 0;
            let mut done = false;
            for &b in buf {
                used += 1;
                if !b.is_ascii_whitespace() {
                    self.token.push(b);
                } else if !self.token.is_empty() {
                    done = true;
                    break;
                }
            }
            self.inner.consume(used);

            if done {
                break;
            }
        }

        if self.token.is_empty() {
            return Ok(None);
        }
        let token = String::from_utf8_lossy(&self.token);
        token
            .parse()
            .map(Some)
            .map_err(|_| SortError::InvalidValue(token.into_owned()))
    }
}

impl ExternalSorter {
    /// Creates a sorter keeping its run files in `work_dir`
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        Self {
            ways: DEFAULT_WAYS,
            run_size: DEFAULT_RUN_SIZE,
            work_dir: work_dir.into(),
        }
    }

    /// Maximum number of runs merged at once, at least 2
    pub fn with_ways(mut self, ways: usize) -> Self {
        self.ways = ways;
        self
    }

    /// Maximum number of values held in memory while creating runs
    pub fn with_run_size(mut self, run_size: usize) -> Self {
        self.run_size = run_size;
        self
    }

    /// Sorts `input` into `output`, both being whitespace separated integers
    pub fn sort_file(&self, input: &Path, output: &Path) -> Result<SortStats, SortError> {
        self.validate()?;

        let mut reader = ValueReader::new(BufReader::new(File::open(input)?));
        let mut stats = SortStats::default();
        let mut next_id = 0;

        let mut runs = self.split_runs(&mut reader, &mut stats, &mut next_id)?;
        stats.runs = runs.len();
        debug!(target: "split_runs", "{} values in {} runs", stats.values, stats.runs);

        while runs.len() > self.ways {
            let mut merged = RunFiles::default();
            for group in runs.paths.chunks(self.ways) {
                // a lone trailing run is already sorted
                if let [single] = group {
                    merged.paths.push(single.clone());
                    continue;
                }
                let path = self.run_path(&mut next_id);
                merged.paths.push(path.clone());
                self.merge(group, &path)?;
            }
            runs.paths.retain(|path| !merged.paths.contains(path));
            runs.remove_all()?;

            stats.passes += 1;
            trace!(target: "merge", "pass {} left {} runs", stats.passes, merged.len());
            runs = merged;
        }

        let written = self.merge(&runs.paths, output)?;
        runs.remove_all()?;
        stats.passes += 1;
        debug_assert_eq!(written, stats.values, "Merge lost or duplicated values");

        Ok(stats)
    }

    // [private]

    fn validate(&self) -> Result<(), SortError> {
        if self.ways < 2 {
            return Err(SortError::InvalidConfig(format!(
                "ways must be at least 2, got: {}",
                self.ways
            )));
        }
        if self.run_size == 0 {
            return Err(SortError::InvalidConfig("run size must not be 0".into()));
        }
        Ok(())
    }

    fn run_path(&self, next_id: &mut usize) -> PathBuf {
        let path = self
            .work_dir
            .join(format!("run-{}-{}", std::process::id(), next_id));
        *next_id += 1;
        path
    }

    /// Cuts the input into sorted run files
    fn split_runs<R: BufRead>(
        &self,
        reader: &mut ValueReader<R>,
        stats: &mut SortStats,
        next_id: &mut usize,
    ) -> Result<RunFiles, SortError> {
        let mut runs = RunFiles::default();
        let mut chunk = Vec::with_capacity(self.run_size);

        loop {
            chunk.clear();
            while chunk.len() < self.run_size {
                match reader.next_value()? {
                    Some(v) => chunk.push(v),
                    None => break,
                }
            }
            if chunk.is_empty() {
                return Ok(runs);
            }

            chunk.sort_unstable();
            stats.values += chunk.len();

            let path = self.run_path(next_id);
            runs.paths.push(path.clone());
            let mut w = BufWriter::new(File::create(&path)?);
            for v in &chunk {
                write!(w, "{v} ")?;
            }
            w.flush()?;
            trace!(target: "split_runs", "wrote {} values to {}", chunk.len(), path.display());

            if chunk.len() < self.run_size {
                return Ok(runs);
            }
        }
    }

    /// Merges `runs` into `output`, returning the number of values written
    fn merge(&self, runs: &[PathBuf], output: &Path) -> Result<usize, SortError> {
        let mut readers = runs
            .iter()
            .map(|path| File::open(path).map(|f| ValueReader::new(BufReader::new(f))))
            .collect::<Result<Vec<_>, _>>()?;

        // ties are broken by run index
        let mut heap = BinaryHeap::with_capacity(readers.len());
        for (i, reader) in readers.iter_mut().enumerate() {
            if let Some(v) = reader.next_value()? {
                heap.push(Reverse((v, i)));
            }
        }

        let mut w = BufWriter::new(File::create(output)?);
        let mut written = 0;
        while let Some(Reverse((v, i))) = heap.pop() {
            write!(w, "{v} ")?;
            written += 1;
            if let Some(next) = readers[i].next_value()? {
                heap.push(Reverse((next, i)));
            }
        }
        w.flush()?;

        Ok(written)
    }
}

impl RunFiles {
    fn len(&self) -> usize {
        self.paths.len()
    }

    /// Deletes every run now, surfacing the first error
    fn remove_all(&mut self) -> io::Result<()> {
        while let Some(path) = self.paths.pop() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

impl Drop for RunFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(ref e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(target: "split_runs", "could not remove {}: {e}", path.display()),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{SortError, ValueReader};

    fn values(src: &str) -> Result<Vec<i64>, SortError> {
        let mut r = ValueReader::new(src.as_bytes());
        let mut out = Vec::new();
        while let Some(v) = r.next_value()? {
            out.push(v);
        }
        Ok(out)
    }

    #[test]
    fn reads_tokens_across_whitespace() {
        assert_eq!(values("3 1\n\n  -2\t10 ").unwrap(), [3, 1, -2, 10]);
        assert_eq!(values("").unwrap(), Vec::<i64>::new());
        assert_eq!(values("   \n").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn tokens_split_over_buffer_refills() {
        let src = "123456 7890 42";
        let reader = std::io::BufReader::with_capacity(2, src.as_bytes());
        let mut r = ValueReader::new(reader);

        assert_eq!(r.next_value().unwrap(), Some(123456));
        assert_eq!(r.next_value().unwrap(), Some(7890));
        assert_eq!(r.next_value().unwrap(), Some(42));
        assert_eq!(r.next_value().unwrap(), None);
    }

    #[test]
    fn rejects_non_integers() {
        match values("1 two 3") {
            Err(SortError::InvalidValue(token)) => assert_eq!(token, "two"),
            other => panic!("expected invalid value, got {other:?}"),
        }
    }
}
