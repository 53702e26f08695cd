//! The profiler: proxy factory and report writer
//!
//! A [`Profiler`] owns one clock, one start timestamp, and one
//! [`ProfilingState`]. Every proxy produced by [`Profiler::wrap`] records
//! into that same state, so timings accumulate across all wrapped objects.
//!
//! # Example
//!
//! ```
//! use method_profiler::{profiled_trait, Profiler};
//!
//! profiled_trait! {
//!     pub trait Tokenizer {
//!         #[profiled]
//!         fn tokenize(&self, text: &str) -> Vec<String>;
//!     }
//! }
//!
//! struct Whitespace;
//!
//! impl Tokenizer for Whitespace {
//!     fn tokenize(&self, text: &str) -> Vec<String> {
//!         text.split_whitespace().map(str::to_string).collect()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profiler = Profiler::with_system_clock();
//! let tokenizer = profiler.wrap::<dyn Tokenizer, _>(Whitespace)?;
//! assert_eq!(tokenizer.tokenize("a b c").len(), 3);
//!
//! let mut report = Vec::new();
//! profiler.write_data(&mut report)?;
//! assert!(String::from_utf8(report)?.contains("#tokenize(&str): "));
//! # Ok(())
//! # }
//! ```

use crate::capability::Capability;
use crate::clock::{Clock, SystemClock};
use crate::config::ReportDestination;
use crate::error::{ProfilerError, Result};
use crate::interceptor::{Interceptor, Profiled};
use crate::report;
use crate::state::ProfilingState;
use chrono::{DateTime, FixedOffset};
use std::any::type_name;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Method-level wall-clock profiler
#[derive(Debug)]
pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    start_time: DateTime<FixedOffset>,
}

impl Profiler {
    /// Create a profiler reading time from `clock`
    ///
    /// The start timestamp shown in the report header is read from the clock
    /// here, once.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let start_time = clock.now();
        Self {
            clock,
            state: Arc::new(ProfilingState::new()),
            start_time,
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Wrap `target` in a proxy implementing capability `C`
    ///
    /// `C` is the capability as a trait object type, e.g. `dyn Fetcher`.
    /// Fails with [`ProfilerError::NoProfiledMethods`] when `C` declares no
    /// `#[profiled]` method; no proxy is built in that case.
    pub fn wrap<C, T>(&self, target: T) -> Result<Profiled<T>>
    where
        C: Capability<T> + ?Sized,
        T: 'static,
    {
        if !C::has_profiled_methods() {
            return Err(ProfilerError::NoProfiledMethods {
                capability: C::NAME,
            });
        }
        tracing::debug!(
            capability = C::NAME,
            target = type_name::<T>(),
            "wrapping target in profiling proxy"
        );
        let interceptor = Interceptor::new(Arc::clone(&self.clock), target, Arc::clone(&self.state));
        Ok(Profiled::new(interceptor))
    }

    /// Instant captured when the profiler was created
    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    /// Read-only view of the accumulated timings
    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Write the report (header, one line per method, blank line) to `writer`
    pub fn write_data<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        report::write_header(writer, &self.start_time)?;
        self.state.write(writer)?;
        writeln!(writer)
    }

    /// Append the report to the file at `path`, creating it if needed
    ///
    /// Existing content is never truncated, so successive runs accumulate in
    /// one file.
    pub fn write_data_to_path(&self, path: &Path) -> Result<()> {
        let write_err = |source| ProfilerError::Write {
            destination: path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        self.write_data(&mut writer).map_err(write_err)?;
        writer.flush().map_err(write_err)?;

        tracing::info!(path = %path.display(), entries = self.state.len(), "wrote profiling data");
        Ok(())
    }

    /// Write the report to stdout or append it to a file
    pub fn write_report(&self, destination: &ReportDestination) -> Result<()> {
        match destination {
            ReportDestination::Stdout => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                self.write_data(&mut lock)
                    .and_then(|()| lock.flush())
                    .map_err(|source| ProfilerError::Write {
                        destination: destination.to_string(),
                        source,
                    })
            }
            ReportDestination::File(path) => self.write_data_to_path(path),
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::with_system_clock()
    }
}
