//! method-profiler - Transparent method-level wall-clock profiling
//!
//! This library wraps any object behind a generated proxy that implements the
//! same capability trait. Calls to methods marked `#[profiled]` are timed with
//! an injected clock and aggregated per (type, method) in a store shared by
//! every proxy of one [`Profiler`]. The aggregated timings can then be
//! written as a plain-text report. Return values, `Err`s and panics pass
//! through the proxy unchanged.

pub mod capability;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod method;
pub mod profiler;
pub mod report;
pub mod scanner;
pub mod state;

pub use capability::{Capability, CapabilityDescriptor};
pub use error::ProfilerError;
pub use interceptor::{Interceptor, Profiled};
pub use method::{MethodKey, MethodSignature};
pub use profiler::Profiler;
pub use state::{MethodStats, ProfilingState};
