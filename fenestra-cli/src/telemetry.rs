//! Process telemetry for the benchmark protocol.
//!
//! Reports the `VmPeak`/`VmHWM` lines of `/proc/self/status` and samples the
//! `Threads:` field in a background thread so the driver can print the peak
//! worker count for each phase. Linux only, like the `/proc` interface it
//! reads.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while probing process telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `/proc/self/status` could not be read.
    #[error("failed to read `/proc/self/status`: {source}")]
    Proc {
        #[source]
        source: std::io::Error,
    },
    /// A required field was absent from `/proc/self/status`.
    #[error("`/proc/self/status` is missing the `{field}` field")]
    MissingProcField { field: &'static str },
    /// A field value failed to parse.
    #[error("`/proc/self/status` field `{field}` has unparsable value `{value}`")]
    InvalidProcField { field: &'static str, value: String },
    /// The sampler needs a non-zero cadence.
    #[error("sampling interval must be non-zero")]
    ZeroSamplingInterval,
    /// The background sampler thread panicked.
    #[error("the thread-count sampler panicked")]
    SamplerPanicked,
    /// The sampler's error slot was poisoned.
    #[error("the thread-count sampler lock was poisoned")]
    SamplerLockPoisoned,
    /// Telemetry relies on `/proc` and is unavailable on this platform.
    #[error("process telemetry is not supported on {os}")]
    UnsupportedPlatform { os: &'static str },
}

/// Returns the raw `VmPeak:` and `VmHWM:` lines for this process.
///
/// # Errors
/// Returns [`TelemetryError::UnsupportedPlatform`] off Linux and
/// [`TelemetryError::Proc`] when `/proc/self/status` cannot be read.
pub fn peak_memory_lines() -> Result<Vec<String>, TelemetryError> {
    #[cfg(target_os = "linux")]
    {
        let status = read_status()?;
        Ok(status
            .lines()
            .filter(|line| line.starts_with("VmPeak:") || line.starts_with("VmHWM:"))
            .map(ToOwned::to_owned)
            .collect())
    }
    #[cfg(not(target_os = "linux"))]
    {
        Err(TelemetryError::UnsupportedPlatform {
            os: std::env::consts::OS,
        })
    }
}

/// Samples the process thread count in the background and remembers the peak.
///
/// The sampler thread itself counts towards the total; callers subtract one
/// when reporting workload threads.
#[derive(Debug)]
pub struct ThreadCountSampler {
    #[cfg(target_os = "linux")]
    inner: linux::Sampler,
}

impl ThreadCountSampler {
    /// Starts sampling at the given cadence.
    ///
    /// # Errors
    /// Returns [`TelemetryError::ZeroSamplingInterval`] for a zero interval
    /// and [`TelemetryError::UnsupportedPlatform`] off Linux.
    pub fn start(interval: Duration) -> Result<Self, TelemetryError> {
        if interval.is_zero() {
            return Err(TelemetryError::ZeroSamplingInterval);
        }
        #[cfg(target_os = "linux")]
        {
            Ok(Self {
                inner: linux::Sampler::start(interval)?,
            })
        }
        #[cfg(not(target_os = "linux"))]
        {
            let _ = interval;
            Err(TelemetryError::UnsupportedPlatform {
                os: std::env::consts::OS,
            })
        }
    }

    /// Stops sampling and returns the peak observed thread count.
    ///
    /// # Errors
    /// Surfaces any error the background thread hit while sampling.
    pub fn stop(self) -> Result<usize, TelemetryError> {
        #[cfg(target_os = "linux")]
        {
            self.inner.stop()
        }
        #[cfg(not(target_os = "linux"))]
        {
            unreachable!("sampler cannot be constructed off Linux")
        }
    }
}

#[cfg(target_os = "linux")]
fn read_status() -> Result<String, TelemetryError> {
    std::fs::read_to_string("/proc/self/status").map_err(|source| TelemetryError::Proc { source })
}

#[cfg(target_os = "linux")]
mod linux {
    use std::{
        sync::{
            atomic::{AtomicBool, AtomicUsize, Ordering},
            Arc, Mutex,
        },
        thread,
        time::Duration,
    };

    use super::{read_status, TelemetryError};

    #[derive(Debug)]
    pub(super) struct Sampler {
        running: Arc<AtomicBool>,
        peak: Arc<AtomicUsize>,
        background_error: Arc<Mutex<Option<TelemetryError>>>,
        handle: thread::JoinHandle<()>,
    }

    impl Sampler {
        pub(super) fn start(interval: Duration) -> Result<Self, TelemetryError> {
            let running = Arc::new(AtomicBool::new(true));
            let peak = Arc::new(AtomicUsize::new(read_thread_count()?));
            let background_error = Arc::new(Mutex::new(None::<TelemetryError>));

            let running_handle = Arc::clone(&running);
            let peak_handle = Arc::clone(&peak);
            let error_handle = Arc::clone(&background_error);
            let handle = thread::spawn(move || {
                while running_handle.load(Ordering::Relaxed) {
                    match read_thread_count() {
                        Ok(count) => {
                            peak_handle.fetch_max(count, Ordering::Relaxed);
                        }
                        Err(err) => {
                            store_background_error(&error_handle, err);
                            break;
                        }
                    }
                    thread::sleep(interval);
                }
            });

            Ok(Self {
                running,
                peak,
                background_error,
                handle,
            })
        }

        pub(super) fn stop(self) -> Result<usize, TelemetryError> {
            self.running.store(false, Ordering::Relaxed);
            self.handle
                .join()
                .map_err(|_| TelemetryError::SamplerPanicked)?;

            self.peak.fetch_max(read_thread_count()?, Ordering::Relaxed);
            let maybe_background_error = self
                .background_error
                .lock()
                .map_err(|_| TelemetryError::SamplerLockPoisoned)?
                .take();
            if let Some(err) = maybe_background_error {
                return Err(err);
            }
            Ok(self.peak.load(Ordering::Relaxed))
        }
    }

    fn store_background_error(slot: &Mutex<Option<TelemetryError>>, error: TelemetryError) {
        if let Ok(mut guard) = slot.lock() {
            if guard.is_none() {
                *guard = Some(error);
            }
        }
    }

    fn read_thread_count() -> Result<usize, TelemetryError> {
        parse_thread_count(&read_status()?)
    }

    pub(super) fn parse_thread_count(status: &str) -> Result<usize, TelemetryError> {
        let field = "Threads";
        let line = status
            .lines()
            .find(|candidate| candidate.starts_with("Threads:"))
            .ok_or(TelemetryError::MissingProcField { field })?;
        let value_raw = line
            .split_whitespace()
            .nth(1)
            .ok_or(TelemetryError::MissingProcField { field })?;
        value_raw
            .parse::<usize>()
            .map_err(|_| TelemetryError::InvalidProcField {
                field,
                value: value_raw.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn zero_interval_is_rejected() {
        let err = ThreadCountSampler::start(Duration::ZERO).expect_err("zero interval must fail");
        assert!(matches!(err, TelemetryError::ZeroSamplingInterval));
    }

    #[cfg(target_os = "linux")]
    #[rstest]
    #[case("Threads:\t8", 8)]
    #[case("Name:\tfenestra\nThreads: 12\n", 12)]
    fn parse_thread_count_accepts_valid_lines(#[case] status: &str, #[case] expected: usize) {
        assert_eq!(
            linux::parse_thread_count(status).expect("valid Threads field must parse"),
            expected
        );
    }

    #[cfg(target_os = "linux")]
    #[rstest]
    #[case::missing_field("Name:\tfenestra\n")]
    #[case::invalid_numeric("Threads:\tmany\n")]
    fn parse_thread_count_rejects_invalid_input(#[case] status: &str) {
        let err = linux::parse_thread_count(status).expect_err("invalid status must fail");
        assert!(matches!(
            err,
            TelemetryError::MissingProcField { field: "Threads" }
                | TelemetryError::InvalidProcField {
                    field: "Threads",
                    ..
                }
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn sampler_observes_at_least_the_current_thread() {
        let sampler =
            ThreadCountSampler::start(Duration::from_millis(1)).expect("sampler must start");
        std::thread::sleep(Duration::from_millis(5));
        let peak = sampler.stop().expect("sampler must stop");
        assert!(peak >= 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn memory_lines_name_their_fields() {
        let lines = peak_memory_lines().expect("status must be readable");
        assert!(lines
            .iter()
            .all(|line| line.starts_with("VmPeak:") || line.starts_with("VmHWM:")));
    }
}
