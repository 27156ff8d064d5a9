//! Fixed-period reporting loop.
//!
//! Drives acquire → convert → report, then sleeps for the configured
//! interval, forever:
//!
//! ```text
//! Idle → Reading → Reporting → Sleeping → Reading → ...
//!           │          │
//!           └──────────┴──→ Terminated(Failure)
//! ```
//!
//! There is no iteration limit and no retry. The first acquisition error
//! stops the loop and is returned to the caller, which is expected to report
//! it and exit. Only one read is ever in flight.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info, instrument, trace};

use crate::config::{ReportingConfig, SensorConfig};
use crate::error::AppResult;
use crate::hardware::RawSampleSource;
use crate::measurement::Reading;

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Normal completion (never reached by [`ReportingLoop::run`])
    Success,
    /// Stopped on an acquisition or output error
    Failure,
}

/// Where the loop currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Before the first cycle
    Idle,
    /// Waiting on the acquisition source
    Reading,
    /// Writing the converted value to the sink
    Reporting,
    /// Pausing between cycles
    Sleeping,
    /// No further cycles will run
    Terminated(Outcome),
}

/// Format one report line, without the trailing newline.
pub fn format_reading(reading: &Reading, precision: usize) -> String {
    format!(
        "Corrente lida: {:.prec$} A",
        reading.current_amps,
        prec = precision
    )
}

/// Periodic reporter over one acquisition source and one text sink.
pub struct ReportingLoop<S, W> {
    source: S,
    sensor: SensorConfig,
    interval: Duration,
    precision: usize,
    sink: W,
    state: LoopState,
    cycles: u64,
}

impl<S, W> ReportingLoop<S, W>
where
    S: RawSampleSource,
    W: Write + Send,
{
    /// Create a loop in the `Idle` state.
    pub fn new(source: S, sensor: SensorConfig, reporting: &ReportingConfig, sink: W) -> Self {
        Self {
            source,
            sensor,
            interval: reporting.interval(),
            precision: reporting.precision,
            sink,
            state: LoopState::Idle,
            cycles: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of fully reported cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The acquisition source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Pause between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consume the loop and hand back the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }

    fn transition(&mut self, next: LoopState) {
        trace!(from = ?self.state, to = ?next, "reporting loop transition");
        self.state = next;
    }

    /// Run one acquire → convert → report step without sleeping.
    ///
    /// On error the loop moves to `Terminated(Failure)` and stays there.
    pub async fn run_cycle(&mut self) -> AppResult<Reading> {
        match self.cycle().await {
            Ok(reading) => Ok(reading),
            Err(err) => {
                self.transition(LoopState::Terminated(Outcome::Failure));
                Err(err)
            }
        }
    }

    async fn cycle(&mut self) -> AppResult<Reading> {
        self.transition(LoopState::Reading);
        let raw = self.source.read_raw_sample().await?;
        let reading = Reading::from_raw(raw, &self.sensor);

        self.transition(LoopState::Reporting);
        writeln!(self.sink, "{}", format_reading(&reading, self.precision))?;
        self.sink.flush()?;

        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            raw = reading.raw_sample,
            current_amps = reading.current_amps,
            timestamp = %reading.timestamp,
            "sample reported"
        );
        Ok(reading)
    }

    /// Report forever, sleeping `interval` between cycles.
    ///
    /// Returns only on error; the loop is then `Terminated(Failure)` and no
    /// further read is attempted. Calling `run` on a terminated loop is a
    /// no-op.
    #[instrument(skip_all, fields(source = %self.source.describe()))]
    pub async fn run(&mut self) -> AppResult<()> {
        if let LoopState::Terminated(outcome) = self.state {
            debug!(?outcome, "reporting loop already terminated");
            return Ok(());
        }
        info!("reporting loop started");

        loop {
            if let Err(err) = self.run_cycle().await {
                info!(cycles = self.cycles, error = %err, "reporting loop terminated");
                return Err(err);
            }

            self.transition(LoopState::Sleeping);
            tokio::time::sleep(self.interval).await;
        }
    }
}
