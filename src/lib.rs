//! # Overview
//!
//! mmone is a discrete-event simulation of a single-server queue: one service point, an unbounded-in-principle waiting
//! line served first-in-first-out, Poisson arrivals and exponential service times (an M/M/1 queue). It runs over a
//! fixed horizon of simulated time and reports throughput, mean wait, mean queue length, server utilization and peak
//! queue depth. It suits quick estimates of congestion at a teller window, a single worker, or a single network link.
//!
//! The crate is built from three pieces:
//!
//! * A [`VariateSource`] produces exponential durations from uniform draws on the open interval (0, 1). The
//!   [`Simulation`] owns its source, so a test can hand it a [`ScriptedVariates`] or a seeded [`RngVariates`] to make
//!   a run fully reproducible without any process-wide generator state.
//! * A [`WaitingLine`] records the arrival time of each queued customer so that waits are attributed to the right
//!   customer. It has a fixed capacity; exceeding it aborts the run rather than dropping data.
//! * The [`Simulation`] holds the clock, the server, the waiting line and the running [`Statistics`]. It repeatedly
//!   jumps to the earlier of the next arrival and the next departure, integrating queue length and busy time over each
//!   skipped interval before applying the event, and stops at the horizon.
//!
//! ```
//! use mmone::{Config, Simulation};
//!
//! let config = Config::new(0.5, 0.7, 1000.0).with_seed(42);
//! let report = Simulation::from_config(&config)?.run()?;
//! assert_eq!(1000.0, report.duration);
//! assert!((0.0..=1.0).contains(&report.utilization));
//! # Ok::<(), mmone::Error>(())
//! ```
//!
//! Runs log through [`tracing`]; see [`logging`] for installing a subscriber.

mod config;
mod error;
mod events;
pub mod logging;
mod report;
mod simulation;
mod statistics;
mod variate;
mod waiting_line;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{EventKind, Step};
pub use report::Report;
pub use simulation::{Simulation, SimulationState};
pub use statistics::Statistics;
pub use variate::{DefaultVariates, RngVariates, ScriptedVariates, VariateSource};
pub use waiting_line::{WaitingLine, DEFAULT_CAPACITY};
