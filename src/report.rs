use serde::Serialize;

use std::fmt::{Display, Formatter};

/// Read-only summary of a finished run.
///
/// Every time-average divides by `duration`, which is always the configured horizon, so a report is well defined even
/// when no customer ever arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub arrival_rate: f64,
    pub service_rate: f64,
    /// `arrival_rate / service_rate`, as computed by [`Config::offered_load()`](crate::Config::offered_load).
    pub offered_load: f64,
    /// Total simulated time.
    pub duration: f64,
    pub arrivals: u64,
    pub customers_served: u64,
    pub max_queue_length: usize,
    /// Mean time from arrival to start of service, over served customers.
    pub avg_wait: f64,
    /// Time-weighted mean number of customers in the waiting line.
    pub avg_queue_length: f64,
    /// Fraction of simulated time the server was busy.
    pub utilization: f64,
    /// Customers served per time unit.
    pub throughput: f64,
    /// Set when the arrival rate is at least the service rate, i.e. when the line may grow without bound.
    pub stability_warning: bool,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        writeln!(f, "=== Simulation Results ===")?;
        writeln!(f, "Total simulated time        : {:.2}", self.duration)?;
        writeln!(f, "Customers arrived           : {}", self.arrivals)?;
        writeln!(f, "Customers served            : {}", self.customers_served)?;
        writeln!(f, "Maximum queue length        : {}", self.max_queue_length)?;
        writeln!(f, "Average waiting time        : {:.4} time units", self.avg_wait)?;
        writeln!(f, "Average number in queue     : {:.4}", self.avg_queue_length)?;
        writeln!(f, "Server utilization          : {:.4}", self.utilization)?;
        write!(f, "Throughput (cust/time unit) : {:.4}", self.throughput)?;

        if self.stability_warning {
            write!(
                f,
                "\n\n[Note] Arrival rate >= service rate (load {:.3}). The system may be unstable (queue tends to grow).",
                self.offered_load
            )?;
        }
        Ok(())
    }
}
