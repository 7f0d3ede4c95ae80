/// Running totals accumulated over a simulation.
///
/// The two integrals only ever grow, and they grow exclusively through [`accumulate()`], which the engine calls with
/// the state that held *before* each transition.
///
/// [`accumulate()`]: Statistics::accumulate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    /// Integral of the waiting-line length over simulated time.
    pub area_under_queue_length: f64,
    /// Integral of the server's busy indicator over simulated time.
    pub busy_time: f64,
    /// Sum of the waits of every customer who reached the server. Customers served on arrival contribute zero.
    pub total_wait_time: f64,
    /// Customers who completed service.
    pub customers_served: u64,
    /// Customers who arrived, whether or not they have been served yet.
    pub arrivals: u64,
    /// Longest the waiting line has been.
    pub max_queue_length: usize,
}

impl Statistics {
    /// Integrate the state that held over an interval of length `elapsed`.
    pub(crate) fn accumulate(&mut self, elapsed: f64, queue_length: usize, server_busy: bool) {
        // usize -> f64 is exact for any line that fits in memory
        #[allow(clippy::cast_precision_loss)]
        let queue_length = queue_length as f64;
        self.area_under_queue_length += queue_length * elapsed;
        if server_busy {
            self.busy_time += elapsed;
        }
    }

    pub(crate) fn record_arrival(&mut self) {
        self.arrivals += 1;
    }

    pub(crate) fn record_queue_length(&mut self, queue_length: usize) {
        self.max_queue_length = self.max_queue_length.max(queue_length);
    }

    pub(crate) fn record_departure(&mut self) {
        self.customers_served += 1;
    }

    pub(crate) fn record_wait(&mut self, wait: f64) {
        self.total_wait_time += wait;
    }

    /// Mean wait over every served customer, zero when nobody has been served.
    pub fn avg_wait(&self) -> f64 {
        if self.customers_served == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let served = self.customers_served as f64;
            self.total_wait_time / served
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_intervals_add_nothing() {
        let mut stats = Statistics::default();
        stats.accumulate(5.0, 0, false);
        assert_eq!(Statistics::default(), stats);
    }

    #[test]
    fn intervals_are_weighted_by_state() {
        let mut stats = Statistics::default();
        stats.accumulate(2.0, 3, true);
        stats.accumulate(0.5, 1, true);
        stats.accumulate(4.0, 0, false);
        assert_eq!(6.5, stats.area_under_queue_length);
        assert_eq!(2.5, stats.busy_time);
    }

    #[test]
    fn average_wait_counts_unqueued_customers() {
        let mut stats = Statistics::default();
        stats.record_departure();
        stats.record_departure();
        stats.record_wait(3.0);
        assert_eq!(1.5, stats.avg_wait());
    }

    #[test]
    fn average_wait_is_zero_with_nobody_served() {
        assert_eq!(0.0, Statistics::default().avg_wait());
    }
}
