use crate::events::{select_next, EventKind, NextEvent, Step};
use crate::{Config, DefaultVariates, Error, Report, Statistics, VariateSource, WaitingLine};

use std::fmt::{Display, Formatter};
use tracing::{debug, error, info, trace, warn};

/// Clock, server and waiting-line state of a running simulation.
///
/// Only the engine mutates this; callers get shared access through [`Simulation::state()`] for observation between
/// steps.
#[derive(Debug, Clone)]
pub struct SimulationState {
    clock: f64,
    horizon: f64,
    server_busy: bool,
    next_arrival_time: f64,
    next_departure_time: Option<f64>,
    waiting_line: WaitingLine,
    aborted: bool,
}

impl SimulationState {
    /// Current simulated time. Never decreases and never exceeds the horizon.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn server_busy(&self) -> bool {
        self.server_busy
    }

    pub fn next_arrival_time(&self) -> f64 {
        self.next_arrival_time
    }

    /// Completion time of the customer currently in service, or `None` while the server is idle.
    pub fn next_departure_time(&self) -> Option<f64> {
        self.next_departure_time
    }

    /// Number of customers waiting, not counting the one in service.
    pub fn queue_length(&self) -> usize {
        self.waiting_line.len()
    }

    pub fn waiting_line(&self) -> &WaitingLine {
        &self.waiting_line
    }

    /// Whether an error ended the run before the clock reached the horizon.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Reports whether the run is over: the clock has reached the horizon, or an error aborted the run. No further
    /// events execute either way.
    pub fn is_complete(&self) -> bool {
        self.aborted || self.clock >= self.horizon
    }
}

/// Discrete-event simulation of a single-server, first-in-first-out queue with exponential interarrival and service
/// times.
///
/// Only two events can ever be pending: the next arrival, which is always scheduled, and the next departure, which is
/// scheduled only while the server is busy. Each call to [`step()`] advances the clock to the earlier of the two (or
/// to the horizon if neither falls within it), integrates the state that held over the skipped interval, then applies
/// the event.
///
/// The expected workflow for a Simulation is:
///
/// 1. Build a [`Config`] and check it, or let [`new()`] check it.
/// 2. Pass the config and a [`VariateSource`] to [`new()`], or use [`from_config()`] for the default generator.
/// 3. Call [`run()`] and handle any error it returns, or drive the run with [`step()`] to observe every event.
/// 4. Use the returned [`Report`], or [`report()`], to process the results.
///
/// [`new()`]: Simulation::new
/// [`from_config()`]: Simulation::from_config
/// [`run()`]: Simulation::run
/// [`step()`]: Simulation::step
/// [`report()`]: Simulation::report
#[derive(Debug, Clone)]
pub struct Simulation<V> {
    state: SimulationState,
    statistics: Statistics,
    config: Config,
    variates: V,
}

impl<V> Simulation<V>
where
    V: VariateSource,
{
    /// Initialize a simulation at time zero with an idle server, an empty waiting line, and the first arrival drawn
    /// from `variates`.
    ///
    /// A stability diagnostic is logged, not returned, when the arrival rate is at least the service rate.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Config::validate()`] rejects, before drawing anything from `variates`.
    pub fn new(config: &Config, mut variates: V) -> crate::Result<Self> {
        config.validate()?;
        let waiting_line = WaitingLine::new(config.capacity)?;

        if !config.is_stable() {
            warn!(
                arrival_rate = config.arrival_rate,
                service_rate = config.service_rate,
                "arrival rate >= service rate; the queue may grow without bound"
            );
        }

        let next_arrival_time = variates.exponential_variate(config.arrival_rate);
        debug!(next_arrival_time, "first arrival scheduled");

        Ok(Self {
            state: SimulationState {
                clock: 0.0,
                horizon: config.horizon,
                server_busy: false,
                next_arrival_time,
                next_departure_time: None,
                waiting_line,
                aborted: false,
            },
            statistics: Statistics::default(),
            config: config.clone(),
            variates,
        })
    }

    /// Advance the clock by one event, or to the horizon if no further event falls within it.
    ///
    /// Returns `Ok(None)` once the clock has reached the horizon, and for every call after an error.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if an arriving customer finds the waiting line at capacity. The run is aborted at that
    /// point: the clock stays at the failed arrival, the customer is not counted as an arrival, and later calls return
    /// `Ok(None)` without touching the state or the statistics.
    pub fn step(&mut self) -> crate::Result<Option<Step>> {
        if self.state.is_complete() {
            return Ok(None);
        }

        let prior_queue_length = self.state.queue_length();
        let prior_server_busy = self.state.server_busy;

        let next = select_next(
            self.state.next_arrival_time,
            self.state.next_departure_time,
            self.state.horizon,
        );
        let (event, elapsed) = match next {
            NextEvent::Arrival(time) => {
                let elapsed = self.advance_to(time);
                self.arrive().map_err(|e| self.abort(e))?;
                (EventKind::Arrival, elapsed)
            },
            NextEvent::Departure(time) => {
                let elapsed = self.advance_to(time);
                self.depart().map_err(|e| self.abort(e))?;
                (EventKind::Departure, elapsed)
            },
            NextEvent::Horizon(time) => (EventKind::Horizon, self.advance_to(time)),
        };

        let step = Step {
            event,
            clock: self.state.clock,
            elapsed,
            prior_queue_length,
            prior_server_busy,
            queue_length: self.state.queue_length(),
            server_busy: self.state.server_busy,
        };
        trace!(
            %event,
            clock = step.clock,
            queue_length = step.queue_length,
            server_busy = step.server_busy,
            "processed event"
        );
        Ok(Some(step))
    }

    /// Execute events until the clock reaches the horizon, then summarize the run.
    ///
    /// # Errors
    ///
    /// Any error from [`step()`] halts the run and is passed back unchanged.
    ///
    /// [`step()`]: Simulation::step
    pub fn run(&mut self) -> crate::Result<Report> {
        let span = tracing::info_span!(
            "simulation",
            arrival_rate = self.config.arrival_rate,
            service_rate = self.config.service_rate,
            horizon = self.state.horizon,
        );
        let _entered = span.enter();
        info!("simulation started");

        let mut events_processed: u64 = 0;
        loop {
            match self.step() {
                Ok(Some(_)) => events_processed += 1,
                Ok(None) => break,
                Err(e) => {
                    error!(clock = self.state.clock, error = %e, "simulation aborted");
                    return Err(e);
                },
            }
        }

        let report = self.report();
        info!(
            final_time = report.duration,
            events_processed,
            customers_served = report.customers_served,
            "simulation completed"
        );
        Ok(report)
    }

    /// Integrate the current state over `[clock, time)` and move the clock to `time`. Returns the interval length.
    fn advance_to(&mut self, time: f64) -> f64 {
        let elapsed = time - self.state.clock;
        self.statistics
            .accumulate(elapsed, self.state.queue_length(), self.state.server_busy);
        self.state.clock = time;
        elapsed
    }

    /// Mark the run as over so that no further event executes, then hand the error back.
    fn abort(&mut self, error: Error) -> Error {
        self.state.aborted = true;
        error
    }

    fn arrive(&mut self) -> crate::Result {
        if self.state.server_busy {
            self.state.waiting_line.enqueue(self.state.clock)?;
            self.statistics.record_queue_length(self.state.queue_length());
        } else {
            // served on arrival; a zero wait adds nothing to the total
            self.state.server_busy = true;
            self.begin_service();
        }
        self.statistics.record_arrival();

        self.state.next_arrival_time = self.state.clock + self.variates.exponential_variate(self.config.arrival_rate);
        Ok(())
    }

    fn depart(&mut self) -> crate::Result {
        self.statistics.record_departure();

        if self.state.waiting_line.is_empty() {
            self.state.server_busy = false;
            self.state.next_departure_time = None;
        } else {
            let arrival_time = self.state.waiting_line.dequeue()?;
            self.statistics.record_wait(self.state.clock - arrival_time);
            self.begin_service();
        }
        Ok(())
    }

    fn begin_service(&mut self) {
        let service_time = self.variates.exponential_variate(self.config.service_rate);
        self.state.next_departure_time = Some(self.state.clock + service_time);
    }
}

impl<V> Simulation<V> {
    /// Summarize the run so far. Reading a report has no effect on the simulation.
    pub fn report(&self) -> Report {
        let duration = self.state.clock;
        let per_unit_time = |total: f64| if duration > 0.0 { total / duration } else { 0.0 };

        #[allow(clippy::cast_precision_loss)]
        let served = self.statistics.customers_served as f64;
        Report {
            arrival_rate: self.config.arrival_rate,
            service_rate: self.config.service_rate,
            offered_load: self.config.offered_load(),
            duration,
            arrivals: self.statistics.arrivals,
            customers_served: self.statistics.customers_served,
            max_queue_length: self.statistics.max_queue_length,
            avg_wait: self.statistics.avg_wait(),
            avg_queue_length: per_unit_time(self.statistics.area_under_queue_length),
            utilization: per_unit_time(self.statistics.busy_time),
            throughput: per_unit_time(served),
            stability_warning: !self.config.is_stable(),
        }
    }

    /// Get a shared reference to the clock, server and waiting-line state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Get a shared reference to the running statistics.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Reports whether the clock has reached the horizon or an error aborted the run.
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Get a shared reference to the variate source.
    pub fn variates(&self) -> &V {
        &self.variates
    }

    /// Consume the simulation and hand back its variate source.
    pub fn into_variates(self) -> V {
        self.variates
    }
}

impl Simulation<DefaultVariates> {
    /// Initialize a simulation drawing from a [`Pcg64`](rand_pcg::Pcg64) generator, seeded from `config.seed` when
    /// present and from entropy otherwise.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Config::validate()`] rejects.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let variates = match config.seed {
            Some(seed) => DefaultVariates::seeded(seed),
            None => DefaultVariates::from_entropy(),
        };
        Self::new(config, variates)
    }
}

impl<V> Display for Simulation<V> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation at time {:?}", self.state.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ScriptedVariates};

    /// Draws that make every exponential duration exactly what's listed, at the rates used by `config()`.
    fn scripted(durations: &[(f64, f64)]) -> ScriptedVariates {
        ScriptedVariates::from_durations(durations.iter().copied()).unwrap()
    }

    fn config() -> Config {
        Config::new(0.5, 1.0, 100.0)
    }

    #[test]
    fn new_simulation_starts_idle() {
        let sim = Simulation::new(&config(), scripted(&[(2.0, 0.5)])).unwrap();
        let state = sim.state();
        assert_eq!(0.0, state.clock());
        assert!(!state.server_busy());
        assert_eq!(None, state.next_departure_time());
        assert!((state.next_arrival_time() - 2.0).abs() < 1e-9);
        assert_eq!(0, state.queue_length());
        assert_eq!("Simulation at time 0.0", sim.to_string());
    }

    #[test]
    fn invalid_config_draws_nothing() {
        let mut source = scripted(&[(2.0, 0.5)]);
        let err = Simulation::new(&Config::new(0.5, 0.0, 100.0), &mut source).unwrap_err();
        assert_eq!(
            Error::InvalidParameter {
                name: "service_rate",
                value: 0.0
            },
            err
        );
        assert_eq!(0, source.draws_taken());
    }

    #[test]
    fn arrival_to_idle_server_starts_service() {
        let mut sim = Simulation::new(&config(), scripted(&[(2.0, 0.5), (3.0, 1.0), (1.0, 0.5)])).unwrap();
        let step = sim.step().unwrap().unwrap();

        assert_eq!(EventKind::Arrival, step.event);
        assert!(step.server_busy && !step.prior_server_busy);
        assert_eq!(0, step.queue_length);
        let departure = sim.state().next_departure_time().unwrap();
        assert!((departure - 5.0).abs() < 1e-9);
        assert!((sim.state().next_arrival_time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn arrival_to_busy_server_joins_line() {
        let mut sim = Simulation::new(
            &config(),
            scripted(&[(2.0, 0.5), (3.0, 1.0), (1.0, 0.5), (4.0, 0.5)]),
        )
        .unwrap();
        sim.step().unwrap();
        let step = sim.step().unwrap().unwrap();

        assert_eq!(EventKind::Arrival, step.event);
        assert_eq!(1, step.queue_length);
        assert!((sim.state().waiting_line().front().unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(1, sim.statistics().max_queue_length);
        assert_eq!(2, sim.statistics().arrivals);
    }

    #[test]
    fn departure_past_horizon_never_executes() {
        let config = Config::new(0.5, 1.0, 4.0);
        // arrival at 2, service until 10, next arrival at 12
        let mut sim = Simulation::new(&config, scripted(&[(2.0, 0.5), (8.0, 1.0), (10.0, 0.5)])).unwrap();
        sim.step().unwrap();
        let step = sim.step().unwrap().unwrap();

        assert_eq!(EventKind::Horizon, step.event);
        assert_eq!(4.0, step.clock);
        assert!(step.server_busy, "truncation applied the departure");
        assert_eq!(0, sim.statistics().customers_served);
        assert!((sim.statistics().busy_time - 2.0).abs() < 1e-9);
        assert_eq!(None, sim.step().unwrap());
        assert!(sim.is_complete());
    }

    #[test]
    fn full_line_aborts_run() {
        let config = Config::new(10.0, 0.1, 1000.0).with_capacity(1);
        let mut sim = Simulation::new(&config, ScriptedVariates::new([0.5]).unwrap()).unwrap();

        let err = sim.run().unwrap_err();
        assert_eq!(
            Error::Overflow {
                queue_length: 1,
                capacity: 1
            },
            err
        );
        assert_eq!(1, sim.state().queue_length());
        assert!(sim.state().is_aborted());
        assert!(sim.is_complete());
    }

    #[test]
    fn stepping_after_overflow_changes_nothing() {
        let config = Config::new(10.0, 0.1, 1000.0).with_capacity(1);
        let mut sim = Simulation::new(&config, ScriptedVariates::new([0.5]).unwrap()).unwrap();
        assert!(sim.run().is_err());

        // the customer turned away by the full line is not an arrival
        let stats = sim.statistics().clone();
        assert_eq!(2, stats.arrivals);
        assert_eq!(
            stats.arrivals,
            stats.customers_served + sim.state().queue_length() as u64 + u64::from(sim.state().server_busy())
        );

        let clock = sim.state().clock();
        let draws = sim.variates().draws_taken();
        for _ in 0..3 {
            assert_eq!(None, sim.step().unwrap(), "aborted run executed another event");
        }
        assert_eq!(&stats, sim.statistics());
        assert_eq!(clock, sim.state().clock());
        assert_eq!(draws, sim.into_variates().draws_taken(), "aborted run drew more variates");
    }

    #[test]
    fn report_before_any_event_is_finite() {
        let sim = Simulation::new(&config(), scripted(&[(2.0, 0.5)])).unwrap();
        let report = sim.report();
        assert_eq!(0.0, report.duration);
        assert_eq!(0.0, report.avg_queue_length);
        assert_eq!(0.0, report.utilization);
        assert_eq!(0.0, report.throughput);
    }

    #[test]
    fn seeded_runs_agree() {
        let config = config().with_seed(7);
        let first = Simulation::from_config(&config).unwrap().run().unwrap();
        let second = Simulation::from_config(&config).unwrap().run().unwrap();
        assert_eq!(first, second);
    }
}
