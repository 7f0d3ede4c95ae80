use std::fmt::{Display, Formatter};

/// What happened during one advance of the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A customer arrived and either went straight to the server or joined the waiting line.
    Arrival,
    /// The customer at the server finished service and left.
    Departure,
    /// Nothing else could happen before the horizon, so the clock ran out to it. Any event scheduled past the horizon
    /// is left unexecuted.
    Horizon,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Arrival => "arrival",
            Self::Departure => "departure",
            Self::Horizon => "horizon",
        };
        f.write_str(name)
    }
}

/// Record of a single clock advance.
///
/// The `prior_*` fields describe the state that held over the interval `[clock - elapsed, clock)` and so are the
/// values that got integrated into the running statistics. The other two fields describe the state after the event
/// was applied. Summing `elapsed * prior_queue_length` over every step of a run reproduces the engine's
/// queue-length integral; summing `elapsed` over the busy steps reproduces its busy time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub event: EventKind,
    /// Clock value after this step.
    pub clock: f64,
    /// Length of the interval this step advanced over.
    pub elapsed: f64,
    pub prior_queue_length: usize,
    pub prior_server_busy: bool,
    pub queue_length: usize,
    pub server_busy: bool,
}

/// The next thing the engine will do, chosen by comparing the two scheduled timestamps against each other and
/// against the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NextEvent {
    Arrival(f64),
    Departure(f64),
    /// Advance to the horizon with no state transition.
    Horizon(f64),
}

/// Select the next event.
///
/// An arrival wins ties with a departure, and an arrival exactly at the horizon still executes. A departure
/// scheduled past the horizon never executes, and neither does an arrival past the horizon when the server is idle.
pub(crate) fn select_next(next_arrival: f64, next_departure: Option<f64>, horizon: f64) -> NextEvent {
    let arrival_first = next_departure.map_or(true, |departure| next_arrival <= departure);
    if arrival_first && next_arrival <= horizon {
        return NextEvent::Arrival(next_arrival);
    }

    match next_departure {
        Some(departure) if departure <= horizon => NextEvent::Departure(departure),
        _ => NextEvent::Horizon(horizon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_event_is_selected() {
        assert_eq!(NextEvent::Arrival(1.0), select_next(1.0, Some(2.0), 10.0));
        assert_eq!(NextEvent::Departure(2.0), select_next(3.0, Some(2.0), 10.0));
    }

    #[test]
    fn arrival_wins_a_tie() {
        assert_eq!(NextEvent::Arrival(2.0), select_next(2.0, Some(2.0), 10.0));
    }

    #[test]
    fn idle_server_waits_for_arrival() {
        assert_eq!(NextEvent::Arrival(4.0), select_next(4.0, None, 10.0));
    }

    #[test]
    fn arrival_at_horizon_executes() {
        assert_eq!(NextEvent::Arrival(10.0), select_next(10.0, Some(12.0), 10.0));
    }

    #[test]
    fn events_past_horizon_are_truncated() {
        assert_eq!(NextEvent::Horizon(10.0), select_next(11.0, Some(12.0), 10.0));
        assert_eq!(NextEvent::Horizon(10.0), select_next(12.0, Some(11.0), 10.0));
        assert_eq!(NextEvent::Horizon(10.0), select_next(11.0, None, 10.0));
    }

    #[test]
    fn departure_before_horizon_runs_even_if_arrival_is_past_it() {
        assert_eq!(NextEvent::Departure(9.0), select_next(11.0, Some(9.0), 10.0));
    }
}
