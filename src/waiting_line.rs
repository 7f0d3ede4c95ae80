use crate::Error;

use std::collections::VecDeque;

/// Capacity used when a configuration does not name one. Large enough that only a badly overloaded run can reach it.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// First-in-first-out line of customers waiting for the server.
///
/// Customers are anonymous; the only thing remembered about each one is the simulated time at which it joined the
/// line, which is all the engine needs to attribute a wait when the customer reaches the server. Insertion order,
/// arrival order and service order are the same thing here: there is no reordering, no random access and no removal
/// other than from the head.
///
/// The line holds at most `capacity` customers. Reaching that bound is treated as a configuration problem rather than
/// something to recover from, so [`enqueue()`] fails instead of dropping the arrival.
///
/// [`enqueue()`]: WaitingLine::enqueue
#[derive(Debug, Clone)]
pub struct WaitingLine {
    arrival_times: VecDeque<f64>,
    capacity: usize,
}

impl WaitingLine {
    /// Construct an empty line that holds at most `capacity` customers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> crate::Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        Ok(Self {
            arrival_times: VecDeque::new(),
            capacity,
        })
    }

    /// Append a customer who arrived at `arrival_time` to the tail of the line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] without modifying the line if it is already at capacity.
    pub fn enqueue(&mut self, arrival_time: f64) -> crate::Result {
        if self.arrival_times.len() >= self.capacity {
            return Err(Error::Overflow {
                queue_length: self.arrival_times.len(),
                capacity: self.capacity,
            });
        }

        self.arrival_times.push_back(arrival_time);
        Ok(())
    }

    /// Remove the customer at the head of the line and return their arrival time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the line is empty.
    pub fn dequeue(&mut self) -> crate::Result<f64> {
        self.arrival_times.pop_front().ok_or(Error::Underflow)
    }

    /// Arrival time of the customer at the head of the line, if any.
    pub fn front(&self) -> Option<f64> {
        self.arrival_times.front().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.arrival_times.is_empty()
    }

    /// Number of customers currently waiting.
    pub fn len(&self) -> usize {
        self.arrival_times.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for WaitingLine {
    fn default() -> Self {
        Self {
            arrival_times: VecDeque::new(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
