/// Errors that may be encountered while configuring or executing a simulation.
///
/// The [`InvalidParameter`] and [`InvalidCapacity`] variants are configuration errors: they are raised before any
/// event executes, so a run with a bad configuration never starts.
///
/// The [`Overflow`] variant terminates a run whose waiting line outgrew its configured capacity. Dropping the arrival
/// instead would corrupt every derived statistic, so the run is abandoned and the error carries the queue length and
/// capacity at the time of failure. Re-run with a larger capacity or a lighter load.
///
/// The [`Underflow`] variant means the engine tried to take a customer from an empty waiting line. That can only
/// happen through a logical bug in the engine and should never be observed in a correct build.
///
/// [`InvalidParameter`]: Error::InvalidParameter
/// [`InvalidCapacity`]: Error::InvalidCapacity
/// [`Overflow`]: Error::Overflow
/// [`Underflow`]: Error::Underflow
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rate or the horizon was zero, negative, or not finite.
    #[error("{name} must be a positive, finite number (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },
    /// The waiting line was configured to hold no customers at all.
    #[error("waiting-line capacity must be at least 1")]
    InvalidCapacity,
    /// The waiting line is full and another customer arrived.
    #[error("waiting line overflowed: {queue_length} customers queued at capacity {capacity}; increase the capacity")]
    Overflow { queue_length: usize, capacity: usize },
    /// The engine attempted to dequeue from an empty waiting line.
    #[error("waiting line underflowed: dequeue attempted on an empty line")]
    Underflow,
    /// A scripted uniform draw fell outside the open unit interval.
    #[error("uniform draws must lie strictly between 0 and 1 (got {value})")]
    InvalidDraw { value: f64 },
    /// A scripted variate source was given nothing to replay.
    #[error("scripted variate source needs at least one draw")]
    NoDraws,
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Error::InvalidParameter { name: n1, value: v1 },
                Error::InvalidParameter { name: n2, value: v2 },
            ) => n1 == n2 && (v1 == v2 || (v1.is_nan() && v2.is_nan())),
            (Error::InvalidCapacity, Error::InvalidCapacity) => true,
            (
                Error::Overflow { queue_length: q1, capacity: c1 },
                Error::Overflow { queue_length: q2, capacity: c2 },
            ) => q1 == q2 && c1 == c2,
            (Error::Underflow, Error::Underflow) => true,
            (Error::InvalidDraw { value: v1 }, Error::InvalidDraw { value: v2 }) => {
                v1 == v2 || (v1.is_nan() && v2.is_nan())
            },
            (Error::NoDraws, Error::NoDraws) => true,
            // wrapped I/O and parse errors are compared by identity, never by content
            (Error::Io(e1), Error::Io(e2)) => std::ptr::eq(e1, e2),
            (Error::ConfigParse(e1), Error::ConfigParse(e2)) => std::ptr::eq(e1, e2),
            _ => false,
        }
    }
}

/// [`std::result::Result`]`<T, `[`mmone::Error`]`>`, defaulting `T` to `()`.
///
/// A type alias that simplifies the signatures of fallible functions in mmone.
///
/// [`mmone::Error`]: Error
pub type Result<T = ()> = std::result::Result<T, Error>;
