use crate::Error;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

/// A source of independent random durations for scheduling arrivals and service completions.
///
/// Implementors provide [`uniform_variate()`], which must return a value strictly inside the open interval (0, 1).
/// Exponential durations are derived from it by inversion, `-ln(U) / rate`, and the open interval keeps the logarithm
/// finite: `U` of exactly 0 would yield an infinite duration and `U` of exactly 1 a zero-length one.
///
/// The engine holds its source by value, so a test can hand it a [`ScriptedVariates`] or a seeded [`RngVariates`]
/// without touching any process-wide state. A `&mut` reference to a source is also a source, which lets a caller lend
/// one to an engine and inspect it afterwards.
///
/// [`uniform_variate()`]: VariateSource::uniform_variate
pub trait VariateSource {
    /// Draw a uniform value from the open interval (0, 1), advancing the underlying generator.
    fn uniform_variate(&mut self) -> f64;

    /// Draw an exponentially distributed duration with the given rate, i.e. with mean `1 / rate`.
    ///
    /// Calling this with `rate <= 0` is a contract violation; debug builds will panic on it. The engine only passes
    /// rates that have already been validated.
    fn exponential_variate(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0, "exponential rate must be positive, got {rate}");
        -self.uniform_variate().ln() / rate
    }
}

impl<V> VariateSource for &mut V
where
    V: VariateSource + ?Sized,
{
    fn uniform_variate(&mut self) -> f64 {
        (**self).uniform_variate()
    }
}

/// Map a raw 32-bit draw into the open unit interval. The shift by one on both sides of the ratio keeps the result
/// away from 0 and 1 even for the extreme raw values.
fn open_unit(raw: u32) -> f64 {
    (f64::from(raw) + 1.0) / (f64::from(u32::MAX) + 2.0)
}

/// A [`VariateSource`] backed by any pseudo-random generator from the [`rand`] ecosystem.
#[derive(Debug, Clone)]
pub struct RngVariates<R> {
    rng: R,
}

impl<R> RngVariates<R>
where
    R: RngCore,
{
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Get an exclusive reference to the wrapped generator.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Unwrap the generator, e.g. to continue drawing from it after a run.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngVariates<Pcg64> {
    /// A [`Pcg64`]-backed source that reproduces the same draws for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg64::seed_from_u64(seed))
    }

    /// A [`Pcg64`]-backed source seeded once from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(Pcg64::from_rng(&mut rand::rng()))
    }
}

impl<R> VariateSource for RngVariates<R>
where
    R: RngCore,
{
    fn uniform_variate(&mut self) -> f64 {
        open_unit(self.rng.next_u32())
    }
}

/// The generator used when a caller does not supply one.
pub type DefaultVariates = RngVariates<Pcg64>;

/// A [`VariateSource`] that replays a fixed sequence of uniform draws, wrapping around to the start once exhausted.
///
/// Substituting one of these for a real generator makes the full event trace of a run reproducible by hand.
#[derive(Debug, Clone)]
pub struct ScriptedVariates {
    draws: Vec<f64>,
    next: usize,
    taken: usize,
}

impl ScriptedVariates {
    /// Build a source from the given draws.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDraws`] if `draws` is empty, or [`Error::InvalidDraw`] for the first draw that does not lie
    /// strictly between 0 and 1.
    pub fn new<I>(draws: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let draws: Vec<f64> = draws.into_iter().collect();
        if draws.is_empty() {
            return Err(Error::NoDraws);
        }
        if let Some(&value) = draws.iter().find(|&&u| !(u > 0.0 && u < 1.0)) {
            return Err(Error::InvalidDraw { value });
        }

        Ok(Self {
            draws,
            next: 0,
            taken: 0,
        })
    }

    /// Build a source whose exponential draws at the matching rates come out as the given durations.
    ///
    /// Each `(duration, rate)` pair is converted to the uniform `exp(-duration * rate)`, the inverse of
    /// [`VariateSource::exponential_variate`].
    ///
    /// # Errors
    ///
    /// Same as [`new()`](ScriptedVariates::new); a non-positive duration maps onto a draw of 1 or more and is
    /// rejected.
    pub fn from_durations<I>(durations: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(durations.into_iter().map(|(duration, rate)| (-duration * rate).exp()))
    }

    /// Number of draws handed out so far, counting repeats after wrap-around.
    pub fn draws_taken(&self) -> usize {
        self.taken
    }
}

impl VariateSource for ScriptedVariates {
    fn uniform_variate(&mut self) -> f64 {
        let value = self.draws[self.next];
        self.next = (self.next + 1) % self.draws.len();
        self.taken += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_unit_excludes_endpoints() {
        let low = open_unit(0);
        let high = open_unit(u32::MAX);
        assert!(low > 0.0, "lowest raw draw mapped to {low}");
        assert!(high < 1.0, "highest raw draw mapped to {high}");
        assert!(low < high);
    }

    #[test]
    fn exponential_is_inverse_of_uniform() {
        let mut source = ScriptedVariates::new([0.5]).unwrap();
        let duration = source.exponential_variate(2.0);
        assert!((duration - std::f64::consts::LN_2 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn scripted_source_cycles() {
        let mut source = ScriptedVariates::new([0.25, 0.75]).unwrap();
        let drawn: Vec<f64> = (0..5).map(|_| source.uniform_variate()).collect();
        assert_eq!(vec![0.25, 0.75, 0.25, 0.75, 0.25], drawn);
        assert_eq!(5, source.draws_taken());
    }

    #[test]
    fn scripted_source_rejects_closed_endpoints() {
        assert_eq!(Error::InvalidDraw { value: 1.0 }, ScriptedVariates::new([0.5, 1.0]).unwrap_err());
        assert_eq!(Error::InvalidDraw { value: 0.0 }, ScriptedVariates::new([0.0]).unwrap_err());
        assert_eq!(Error::NoDraws, ScriptedVariates::new(Vec::new()).unwrap_err());
    }

    #[test]
    fn scripted_durations_round_trip_through_exponential() {
        let mut source = ScriptedVariates::from_durations([(3.0, 0.5), (0.25, 4.0)]).unwrap();
        assert!((source.exponential_variate(0.5) - 3.0).abs() < 1e-9);
        assert!((source.exponential_variate(4.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn seeded_sources_agree() {
        let mut a = RngVariates::seeded(42);
        let mut b = RngVariates::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.uniform_variate(), b.uniform_variate());
        }
    }

    #[test]
    fn wrapped_generator_stays_in_step() {
        let mut source = RngVariates::seeded(8);
        let mut reference = Pcg64::seed_from_u64(8);

        assert_eq!(open_unit(reference.next_u32()), source.uniform_variate());
        assert_eq!(reference.next_u32(), source.rng_mut().next_u32());
        assert_eq!(reference, source.into_inner());
    }

    #[test]
    fn lent_source_keeps_its_position() {
        fn draw_twice<V: VariateSource>(mut source: V) {
            source.uniform_variate();
            source.uniform_variate();
        }

        let mut source = ScriptedVariates::new([0.1, 0.2, 0.3]).unwrap();
        draw_twice(&mut source);
        assert_eq!(2, source.draws_taken());
        assert_eq!(0.3, source.uniform_variate());
    }
}
