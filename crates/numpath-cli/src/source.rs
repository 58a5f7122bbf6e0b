use numpath_core::RandomSource;
use rand::Rng;

/// Adapts any `rand` generator to the engine's random source
pub struct RandSource<R>(pub R);

impl<R: Rng> RandomSource for RandSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}
