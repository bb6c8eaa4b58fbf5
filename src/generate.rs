use log::{debug, trace};
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

use crate::{
    coordinate::CancellationToken,
    store::{SharedNumberStore, StoreError},
    validate::UsageError,
};

/// How many values to draw and the inclusive upper bound; the lower bound is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    count: usize,
    max_value: i64,
}

impl GenerationParams {
    pub fn new(count: usize, max_value: i64) -> Result<Self, UsageError> {
        if max_value < 1 {
            return Err(UsageError::InvalidMaxValue(max_value));
        }
        Ok(Self { count, max_value })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn max_value(&self) -> i64 {
        self.max_value
    }
}

pub trait ValueSource {
    fn draw(&mut self) -> i64;
}

pub struct UniformSource<R: Rng> {
    rng: R,
    range: Uniform<i64>,
}

impl<R: Rng> UniformSource<R> {
    pub fn new(rng: R, params: GenerationParams) -> Self {
        Self {
            rng,
            range: Uniform::new_inclusive(1, params.max_value),
        }
    }
}

impl<R: Rng> ValueSource for UniformSource<R> {
    fn draw(&mut self) -> i64 {
        self.range.sample(&mut self.rng)
    }
}

pub struct RandomGenerator<S: ValueSource> {
    params: GenerationParams,
    source: S,
}

impl RandomGenerator<UniformSource<StdRng>> {
    /// Seeded once from the OS; runs are not reproducible.
    pub fn from_entropy(params: GenerationParams) -> Self {
        Self::with_source(params, UniformSource::new(StdRng::from_entropy(), params))
    }
}

impl<S: ValueSource> RandomGenerator<S> {
    pub fn with_source(params: GenerationParams, source: S) -> Self {
        Self { params, source }
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Returns how many values were appended, which is `count` unless cancelled.
    pub fn run(
        mut self,
        store: &SharedNumberStore,
        cancel: &CancellationToken,
    ) -> Result<usize, StoreError> {
        let mut generated = 0;
        for _ in 0..self.params.count {
            if cancel.is_cancelled() {
                debug!("Generation cancelled after {} numbers", generated);
                break;
            }
            let value = self.source.draw();
            store.append(value)?;
            trace!("Generated number {}", value);
            generated += 1;
        }
        debug!(
            "Generated {} numbers in [1, {}]",
            generated, self.params.max_value
        );
        Ok(generated)
    }
}

/// Replays fixed values so tests can pin the generator output.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    values: std::vec::IntoIter<i64>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(values: Vec<i64>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }
}

#[cfg(test)]
impl ValueSource for ScriptedSource {
    fn draw(&mut self) -> i64 {
        self.values.next().expect("scripted source exhausted")
    }
}
