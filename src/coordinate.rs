use log::{debug, info};
use std::{
    error::Error,
    fmt::{self, Display},
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use crate::{
    generate::{RandomGenerator, ValueSource},
    ingest::{FileIngestor, MalformedToken},
    report::Reporter,
    store::{SharedNumberStore, StoreError},
};

const INGESTOR_THREAD: &str = "file-ingestor";
const GENERATOR_THREAD: &str = "random-generator";

/// Asks both producers to stop at their next element. Handed to each worker
/// explicitly; there is no process-wide flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Sorting,
    Reporting,
}

#[derive(Debug)]
pub enum CoordinatorError {
    Spawn(io::Error),
    WorkerPanicked(&'static str),
    StoreStillShared,
    Store(StoreError),
    Report(io::Error),
    Cancelled,
}

impl Display for CoordinatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoordinatorError::Spawn(e) => write!(f, "Failed to spawn worker thread: {e}"),
            CoordinatorError::WorkerPanicked(name) => write!(f, "Worker {name} panicked"),
            CoordinatorError::StoreStillShared => {
                write!(f, "Number store still shared after both workers finished")
            }
            CoordinatorError::Store(e) => write!(f, "{e}"),
            CoordinatorError::Report(e) => write!(f, "Failed to write report: {e}"),
            CoordinatorError::Cancelled => write!(f, "Interrupted before both workers finished"),
        }
    }
}

impl Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CoordinatorError::Spawn(e) | CoordinatorError::Report(e) => Some(e),
            CoordinatorError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CoordinatorError {
    fn from(e: StoreError) -> Self {
        CoordinatorError::Store(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    pub sorted: Vec<i64>,
    pub from_file: Vec<i64>,
    pub malformed: Vec<MalformedToken>,
    pub generated: usize,
}

pub fn sort_numbers(numbers: &mut [i64]) {
    numbers.sort_unstable();
}

pub struct Coordinator {
    cancel: CancellationToken,
    phase: Option<Phase>,
}

impl Coordinator {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            phase: None,
        }
    }

    /// `None` until `run` starts.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Coordinator {:?} -> {:?}", self.phase, phase);
        self.phase = Some(phase);
    }

    /// Runs both producers on their own threads, waits for both, then sorts
    /// and reports. Nothing is read from the store before both are joined.
    pub fn run<S, W>(
        &mut self,
        ingestor: FileIngestor,
        generator: RandomGenerator<S>,
        reporter: &Reporter,
        out: &mut W,
    ) -> Result<SortOutcome, CoordinatorError>
    where
        S: ValueSource + Send + 'static,
        W: Write,
    {
        self.enter(Phase::Collecting);
        info!(
            "Reading numbers from {} while generating {} numbers in [1, {}]",
            ingestor.path().display(),
            generator.params().count(),
            generator.params().max_value()
        );
        let store = Arc::new(SharedNumberStore::new());

        let ingest_handle = {
            let store = store.clone();
            let cancel = self.cancel.clone();
            thread::Builder::new()
                .name(INGESTOR_THREAD.into())
                .spawn(move || ingestor.run(&store, &cancel))
                .map_err(CoordinatorError::Spawn)?
        };

        let generate_handle = {
            let store = store.clone();
            let cancel = self.cancel.clone();
            thread::Builder::new()
                .name(GENERATOR_THREAD.into())
                .spawn(move || generator.run(&store, &cancel))
        };
        let generate_handle = match generate_handle {
            Ok(handle) => handle,
            Err(e) => {
                self.cancel.cancel();
                let _ = ingest_handle.join();
                return Err(CoordinatorError::Spawn(e));
            }
        };

        let ingested = ingest_handle.join();
        let generated = generate_handle.join();
        let report = ingested.map_err(|_| CoordinatorError::WorkerPanicked(INGESTOR_THREAD))??;
        let generated =
            generated.map_err(|_| CoordinatorError::WorkerPanicked(GENERATOR_THREAD))??;

        if self.cancel.is_cancelled() {
            info!("Run cancelled, discarding collected numbers");
            return Err(CoordinatorError::Cancelled);
        }

        self.enter(Phase::Sorting);
        let store = Arc::try_unwrap(store).map_err(|_| CoordinatorError::StoreStillShared)?;
        let mut numbers = store.into_inner()?;
        debug_assert_eq!(numbers.len(), report.values.len() + generated);
        sort_numbers(&mut numbers);
        info!(
            "Sorted {} numbers ({} from file, {} generated)",
            numbers.len(),
            report.values.len(),
            generated
        );

        self.enter(Phase::Reporting);
        let outcome = SortOutcome {
            sorted: numbers,
            from_file: report.values,
            malformed: report.malformed,
            generated,
        };
        reporter
            .write(&outcome, out)
            .map_err(CoordinatorError::Report)?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{sort_numbers, CancellationToken, Coordinator, CoordinatorError, Phase};
    use crate::{
        generate::{GenerationParams, RandomGenerator, ScriptedSource},
        ingest::{FileIngestor, MalformedPolicy},
        report::Reporter,
    };
    use eyre::Result;
    use std::{fs, io, path::Path};
    use tempdir::TempDir;

    fn ingestor_for(dir: &Path, content: &str) -> Result<FileIngestor> {
        let path = dir.join("numbers.txt");
        fs::write(&path, content)?;
        Ok(FileIngestor::new(path, "txt", MalformedPolicy::Stop)?)
    }

    #[test]
    fn file_and_scripted_generator_are_merged_and_sorted() -> Result<()> {
        let dir = TempDir::new("coordinate")?;
        let ingestor = ingestor_for(dir.path(), "5 3 8")?;
        let generator = RandomGenerator::with_source(
            GenerationParams::new(2, 10)?,
            ScriptedSource::new(vec![1, 9]),
        );

        let mut coordinator = Coordinator::new(CancellationToken::new());
        assert_eq!(coordinator.phase(), None);
        let mut out = Vec::new();
        let outcome = coordinator.run(ingestor, generator, &Reporter::new(false), &mut out)?;

        assert_eq!(outcome.sorted, vec![1, 3, 5, 8, 9]);
        assert_eq!(outcome.from_file, vec![5, 3, 8]);
        assert_eq!(outcome.generated, 2);
        assert_eq!(coordinator.phase(), Some(Phase::Reporting));
        assert!(String::from_utf8(out)?.contains("1 3 5 8 9"));
        Ok(())
    }

    #[test]
    fn result_is_sorted_multiset_union() -> Result<()> {
        let dir = TempDir::new("coordinate")?;
        let file_values: Vec<i64> = (0..1_000).map(|i| (i * 7919) % 503 - 250).collect();
        let content = file_values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let generated_values: Vec<i64> = (0..1_000).map(|i| i % 50 + 1).collect();

        let ingestor = ingestor_for(dir.path(), &content)?;
        let generator = RandomGenerator::with_source(
            GenerationParams::new(generated_values.len(), 50)?,
            ScriptedSource::new(generated_values.clone()),
        );
        let mut coordinator = Coordinator::new(CancellationToken::new());
        let outcome =
            coordinator.run(ingestor, generator, &Reporter::new(false), &mut io::sink())?;

        let mut expected: Vec<i64> = file_values.into_iter().chain(generated_values).collect();
        expected.sort();
        assert_eq!(outcome.sorted.len(), 2_000);
        assert_eq!(outcome.sorted, expected);
        Ok(())
    }

    #[test]
    fn missing_file_sorts_generated_numbers_only() -> Result<()> {
        let dir = TempDir::new("coordinate")?;
        let ingestor =
            FileIngestor::new(dir.path().join("missing.txt"), "txt", MalformedPolicy::Stop)?;
        let generator = RandomGenerator::from_entropy(GenerationParams::new(200, 3000)?);
        let mut coordinator = Coordinator::new(CancellationToken::new());
        let outcome =
            coordinator.run(ingestor, generator, &Reporter::new(false), &mut io::sink())?;

        assert!(outcome.from_file.is_empty());
        assert_eq!(outcome.sorted.len(), 200);
        assert!(outcome.sorted.windows(2).all(|w| w[0] <= w[1]));
        assert!(outcome.sorted.iter().all(|v| (1..=3000).contains(v)));
        Ok(())
    }

    #[test]
    fn cancelled_run_discards_results() -> Result<()> {
        let dir = TempDir::new("coordinate")?;
        let ingestor = ingestor_for(dir.path(), "5 3 8")?;
        let generator = RandomGenerator::from_entropy(GenerationParams::new(200, 3000)?);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut coordinator = Coordinator::new(cancel);
        let mut out = Vec::new();
        let result = coordinator.run(ingestor, generator, &Reporter::new(false), &mut out);
        assert!(matches!(result, Err(CoordinatorError::Cancelled)));
        assert_eq!(coordinator.phase(), Some(Phase::Collecting));
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn panicking_worker_is_reported() -> Result<()> {
        let dir = TempDir::new("coordinate")?;
        let ingestor = ingestor_for(dir.path(), "5 3 8")?;
        // Asks for more values than the script holds.
        let generator = RandomGenerator::with_source(
            GenerationParams::new(3, 10)?,
            ScriptedSource::new(vec![1]),
        );
        let mut coordinator = Coordinator::new(CancellationToken::new());
        let result =
            coordinator.run(ingestor, generator, &Reporter::new(false), &mut io::sink());
        assert!(matches!(
            result,
            Err(CoordinatorError::WorkerPanicked("random-generator"))
        ));
        Ok(())
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut once = vec![9, -1, 3, 3, 0, 12];
        sort_numbers(&mut once);
        let mut twice = once.clone();
        sort_numbers(&mut twice);
        assert_eq!(once, vec![-1, 0, 3, 3, 9, 12]);
        assert_eq!(once, twice);
    }
}
