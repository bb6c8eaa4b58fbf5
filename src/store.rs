use std::{
    error::Error,
    fmt::{self, Display},
    sync::Mutex,
};

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// A producer panicked while holding the lock.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Number store lock poisoned")
    }
}

impl Error for StoreError {}

/// The one piece of state shared between the producers.
///
/// Every mutation takes the lock for a single element, so contributions from
/// different producers interleave in no particular order. Bulk reads
/// (`snapshot`, `into_inner`) are meant for after all producers are joined.
#[derive(Debug, Default)]
pub struct SharedNumberStore {
    numbers: Mutex<Vec<i64>>,
}

impl SharedNumberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, value: i64) -> Result<(), StoreError> {
        let mut numbers = self.numbers.lock().map_err(|_| StoreError::Poisoned)?;
        numbers.push(value);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let numbers = self.numbers.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(numbers.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn snapshot(&self) -> Result<Vec<i64>, StoreError> {
        let numbers = self.numbers.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(numbers.clone())
    }

    pub fn into_inner(self) -> Result<Vec<i64>, StoreError> {
        self.numbers.into_inner().map_err(|_| StoreError::Poisoned)
    }
}
