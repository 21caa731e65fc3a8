//! Shared test utilities for integration tests

use upshot::{Error, TransactionReceiver};

/// Transaction receiver double recording what it observed.
///
/// An `Err` from the unit of work counts as an abort and is returned
/// unchanged; `Ok` counts as a commit. Mirrors the contract a storage-backed
/// receiver honors.
#[derive(Debug, Default)]
pub struct RecordingReceiver {
    pub begun: usize,
    pub committed: usize,
    pub aborted: usize,
}

impl TransactionReceiver for RecordingReceiver {
    fn transaction<F>(&mut self, work: F) -> Result<(), Error>
    where
        F: FnOnce() -> Result<(), Error>,
    {
        self.begun += 1;
        match work() {
            Ok(()) => {
                self.committed += 1;
                Ok(())
            }
            Err(err) => {
                self.aborted += 1;
                Err(err)
            }
        }
    }
}

/// Receiver double that fails its own unit of work, e.g. a commit error.
#[derive(Debug, Default)]
pub struct FailingReceiver;

impl TransactionReceiver for FailingReceiver {
    fn transaction<F>(&mut self, work: F) -> Result<(), Error>
    where
        F: FnOnce() -> Result<(), Error>,
    {
        work()?;
        Err(Error::Receiver("commit refused".to_string()))
    }
}
