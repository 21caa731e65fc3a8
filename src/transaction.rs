//! Transactional Units of Work
//!
//! A [`Transaction`] wraps a unit of work run against an external
//! [`TransactionReceiver`] and owns one root [`Outcome`]. Inside the block,
//! captures append child outcomes as usual; [`Scope::rollback`] and
//! [`Scope::halt`] alter how the unit of work terminates.
//!
//! Rollback must look like a failure to the receiver (so its transaction
//! aborts) yet like a normal return to the orchestrating caller (so an
//! intentional abort is not confused with a crash). Halt is the inverse:
//! visible as an early exit to the block, invisible to the receiver. Both are
//! modeled as tagged signals ([`Error::Rollback`], [`Error::Halt`]) threaded
//! through return values and intercepted at exactly one boundary,
//! [`Transaction::call`].

use crate::attrs::{Attrs, HALTED_ATTR, ROLLED_BACK_ATTR};
use crate::error::Error;
use crate::outcome::Outcome;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Something able to run a unit of work transactionally.
///
/// The receiver must propagate an `Err` from the work to its caller unchanged
/// after performing its own abort semantics, and commit on `Ok`. The core
/// never inspects receiver internals beyond this one capability.
pub trait TransactionReceiver {
    fn transaction<F>(&mut self, work: F) -> Result<(), Error>
    where
        F: FnOnce() -> Result<(), Error>;
}

impl<T: TransactionReceiver> TransactionReceiver for &mut T {
    fn transaction<F>(&mut self, work: F) -> Result<(), Error>
    where
        F: FnOnce() -> Result<(), Error>,
    {
        (**self).transaction(work)
    }
}

/// A transactional unit of work with an owned root outcome.
///
/// `call` consumes the transaction, so it runs at most once by construction.
/// Before `call`, outcome operations are available directly through `Deref`.
pub struct Transaction<R> {
    receiver: R,
    outcome: Outcome,
}

impl<R: TransactionReceiver> Transaction<R> {
    /// Build a transaction over `receiver`. The root outcome starts as a
    /// success with the rolled-back/halted bookkeeping attributes cleared.
    pub fn new(receiver: R, attributes: Attrs) -> Self {
        let mut outcome = Outcome::success(attributes);
        outcome.set(crate::attrs! {
            ROLLED_BACK_ATTR => false,
            HALTED_ATTR => false,
        });
        Transaction { receiver, outcome }
    }

    /// Build and immediately call a transaction.
    pub fn run<F>(receiver: R, attributes: Attrs, block: F) -> Result<Outcome, Error>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), Error>,
    {
        Transaction::new(receiver, attributes).call(block)
    }

    /// Run `block` inside the receiver's transactional unit of work.
    ///
    /// A halt signal is intercepted before the receiver completes, so the
    /// receiver commits with whatever was captured. A rollback signal aborts
    /// the receiver's unit of work but is swallowed here, returning the owned
    /// outcome normally. Every other error propagates to the caller after the
    /// receiver observed the abort.
    pub fn call<F>(self, block: F) -> Result<Outcome, Error>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), Error>,
    {
        let Transaction {
            mut receiver,
            mut outcome,
        } = self;

        let run = receiver.transaction(|| {
            let mut scope = Scope {
                outcome: &mut outcome,
            };
            match block(&mut scope) {
                Err(Error::Halt) => {
                    debug!("transaction block halted; receiver commits");
                    Ok(())
                }
                other => other,
            }
        });

        match run {
            Ok(()) => Ok(outcome),
            Err(Error::Rollback) => {
                debug!("rollback intercepted at transaction boundary");
                Ok(outcome)
            }
            Err(err) => Err(err),
        }
    }
}

impl<R> Deref for Transaction<R> {
    type Target = Outcome;

    fn deref(&self) -> &Outcome {
        &self.outcome
    }
}

impl<R> DerefMut for Transaction<R> {
    fn deref_mut(&mut self) -> &mut Outcome {
        &mut self.outcome
    }
}

/// Handle a transaction block receives. Dereferences to the transaction's
/// root outcome, so every capture and query operation is available on it.
pub struct Scope<'t> {
    outcome: &'t mut Outcome,
}

impl Scope<'_> {
    /// Signal a rollback: marks the outcome rolled back and returns the
    /// signal to propagate with `?`. The receiver's unit of work aborts; the
    /// transaction's caller sees a normal return.
    pub fn rollback(&mut self) -> Result<(), Error> {
        debug!("transaction rollback signaled");
        self.outcome.set(crate::attrs! { ROLLED_BACK_ATTR => true });
        Err(Error::Rollback)
    }

    /// Signal a halt: marks the outcome halted and returns the signal to
    /// propagate with `?`. Remaining block statements are skipped; the
    /// receiver's unit of work commits normally.
    pub fn halt(&mut self) -> Result<(), Error> {
        debug!("transaction halt signaled");
        self.outcome.set(crate::attrs! { HALTED_ATTR => true });
        Err(Error::Halt)
    }
}

impl Deref for Scope<'_> {
    type Target = Outcome;

    fn deref(&self) -> &Outcome {
        self.outcome
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Outcome {
        self.outcome
    }
}
