//! Lending hardware from thread mode to an interrupt handler.
//!
//! Setup code owns peripherals until it is done configuring them, then
//! donates them to a `Loan` that the ISR borrows from on every entry. The
//! busy flag makes a reentrant or concurrent borrow fail loudly instead of
//! aliasing.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

/// A slot that may hold a `T`, with exclusive borrowing enforced by an atomic
/// flag.
pub struct Loan<T> {
    busy: AtomicBool,
    contents: UnsafeCell<Option<T>>,
}

unsafe impl<T: Send> Sync for Loan<T> {}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoanError {
    /// Someone else is holding the contents right now.
    Busy,
    /// Nothing has been donated.
    Vacant,
    /// A donation was attempted while the slot was already full.
    Occupied,
}

impl<T> Loan<T> {
    pub const fn new() -> Self {
        Loan {
            busy: AtomicBool::new(false),
            contents: UnsafeCell::new(None),
        }
    }
}

impl<T: Send> Loan<T> {
    /// Places `value` in an empty slot. On failure the value is dropped.
    pub fn donate(&self, value: T) -> Result<(), LoanError> {
        let slot = self.claim()?;
        if slot.contents.is_some() {
            return Err(LoanError::Occupied);
        }
        *slot.contents = Some(value);
        Ok(())
    }

    /// Removes and returns the contents, if any.
    #[cfg(test)]
    pub(crate) fn reclaim(&self) -> Result<Option<T>, LoanError> {
        let slot = self.claim()?;
        Ok(slot.contents.take())
    }

    /// Borrows the contents until the guard is dropped.
    pub fn try_borrow(&self) -> Result<LoanGuard<T>, LoanError> {
        let Claim { busy, contents } = self.claim()?;
        match contents {
            Some(contents) => Ok(LoanGuard { busy, contents }),
            None => Err(LoanError::Vacant),
        }
    }

    fn claim(&self) -> Result<Claim<T>, LoanError> {
        if self.busy.swap(true, Ordering::Acquire) {
            Err(LoanError::Busy)
        } else {
            Ok(Claim {
                busy: Release(&self.busy),
                // Safety: we observed the false->true transition, so nobody
                // else holds a reference until `busy` is released.
                contents: unsafe { &mut *self.contents.get() },
            })
        }
    }
}

struct Claim<'a, T> {
    busy: Release<'a>,
    contents: &'a mut Option<T>,
}

#[must_use = "if dropped, the loan is immediately returned"]
pub struct LoanGuard<'a, T> {
    busy: Release<'a>,
    contents: &'a mut T,
}

/// Clears the busy flag when dropped, returning the loan. Shared by `Claim`
/// and `LoanGuard`.
struct Release<'a>(&'a AtomicBool);

impl<'a> Drop for Release<'a> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a, T> core::ops::Deref for LoanGuard<'a, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.contents
    }
}

impl<'a, T> core::ops::DerefMut for LoanGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.contents
    }
}
