//! Type-level representation of execution priorities.
//!
//! All the priority types are zero-sized tokens. The scan-out ISR conjures an
//! `I0` for itself; thread code obtains a `Thread` by checking that it really
//! is running outside any handler. Operations on shared state take one of
//! these by reference, which keeps writers and readers on the sides they
//! belong to.

use core::marker::PhantomData;

// Marker type used to cause things to stop being Sync/Send.
type NotSyncOrSend = PhantomData<*mut ()>;

/// The scan-out interrupt.
#[derive(Copy, Clone)]
pub struct I0(NotSyncOrSend);
/// Thread mode execution occurs outside any interrupt handler.
#[derive(Copy, Clone)]
pub struct Thread(NotSyncOrSend);

// Only the target driver and tests conjure tokens.
#[cfg_attr(not(target_os = "none"), allow(dead_code))]
impl I0 {
    pub(crate) unsafe fn new() -> Self {
        I0(PhantomData)
    }
}

#[cfg_attr(not(target_os = "none"), allow(dead_code))]
impl Thread {
    pub(crate) unsafe fn new() -> Self {
        Thread(PhantomData)
    }
}

#[cfg(target_os = "none")]
impl Thread {
    /// Returns a `Thread` token only if called from thread priority.
    pub fn new_checked() -> Option<Self> {
        // Safety: reads of the ICSR are safe.
        let icsr = unsafe { &(*cortex_m::peripheral::SCB::ptr()).icsr }.read();
        if icsr & 0xFF == 0 {
            Some(unsafe { Self::new() })
        } else {
            None
        }
    }
}

/// Indicates that a type represents an interrupt priority level.
pub trait InterruptPriority {}

impl InterruptPriority for I0 {}
