//! Single-instance entry affordance
//!
//! An originating screen may have at most one wizard of a kind open.
//! Launching takes a lease; the entry affordance stays disabled
//! until the lease is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wizard_types::{WizardError, WizardResult};

/// The "start" button of one originating screen
#[derive(Clone, Debug, Default)]
pub struct EntryAffordance {
    active: Arc<AtomicBool>,
}

impl EntryAffordance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.active.load(Ordering::Acquire)
    }

    pub fn try_acquire(&self) -> WizardResult<EntryLease> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| WizardError::EntryActive)?;
        Ok(EntryLease {
            active: self.active.clone(),
        })
    }
}

/// Held by a running wizard; re-enables the entry affordance on drop
#[derive(Debug)]
pub struct EntryLease {
    active: Arc<AtomicBool>,
}

impl Drop for EntryLease {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let entry = EntryAffordance::new();
        assert!(entry.is_enabled());

        let lease = entry.try_acquire().unwrap();
        assert!(!entry.is_enabled());
        assert!(matches!(entry.try_acquire(), Err(WizardError::EntryActive)));

        drop(lease);
        assert!(entry.is_enabled());
        assert!(entry.try_acquire().is_ok());
    }

    #[test]
    fn test_screens_are_independent() {
        let feed = EntryAffordance::new();
        let profile = EntryAffordance::new();
        let _lease = feed.try_acquire().unwrap();
        assert!(profile.is_enabled());
    }
}
