//! Mutex abstraction for the state-machine slot.
//!
//! Uses `std::sync::Mutex` when the `std` feature is enabled and
//! `spin::Mutex` otherwise. In `std` mode a poisoned mutex panics:
//! poisoned state is not recoverable in a real-time system.

#[cfg(any(feature = "std", test))]
pub type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;
#[cfg(not(any(feature = "std", test)))]
pub type MutexGuard<'a, T> = spin::MutexGuard<'a, T>;

pub struct Mutex<T> {
    #[cfg(any(feature = "std", test))]
    inner: std::sync::Mutex<T>,
    #[cfg(not(any(feature = "std", test)))]
    inner: spin::Mutex<T>,
}

impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self {
            #[cfg(any(feature = "std", test))]
            inner: std::sync::Mutex::new(value),
            #[cfg(not(any(feature = "std", test)))]
            inner: spin::Mutex::new(value),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        #[cfg(any(feature = "std", test))]
        {
            self.inner.lock().expect("mutex poisoned")
        }
        #[cfg(not(any(feature = "std", test)))]
        {
            self.inner.lock()
        }
    }
}
