//! Contract assertions with stable site identifiers.
//!
//! A violated contract leaves the system in a state inconsistent with safe
//! continuation, so these macros halt instead of attempting recovery. Every
//! call site carries a short module tag and an integer id so a field report
//! pinpoints the check that fired without symbol information.
//!
//! Call sites that a producer can reach at runtime fire outside the
//! framework critical section; see the active-object layer.

/// Precondition check. Fatal when `cond` is false.
#[macro_export]
macro_rules! q_require {
    ($module:literal, $id:literal, $cond:expr) => {
        if !$cond {
            $crate::assert::fail($module, $id);
        }
    };
}

/// Internal-invariant check. Fatal when `cond` is false.
#[macro_export]
macro_rules! q_assert {
    ($module:literal, $id:literal, $cond:expr) => {
        if !$cond {
            $crate::assert::fail($module, $id);
        }
    };
}

/// Assertion trap. Not meant to be called directly; use the macros.
#[cold]
#[inline(never)]
pub fn fail(module: &'static str, id: u32) -> ! {
    panic!("assertion failed: {}:{}", module, id);
}
