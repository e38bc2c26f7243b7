//! Service-specific tests
//!
//! Each service has its own test file exercising it through the trait it
//! implements.


// Common test utilities for services
#[cfg(test)]
pub mod common {
    use shared::Quote;

    /// Fixed instant used wherever a clock is needed
    pub const NOW: i64 = 1_700_000_000_000;

    pub fn sample_quote(id: i64) -> Quote {
        Quote::new(id, format!("Quote number {}", id), "Testing", NOW)
    }
}
