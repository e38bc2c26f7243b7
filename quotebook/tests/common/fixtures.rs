//! Test fixtures and data for quotebook tests

use serde_json::{json, Value};
use shared::Quote;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Instant every test clock starts at
    pub const NOW: i64 = 1_700_000_000_000;

    pub const MOTIVATION: &'static str = "Motivation";
    pub const DESIGN: &'static str = "Design";

    /// Local collection spanning two categories
    pub fn local_quotes() -> Vec<Quote> {
        vec![
            Quote::new(1, "Believe in yourself.", Self::MOTIVATION, 5),
            Quote::new(2, "Less, but better.", Self::DESIGN, 5),
            Quote::new(3, "Start where you are.", Self::MOTIVATION, 5),
        ]
    }

    /// Remote snapshot with a newer, a stale and a brand new quote
    pub fn remote_snapshot() -> Vec<Quote> {
        vec![
            Quote::new(1, "Believe in yourself, always.", Self::MOTIVATION, 10),
            Quote::new(2, "More is more.", Self::DESIGN, 1),
            Quote::new(99, "Fresh from the server.", "Server", 10),
        ]
    }

    /// Import document mixing valid and malformed records
    pub fn mixed_import() -> Value {
        json!([
            { "text": "Imported one", "category": "Imported" },
            { "id": 50, "text": "Imported two", "category": "Imported", "updatedAt": 3 },
            { "text": "", "category": "Imported" },
            { "text": "No category" },
            42
        ])
    }
}
