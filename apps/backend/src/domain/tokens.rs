//! Opaque token generation for reconnection and word tokens.

use uuid::Uuid;

/// Source of unique opaque strings.
pub trait TokenGenerator: Send {
    fn generate(&mut self) -> String;
}

/// Random v4 UUIDs, the production generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokens;

impl TokenGenerator for UuidTokens {
    fn generate(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable tokens (`{prefix}-0`, `{prefix}-1`, ...) for tests and replays.
#[derive(Debug, Clone)]
pub struct SequentialTokens {
    prefix: String,
    next: u64,
}

impl SequentialTokens {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl TokenGenerator for SequentialTokens {
    fn generate(&mut self) -> String {
        let token = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        token
    }
}
