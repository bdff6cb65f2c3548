//! Plain text or JSON rendering of command results

use serde::Serialize;

/// Chooses between human readable and JSON output
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or hand it to `plain` for text output
    pub fn emit<T: Serialize>(&self, value: &T, plain: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            plain(value);
        }
        Ok(())
    }
}
