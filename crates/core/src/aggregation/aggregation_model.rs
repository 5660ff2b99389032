use serde::{Deserialize, Serialize};

/// Inclusive epoch-millisecond span of one or more whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthWindow {
    pub start_millis: i64,
    pub end_millis: i64,
}

impl MonthWindow {
    pub fn contains(&self, millis: i64) -> bool {
        (self.start_millis..=self.end_millis).contains(&millis)
    }
}
