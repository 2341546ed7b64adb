// Identifier value objects

/// Grouping key of a daily summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub user_id: i64,
    pub date: String,
}

impl SummaryKey {
    pub fn new(user_id: i64, date: impl Into<String>) -> Self {
        Self {
            user_id,
            date: date.into(),
        }
    }
}
