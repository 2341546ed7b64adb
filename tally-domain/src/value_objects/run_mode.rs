// Run mode value object

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Aggregate the whole batch into an empty store.
    #[default]
    Fresh,
    /// Merge into the persisted store, skipping already indexed events.
    Update,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Fresh => "fresh",
            RunMode::Update => "update",
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, RunMode::Update)
    }
}

impl From<bool> for RunMode {
    fn from(update: bool) -> Self {
        if update {
            RunMode::Update
        } else {
            RunMode::Fresh
        }
    }
}
