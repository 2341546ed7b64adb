// Run summary entity
// Counters describing what one aggregation pass did with its batch

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub received: usize,
    pub aggregated: usize,
    pub skipped_duplicates: usize,
    pub new_summaries: usize,
}
