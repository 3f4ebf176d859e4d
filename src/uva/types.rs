use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a volume listing page. `id` is the number users see;
/// `true_id` is the judge's internal id and the one submissions need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemInfo {
    pub id: u32,
    pub true_id: u32,
    pub title: String,
    pub total_submissions: u64,
    pub percentage: f32,
}

/// One crawl snapshot, keyed by display id.
pub type ProblemSet = HashMap<u32, ProblemInfo>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestData {
    /// Empty for problems that take no input.
    pub input: String,
    pub output: String,
}
