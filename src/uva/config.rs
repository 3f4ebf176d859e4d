pub mod site {
    pub const JUDGE_URL: &str = "https://uva.onlinejudge.org";
    pub const DEBUG_URL: &str = "https://www.udebug.com";
}
pub mod crawl {
    pub const WORKERS: usize = 8;
    // Problem Set Volumes span volumes 1..=17; Contest Volumes live
    // under their own root category and are discovered by scraping.
    pub const CONTEST_CATEGORY: u32 = 2;
    pub const FIRST_VOLUME: u32 = 1;
    pub const LAST_VOLUME: u32 = 17;
}
pub mod submission {
    use std::time::Duration;
    pub const POLL_DELAY: Duration = Duration::from_secs(1);
}
