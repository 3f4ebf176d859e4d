pub mod cache;
pub(crate) mod config;
pub mod crawler;
pub mod diff;
pub mod error;
pub mod judge;
pub mod storage;
pub mod types;
pub mod verify;

#[cfg(test)]
pub(crate) mod stub;
