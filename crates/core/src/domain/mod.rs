pub mod asset;
pub mod report;
pub mod snapshot;
