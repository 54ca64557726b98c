pub mod merge;
pub mod provider;
pub mod refresh;
pub mod types;
pub mod yahoo;
