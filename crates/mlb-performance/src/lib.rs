// Library root: season performance tracking for MLB players. The CLI and
// integration tests reach everything through these public modules.

pub mod assessment;
pub mod config;
pub mod feed;
pub mod season;
pub mod stats;
