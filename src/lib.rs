pub mod error;
pub mod github;
pub mod pipeline;
pub mod report;
pub mod util;
