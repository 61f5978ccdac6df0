pub mod models;
pub mod queries;
pub mod source;

pub use models::*;
pub use queries::*;
pub use source::{FixtureDataSource, PortalDataSource, PortalSummary};
