pub mod auth;
pub mod logging;
pub mod portal;
pub mod routing;
pub mod settings;
pub mod theme;
pub mod tui;

pub use auth::*;
pub use routing::{route_for, Destination};
