pub mod app;
pub mod background;
pub mod messages;
pub mod pages;
pub mod widgets;

pub use app::{ClientTab, PortalApp};
pub use messages::{Notice, NoticeKind};
