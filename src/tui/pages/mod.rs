pub mod admin;
pub mod create_password;
pub mod documents;
pub mod equipment;
pub mod home;
pub mod login;
pub mod profile;
pub mod splash;

pub use admin::AdminPage;
pub use create_password::CreatePasswordPage;
pub use documents::{DocumentTab, DocumentsPage};
pub use equipment::EquipmentPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use splash::render_splash;

use super::messages::Notice;

/// What a page asks the app to do after handling a key or a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    None,
    Notify(Notice),
    OpenCreatePassword,
    ShowLogin(Option<Notice>),
    OpenDocuments(DocumentTab),
    /// Sign out; the app runs the call so it outlives the signed-in views.
    Logout,
}
