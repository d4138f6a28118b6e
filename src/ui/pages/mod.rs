pub mod home;
pub mod settings;

pub use home::HomePage;
pub use settings::SettingsPage;
