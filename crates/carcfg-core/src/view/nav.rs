//! Navigation bar: static chrome.

/// The top navigation bar.  Carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavBar {
    pub logo: &'static str,
    pub title: &'static str,
    pub user_menu_icon: &'static str,
}

impl NavBar {
    pub const fn new() -> Self {
        Self {
            logo: "🚗",
            title: "Car Configurator",
            user_menu_icon: "👤",
        }
    }
}

impl Default for NavBar {
    fn default() -> Self {
        Self::new()
    }
}
