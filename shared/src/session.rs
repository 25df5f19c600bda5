//! Dashboard page flow
//!
//! The front end moves between three pages. State lives in whatever owns the
//! `Page` value (one per browser session); there is no global session.

use serde::{Deserialize, Serialize};

/// Page currently shown to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    #[default]
    Login,
    Register,
    Main { username: String },
}

/// User actions that move between pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    LoginSucceeded { username: String },
    GoToRegister,
    RegistrationSucceeded,
    BackToLogin,
    Logout,
}

impl Page {
    /// Apply an event. Events that make no sense on the current page leave
    /// it unchanged.
    pub fn transition(self, event: PageEvent) -> Page {
        match (self, event) {
            (Page::Login, PageEvent::LoginSucceeded { username }) => Page::Main { username },
            (Page::Login, PageEvent::GoToRegister) => Page::Register,
            (Page::Register, PageEvent::RegistrationSucceeded) => Page::Login,
            (Page::Register, PageEvent::BackToLogin) => Page::Login,
            (Page::Main { .. }, PageEvent::Logout) => Page::Login,
            (page, _) => page,
        }
    }

    pub fn login_succeeded(self, username: impl Into<String>) -> Page {
        self.transition(PageEvent::LoginSucceeded {
            username: username.into(),
        })
    }

    pub fn go_to_register(self) -> Page {
        self.transition(PageEvent::GoToRegister)
    }

    pub fn registration_succeeded(self) -> Page {
        self.transition(PageEvent::RegistrationSucceeded)
    }

    pub fn back_to_login(self) -> Page {
        self.transition(PageEvent::BackToLogin)
    }

    pub fn logout(self) -> Page {
        self.transition(PageEvent::Logout)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Page::Main { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Page::Main { username } => Some(username),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Register => "register",
            Page::Main { .. } => "main",
        }
    }
}
