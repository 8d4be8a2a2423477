//! Static HTML pages.
//!
//! Page bodies are HTML fragments compiled into the binary and wrapped in a
//! shared layout at render time.

const LAYOUT: &str = include_str!("../templates/layout.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Signin,
    Signup,
    Dashboard,
    Detect,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Index,
        Page::Signin,
        Page::Signup,
        Page::Dashboard,
        Page::Detect,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Index => "Home",
            Self::Signin => "Sign in",
            Self::Signup => "Sign up",
            Self::Dashboard => "Dashboard",
            Self::Detect => "Detect",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            Self::Index => include_str!("../templates/index.html"),
            Self::Signin => include_str!("../templates/signin.html"),
            Self::Signup => include_str!("../templates/signup.html"),
            Self::Dashboard => include_str!("../templates/dashboard.html"),
            Self::Detect => include_str!("../templates/detect.html"),
        }
    }

    /// Full HTML document for this page.
    pub fn render(&self) -> String {
        LAYOUT
            .replace("{{title}}", self.title())
            .replace("{{content}}", self.body())
    }
}
