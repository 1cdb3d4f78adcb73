use serde::Serialize;

use crate::auth::repo_types::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Top bar: brand, section links, the signed-in email and a sign-out button.
#[derive(Debug, Clone, Serialize)]
pub struct Navbar {
    pub email: String,
    pub links: Vec<NavLink>,
}

const LINKS: [(&str, &str); 2] = [("/app", "Feed"), ("/app/boards", "Boards")];

impl Navbar {
    /// A link is active only on an exact path match, so `/app/boards/{id}`
    /// highlights nothing.
    pub fn new(identity: &Identity, current_path: &str) -> Self {
        let links = LINKS
            .iter()
            .map(|&(href, label)| NavLink {
                href,
                label,
                active: href == current_path,
            })
            .collect();
        Self {
            email: identity.email.clone(),
            links,
        }
    }
}
