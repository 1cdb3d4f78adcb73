use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::{error::AppError, views::pin_card::PLACEHOLDER_IMAGE};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("auth.html", include_str!("../templates/auth.html")),
    ("feed.html", include_str!("../templates/feed.html")),
    ("boards.html", include_str!("../templates/boards.html")),
    ("board_detail.html", include_str!("../templates/board_detail.html")),
    ("pin_card.html", include_str!("../templates/pin_card.html")),
    ("modals.html", include_str!("../templates/modals.html")),
    ("alert.html", include_str!("../templates/alert.html")),
];

/// Page templates compiled into the binary. `.html` names are auto-escaped.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> anyhow::Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_global("placeholder_image", PLACEHOLDER_IMAGE);
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}
