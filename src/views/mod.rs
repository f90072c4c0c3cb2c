// HTML pages: askama templates rendered into the shared layout

pub mod pages;
pub mod rows;

pub use pages::*;
pub use rows::*;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;
use crate::session::Session;
use crate::types::Flash;

/// Data every page hands to `base.html`: navigation bar and message box
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub title: String,
    pub nav_cliente: bool,
    pub nav_staff: bool,
    pub is_admin: bool,
    pub user_name: String,
    pub role_label: String,
    pub cart_count: u32,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Page without a logged-in user (no navigation bar)
    pub fn anonymous(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn for_session(title: impl Into<String>, session: &Session) -> Self {
        let staff = session.is_staff();
        Self {
            title: title.into(),
            nav_cliente: !staff,
            nav_staff: staff,
            is_admin: session.role.is_admin(),
            user_name: session.display_name().to_string(),
            role_label: session.role.label().to_string(),
            cart_count: session.cart.unit_count(),
            flash: None,
        }
    }

    pub fn with_flash(mut self, flash: Option<Flash>) -> Self {
        if flash.is_some() {
            self.flash = flash;
        }
        self
    }

    pub fn has_flash(&self) -> bool {
        self.flash.is_some()
    }

    pub fn flash_message(&self) -> &str {
        self.flash.as_ref().map(|f| f.message.as_str()).unwrap_or_default()
    }

    pub fn flash_class(&self) -> &'static str {
        self.flash.as_ref().map(Flash::css_class).unwrap_or("flash")
    }
}

/// Render a template into an HTML response
pub fn render<T: Template>(template: &T) -> Result<Response, AppError> {
    let body = template.render()?;
    Ok(Html(body).into_response())
}
