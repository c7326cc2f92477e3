// pages.rs
use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::AppError;

/// Builds the template registry. Templates are embedded at compile time so
/// the binary and the test suite do not depend on the working directory.
pub fn registry() -> Result<Handlebars<'static>, handlebars::TemplateError> {
    let mut hb = Handlebars::new();
    hb.register_template_string("index", include_str!("../templates/index.hbs"))?;
    hb.register_template_string("detail", include_str!("../templates/detail.hbs"))?;
    hb.register_template_string("results", include_str!("../templates/results.hbs"))?;
    Ok(hb)
}

pub fn render<T: Serialize>(
    hb: &Handlebars<'static>,
    name: &str,
    data: &T,
) -> Result<Html<String>, AppError> {
    Ok(Html(hb.render(name, data)?))
}
