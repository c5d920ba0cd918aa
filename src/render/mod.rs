//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod source;

use crate::error::MenuError;
use crate::model::MenuDocument;
use crate::schema::MAIN_MENU;
use crate::template::TemplateStore;
use anyhow::{anyhow, Result};

/// Trait for rendering a parsed menu description into an output format.
///
/// Implementations validate the whole document before producing any text, so
/// a failed render never yields partial output.
pub trait Renderer {
    fn render(&self, doc: &MenuDocument) -> Result<String>;
}

/// Create a renderer for the given format name. Templates are only loaded by
/// formats that use them.
pub fn create_renderer<F>(format: &str, load_templates: F) -> Result<Box<dyn Renderer>>
where
    F: FnOnce() -> Result<TemplateStore>,
{
    match format {
        "c" => Ok(Box::new(source::SourceRenderer::new(load_templates()?))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use c or json", format)),
    }
}

/// The generated program starts from the menu named `main`.
pub fn check_main_menu(doc: &MenuDocument) -> Result<(), MenuError> {
    match doc.find_menu(MAIN_MENU) {
        Some(_) => Ok(()),
        None => Err(MenuError::MissingMainMenu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format() {
        let err = create_renderer("pascal", || Ok(TemplateStore::default()))
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown format: pascal"));
    }

    #[test]
    fn json_does_not_load_templates() {
        let renderer = create_renderer("json", || Err(anyhow!("should not be called")));
        assert!(renderer.is_ok());
    }

    #[test]
    fn c_propagates_template_errors() {
        let err = create_renderer("c", || Err(anyhow!("no such file")))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "no such file");
    }

    #[test]
    fn main_menu_required() {
        let doc = crate::parser::parse("[other]\nitem=x\n").unwrap();
        assert!(matches!(
            check_main_menu(&doc),
            Err(MenuError::MissingMainMenu)
        ));
        let doc = crate::parser::parse("[other]\n[main]\n").unwrap();
        assert!(check_main_menu(&doc).is_ok());
    }
}
