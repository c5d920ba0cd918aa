//! JSON renderer: the committed model as structured output for tooling.

use crate::model::MenuDocument;
use crate::render::{check_main_menu, Renderer};
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &MenuDocument) -> Result<String> {
        check_main_menu(doc)?;
        let mut out = serde_json::to_string_pretty(doc).context("failed to serialize menu model")?;
        out.push('\n');
        Ok(out)
    }
}
