//! Template-driven C source emitter.
//!
//! Output order is fixed: `header`, `system`, then for every menu its `menu`
//! fragment (plus a `set_menu_pos` call when placed explicitly) followed by
//! one `item` or `login` fragment per entry, and finally `footer`.
//!
//! Fragment bodies use `%(field)s` for text, `%(field)d` for integers and
//! `%%` for a literal percent sign. `header` and `footer` are copied as is.

use crate::error::MenuError;
use crate::model::MenuDocument;
use crate::render::{check_main_menu, Renderer};
use crate::schema::ItemType;
use crate::template::TemplateStore;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Fragments every template file must define.
pub const REQUIRED_TEMPLATES: &[&str] = &["header", "system", "menu", "item", "login", "footer"];

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:%|\((?P<name>[A-Za-z_][A-Za-z0-9_]*)\)(?P<conv>[sd]))").unwrap()
});

pub struct SourceRenderer {
    templates: TemplateStore,
}

impl SourceRenderer {
    pub fn new(templates: TemplateStore) -> Self {
        Self { templates }
    }
}

impl Renderer for SourceRenderer {
    fn render(&self, doc: &MenuDocument) -> Result<String> {
        Ok(emit(doc, &self.templates)?)
    }
}

/// Render `doc` through the fragments in `templates`.
///
/// Required fragments and the `main` menu are checked before anything is
/// rendered.
pub fn emit(doc: &MenuDocument, templates: &TemplateStore) -> Result<String, MenuError> {
    for name in REQUIRED_TEMPLATES {
        if !templates.contains(name) {
            return Err(MenuError::MissingTemplate {
                name: name.to_string(),
            });
        }
    }
    check_main_menu(doc)?;

    let mut out = String::new();
    out.push_str(fragment(templates, "header")?);
    out.push_str(&substitute("system", fragment(templates, "system")?, |n| {
        doc.system.field(n)
    })?);

    for menu in &doc.menus {
        debug!("emitting menu '{}' ({} entries)", menu.name, menu.entries.len());
        out.push_str(&substitute("menu", fragment(templates, "menu")?, |n| {
            menu.field(n)
        })?);
        if let Some((row, col)) = menu.position() {
            out.push_str(&format!("  set_menu_pos({},{});\n", row, col));
        }
        for entry in &menu.entries {
            let name = match entry.item_type() {
                ItemType::Login => "login",
                _ => "item",
            };
            out.push_str(&substitute(name, fragment(templates, name)?, |n| {
                entry.field(n)
            })?);
        }
    }

    out.push_str(fragment(templates, "footer")?);
    Ok(out)
}

fn fragment<'a>(templates: &'a TemplateStore, name: &str) -> Result<&'a str, MenuError> {
    templates.get(name).ok_or_else(|| MenuError::MissingTemplate {
        name: name.to_string(),
    })
}

/// Replace the placeholders of one fragment with field values.
fn substitute<'a, F>(fragment: &str, body: &str, lookup: F) -> Result<String, MenuError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for caps in RE_PLACEHOLDER.captures_iter(body) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&body[last..whole.start]);
        last = whole.end;

        let Some(name) = caps.name("name").map(|m| m.as_str()) else {
            out.push('%');
            continue;
        };
        let value = lookup(name).ok_or_else(|| MenuError::Placeholder {
            fragment: fragment.to_string(),
            name: name.to_string(),
            reason: "is not a known field".to_string(),
        })?;
        match caps.name("conv").map(|m| m.as_str()) {
            Some("d") => {
                let n = value.trim().parse::<i64>().map_err(|_| MenuError::Placeholder {
                    fragment: fragment.to_string(),
                    name: name.to_string(),
                    reason: format!("expects an integer, got '{}'", value),
                })?;
                out.push_str(&n.to_string());
            }
            _ => out.push_str(value),
        }
    }

    out.push_str(&body[last..]);
    Ok(out)
}
