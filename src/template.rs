//! Code template store.
//!
//! A template file holds named fragments between marker lines:
//!
//! ```text
//! --item BEGINS--
//!   curr = add_item("%(item)s", "%(info)s", %(type)s, "%(data)s", %(state)d);
//! --item ENDS--
//! ```
//!
//! `BEGIN`/`END` are accepted as well. Everything outside a marker pair is
//! commentary and is discarded.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static RE_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--(?P<name>[a-z]+) BEGINS?--$").unwrap());

static RE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--(?P<name>[a-z]+) ENDS?--$").unwrap());

/// Named fragments loaded from a template source.
#[derive(Debug, Default, Clone)]
pub struct TemplateStore {
    fragments: HashMap<String, String>,
}

/// Fragment being collected.
struct Open {
    name: String,
    body: String,
}

impl TemplateStore {
    /// Split a template source into fragments.
    pub fn load(source: &str) -> Self {
        let mut fragments = HashMap::new();
        let mut open: Option<Open> = None;

        for line in source.split_inclusive('\n') {
            let marker = line.trim_end_matches(['\n', '\r']);

            if let Some(caps) = RE_END.captures(marker) {
                match open.take() {
                    Some(frag) if frag.name == caps["name"] => {
                        debug!("template fragment '{}' ({} bytes)", frag.name, frag.body.len());
                        if fragments.insert(frag.name.clone(), frag.body).is_some() {
                            warn!("template fragment '{}' defined twice, keeping the last one", frag.name);
                        }
                    }
                    Some(frag) => warn!(
                        "dropping template fragment '{}': closed by '--{} END--'",
                        frag.name,
                        &caps["name"]
                    ),
                    None => warn!("ignoring '{}' outside any fragment", marker),
                }
                continue;
            }

            if let Some(caps) = RE_BEGIN.captures(marker) {
                if let Some(frag) = open.take() {
                    warn!(
                        "dropping template fragment '{}': '{}' begins before it ends",
                        frag.name,
                        &caps["name"]
                    );
                }
                open = Some(Open {
                    name: caps["name"].to_string(),
                    body: String::new(),
                });
                continue;
            }

            if let Some(frag) = open.as_mut() {
                frag.body.push_str(line);
            }
        }

        if let Some(frag) = open {
            warn!("dropping template fragment '{}': no end marker", frag.name);
        }

        Self { fragments }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Fragment names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.fragments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_named_fragments() {
        let src = "intro text\n--header BEGINS--\n#include \"menu.h\"\n\nint main(void)\n--header ENDS--\nbetween\n--footer BEGIN--\n}\n--footer END--\ntrailer\n";
        let store = TemplateStore::load(src);
        assert_eq!(store.names(), ["footer", "header"]);
        assert_eq!(
            store.get("header"),
            Some("#include \"menu.h\"\n\nint main(void)\n")
        );
        assert_eq!(store.get("footer"), Some("}\n"));
    }

    #[test]
    fn crlf_markers() {
        let store = TemplateStore::load("--menu BEGINS--\r\n  x();\r\n--menu ENDS--\r\n");
        assert_eq!(store.get("menu"), Some("  x();\r\n"));
    }

    #[test]
    fn unterminated_fragment_is_dropped() {
        let store = TemplateStore::load("--item BEGINS--\nadd_item();\n");
        assert!(!store.contains("item"));
        assert!(store.names().is_empty());
    }

    #[test]
    fn mismatched_end_drops_fragment() {
        let store = TemplateStore::load("--item BEGINS--\na\n--menu ENDS--\n--menu BEGINS--\nb\n--menu ENDS--\n");
        assert!(!store.contains("item"));
        assert_eq!(store.get("menu"), Some("b\n"));
    }

    #[test]
    fn nested_begin_drops_outer() {
        let store = TemplateStore::load("--item BEGINS--\na\n--login BEGINS--\nb\n--login ENDS--\n");
        assert!(!store.contains("item"));
        assert_eq!(store.get("login"), Some("b\n"));
    }

    #[test]
    fn marker_must_fill_the_line() {
        let store = TemplateStore::load(" --item BEGINS--\n--Item BEGINS--\n");
        assert!(store.names().is_empty());
    }

    #[test]
    fn empty_fragment() {
        let store = TemplateStore::load("--header BEGINS--\n--header ENDS--\n");
        assert_eq!(store.get("header"), Some(""));
    }

    #[test]
    fn later_definition_wins() {
        let store = TemplateStore::load("--a BEGINS--\n1\n--a ENDS--\n--a BEGINS--\n2\n--a ENDS--\n");
        assert_eq!(store.get("a"), Some("2\n"));
    }
}
