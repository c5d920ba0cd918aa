//! Menu description parser: a line-by-line state machine.
//!
//! The parser starts in system scope. A `[name]` header opens a menu scope;
//! the first entry attribute inside a section switches it to item scope for
//! the rest of that section. Blank lines in item scope close the current
//! entry. Which attributes a line may set depends only on the scope.

use crate::coerce::coerce;
use crate::error::MenuError;
use crate::model::{Attributes, EntryRecord, MenuDocument, MenuRecord, SystemRecord};
use crate::schema::{self, AttrSpec, RecordKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Before the first section header.
    System,
    /// After a header, before the section's first entry attribute.
    Menu,
    /// Entry attributes of the current section.
    Item,
}

/// Parser context threaded through every line.
struct ParserState {
    line: usize,
    scope: Scope,
    system: SystemRecord,
    menus: Vec<MenuRecord>,
    menu: Option<MenuRecord>,
    entry: EntryRecord,
}

impl ParserState {
    fn new() -> Self {
        Self {
            line: 0,
            scope: Scope::System,
            system: SystemRecord::default(),
            menus: Vec::new(),
            menu: None,
            entry: EntryRecord::default(),
        }
    }
}

/// Parse a complete menu description.
pub fn parse(input: &str) -> Result<MenuDocument, MenuError> {
    let mut state = ParserState::new();

    for (index, line) in input.lines().enumerate() {
        state.line = index + 1;
        process_line(&mut state, line)?;
    }

    commit_entry(&mut state)?;
    commit_menu(&mut state);

    if !state.system.attrs.touched() {
        debug!("no system settings given, using defaults");
    }

    Ok(MenuDocument {
        system: state.system,
        menus: state.menus,
    })
}

fn process_line(s: &mut ParserState, raw: &str) -> Result<(), MenuError> {
    let line = raw.trim();

    if line.is_empty() {
        if s.scope == Scope::Item {
            commit_entry(s)?;
        }
        return Ok(());
    }

    if line.starts_with('#') || line.starts_with(';') {
        return Ok(());
    }

    if let Some(name) = section_name(line) {
        if name.is_empty() {
            return Err(syntax_error(s, line));
        }
        return open_menu(s, name);
    }

    let Some((key, value)) = line.split_once('=') else {
        return Err(syntax_error(s, line));
    };
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return Err(syntax_error(s, line));
    }
    assign(s, &key, value.trim())
}

fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn syntax_error(s: &ParserState, line: &str) -> MenuError {
    MenuError::Syntax {
        line: s.line,
        text: line.to_string(),
    }
}

fn open_menu(s: &mut ParserState, name: &str) -> Result<(), MenuError> {
    commit_entry(s)?;
    commit_menu(s);
    debug!(line = s.line, "opening menu '{}'", name);
    s.menu = Some(MenuRecord::new(name));
    s.scope = Scope::Menu;
    Ok(())
}

fn assign(s: &mut ParserState, key: &str, value: &str) -> Result<(), MenuError> {
    let system = schema::lookup(RecordKind::System, key);
    let menu = schema::lookup(RecordKind::Menu, key);
    let entry = schema::lookup(RecordKind::Entry, key);

    match s.scope {
        Scope::System => {
            if let Some(spec) = system {
                return store(&mut s.system.attrs, spec, value, s.line);
            }
            let misplaced = match (entry, menu) {
                (Some(_), _) => Some(RecordKind::Entry),
                (None, Some(_)) => Some(RecordKind::Menu),
                (None, None) => None,
            };
            if let Some(kind) = misplaced {
                return Err(MenuError::Structural {
                    line: s.line,
                    reason: format!(
                        "{} attribute '{}' used before any menu section (a menu must be declared before its items)",
                        kind, key
                    ),
                });
            }
            Err(unknown_attribute(s, key, &[RecordKind::System]))
        }
        Scope::Menu => {
            if let Some(spec) = menu {
                let line = s.line;
                return match s.menu.as_mut() {
                    Some(current) => store(&mut current.attrs, spec, value, line),
                    None => Err(no_menu(line)),
                };
            }
            if let Some(spec) = entry {
                s.scope = Scope::Item;
                return store(&mut s.entry.attrs, spec, value, s.line);
            }
            if system.is_some() {
                return Err(system_in_menu(s, key));
            }
            Err(unknown_attribute(s, key, &[RecordKind::Menu, RecordKind::Entry]))
        }
        Scope::Item => {
            if let Some(spec) = entry {
                return store(&mut s.entry.attrs, spec, value, s.line);
            }
            if menu.is_some() {
                return Err(MenuError::Structural {
                    line: s.line,
                    reason: format!(
                        "menu attribute '{}' must come before the first entry of menu '{}'",
                        key,
                        current_menu_name(s)
                    ),
                });
            }
            if system.is_some() {
                return Err(system_in_menu(s, key));
            }
            Err(unknown_attribute(s, key, &[RecordKind::Entry]))
        }
    }
}

fn store(attrs: &mut Attributes, spec: &AttrSpec, raw: &str, line: usize) -> Result<(), MenuError> {
    let value = coerce(spec.kind, raw).map_err(|source| MenuError::Value {
        line,
        attr: spec.name.to_string(),
        source,
    })?;
    attrs.set(spec.name, value);
    Ok(())
}

fn unknown_attribute(s: &ParserState, key: &str, kinds: &[RecordKind]) -> MenuError {
    let expected = kinds
        .iter()
        .map(|k| schema::attr_names(*k))
        .collect::<Vec<_>>()
        .join(" OR ");
    MenuError::UnknownAttribute {
        line: s.line,
        name: key.to_string(),
        expected,
    }
}

fn system_in_menu(s: &ParserState, key: &str) -> MenuError {
    MenuError::Structural {
        line: s.line,
        reason: format!(
            "system attribute '{}' inside menu '{}' (system settings must precede the first menu section)",
            key,
            current_menu_name(s)
        ),
    }
}

fn no_menu(line: usize) -> MenuError {
    MenuError::Structural {
        line,
        reason: "menu must be declared before a menu item is declared".to_string(),
    }
}

fn current_menu_name(s: &ParserState) -> &str {
    s.menu.as_ref().map(|m| m.name.as_str()).unwrap_or_default()
}

/// Move the current entry into the current menu if anything was set on it.
fn commit_entry(s: &mut ParserState) -> Result<(), MenuError> {
    let entry = std::mem::take(&mut s.entry);
    if !entry.attrs.touched() {
        return Ok(());
    }
    let Some(menu) = s.menu.as_mut() else {
        return Err(no_menu(s.line));
    };
    let entry = entry.finish();
    debug!(
        line = s.line,
        "menu '{}': entry '{}' ({})",
        menu.name,
        entry.attrs.get("item").unwrap_or_default(),
        entry.item_type().tag()
    );
    menu.entries.push(entry);
    Ok(())
}

fn commit_menu(s: &mut ParserState) {
    if let Some(menu) = s.menu.take() {
        debug!(
            "menu '{}' committed with {} entries{}",
            menu.name,
            menu.entries.len(),
            if menu.attrs.touched() { "" } else { " (default settings)" }
        );
        s.menus.push(menu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoerceError;
    use crate::schema::ItemType;

    #[test]
    fn parse_minimal_document() {
        let doc = parse("[main]\ntitle=Hello\n\nitem=Go\ndata=go.c32\ntype=run\n").unwrap();
        assert_eq!(doc.menus.len(), 1);
        let main = &doc.menus[0];
        assert_eq!(main.name, "main");
        assert_eq!(main.attrs.get("title"), Some("Hello"));
        assert_eq!(main.entries.len(), 1);
        let entry = &main.entries[0];
        assert_eq!(entry.attrs.get("item"), Some("Go"));
        assert_eq!(entry.attrs.get("data"), Some("go.c32"));
        assert_eq!(entry.item_type(), ItemType::Run);
        assert_eq!(doc.system.attrs.get("title"), Some("Menu System"));
    }

    #[test]
    fn parse_system_settings() {
        let input = "title=\"Boot Menu\"\nTIMEOUT=300\nskipcondn=alt-ctrl\n[main]\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.system.attrs.get("title"), Some("Boot Menu"));
        assert_eq!(doc.system.attrs.get("timeout"), Some("300"));
        assert_eq!(
            doc.system.attrs.get("skipcondn"),
            Some("ALT_PRESSED | CTRL_PRESSED")
        );
        assert!(doc.system.attrs.touched());
    }

    #[test]
    fn parse_entries_in_order() {
        let input = "[main]\nitem=One\n\nitem=Two\n\n\n\nitem=Three\n[other]\nitem=Four\n";
        let doc = parse(input).unwrap();
        let names: Vec<_> = doc.menus[0]
            .entries
            .iter()
            .map(|e| e.attrs.get("item").unwrap())
            .collect();
        assert_eq!(names, ["One", "Two", "Three"]);
        assert_eq!(doc.menus[1].entries.len(), 1);
        assert_eq!(doc.entry_count(), 4);
    }

    #[test]
    fn info_defaults_to_data() {
        let input = "[main]\nitem=A\ndata=a.c32\n\nitem=B\ndata=b.c32\ninfo=Bee\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.menus[0].entries[0].attrs.get("info"), Some("a.c32"));
        assert_eq!(doc.menus[0].entries[1].attrs.get("info"), Some("Bee"));
    }

    #[test]
    fn comments_and_crlf_are_ignored() {
        let input = "# header\r\n[main]\r\n  ; note\r\nitem=Go\r\n# inside entry\r\ndata=x\r\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.menus[0].entries.len(), 1);
        assert_eq!(doc.menus[0].entries[0].attrs.get("data"), Some("x"));
    }

    #[test]
    fn empty_sections_are_kept() {
        let doc = parse("[main]\n[main]\n").unwrap();
        assert_eq!(doc.menus.len(), 2);
        assert!(doc.menus.iter().all(|m| m.entries.is_empty()));
    }

    #[test]
    fn menu_position_attributes() {
        let doc = parse("[tools]\nrow=5\ncol=10\n\nitem=x\n").unwrap();
        assert_eq!(doc.menus[0].position(), Some(("5", "10")));
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let doc = parse("[main]\nitem=Kernel\ndata=linux root=/dev/sda1\n").unwrap();
        assert_eq!(
            doc.menus[0].entries[0].attrs.get("data"),
            Some("linux root=/dev/sda1")
        );
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = parse("[main]\nitem=Go\nbogus line\n").unwrap_err();
        assert!(matches!(err, MenuError::Syntax { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn empty_section_name_is_syntax_error() {
        let err = parse("[]\n").unwrap_err();
        assert!(matches!(err, MenuError::Syntax { line: 1, .. }));
    }

    #[test]
    fn invalid_shortcut_reports_line() {
        let err = parse("[main]\n\nitem=Go\nshortcut=xy\n").unwrap_err();
        match err {
            MenuError::Value { line, attr, source } => {
                assert_eq!(line, 4);
                assert_eq!(attr, "shortcut");
                assert!(matches!(source, CoerceError::InvalidShortcut { .. }));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn shortcut_is_char_literal() {
        let doc = parse("[main]\nitem=Go\nshortcut=g\n").unwrap();
        assert_eq!(doc.menus[0].entries[0].attrs.get("shortcut"), Some("'g'"));
    }

    #[test]
    fn unknown_type_is_fatal() {
        let err = parse("[main]\nitem=Go\ntype=launch\n").unwrap_err();
        assert!(matches!(
            err,
            MenuError::Value {
                line: 3,
                source: CoerceError::UnknownType { .. },
                ..
            }
        ));
    }

    #[test]
    fn non_integer_state_is_fatal() {
        let err = parse("[main]\nitem=Box\ntype=checkbox\nstate=on\n").unwrap_err();
        assert!(matches!(
            err,
            MenuError::Value {
                line: 4,
                source: CoerceError::NotAnInteger { .. },
                ..
            }
        ));
    }

    #[test]
    fn unknown_attribute_in_each_scope() {
        let err = parse("colour=red\n").unwrap_err();
        assert!(matches!(err, MenuError::UnknownAttribute { line: 1, .. }));

        let err = parse("[main]\ncolour=red\n").unwrap_err();
        assert!(matches!(err, MenuError::UnknownAttribute { line: 2, .. }));

        let err = parse("[main]\nitem=x\ncolour=red\n").unwrap_err();
        match err {
            MenuError::UnknownAttribute { line, name, expected } => {
                assert_eq!(line, 3);
                assert_eq!(name, "colour");
                assert!(expected.contains("shortcut"));
                assert!(!expected.contains("row"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn entry_before_menu_is_structural() {
        let err = parse("item=Go\n[main]\n").unwrap_err();
        assert!(matches!(err, MenuError::Structural { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn menu_attribute_after_entry_is_structural() {
        let err = parse("[main]\nitem=Go\n\ntitle=Late\n").unwrap_err();
        assert!(matches!(err, MenuError::Structural { line: 4, .. }), "{err:?}");
    }

    #[test]
    fn system_attribute_inside_menu_is_structural() {
        let err = parse("[main]\ntimeout=10\n").unwrap_err();
        assert!(matches!(err, MenuError::Structural { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn error_does_not_depend_on_attribute_order() {
        // same bad key, same scope, same error regardless of what preceded it
        let a = parse("[main]\nitem=x\nbad=1\n").unwrap_err();
        let b = parse("[main]\ndata=x\nbad=1\n").unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
    }
}
