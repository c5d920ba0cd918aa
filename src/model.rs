//! Committed menu model, independent of the output format.

use crate::schema::{self, AttrSpec, ItemType, RecordKind};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Attribute values of one record, laid out in schema order.
///
/// Built fresh from the schema defaults for every record.
#[derive(Debug, Clone)]
pub struct Attributes {
    kind: RecordKind,
    values: Vec<String>,
    touched: bool,
}

impl Attributes {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            values: schema::attrs(kind)
                .iter()
                .map(|a| a.default.to_string())
                .collect(),
            touched: false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        schema::position(self.kind, name).map(|i| self.values[i].as_str())
    }

    /// Store an already coerced value. Returns `false` if `name` is not an
    /// attribute of this record kind.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        match schema::position(self.kind, name) {
            Some(i) => {
                self.values[i] = value;
                self.touched = true;
                true
            }
            None => false,
        }
    }

    /// Whether any attribute was explicitly assigned.
    pub fn touched(&self) -> bool {
        self.touched
    }

    fn specs(&self) -> impl Iterator<Item = (&'static AttrSpec, &str)> {
        schema::attrs(self.kind)
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (spec, value) in self.specs() {
            map.serialize_entry(spec.name, value)?;
        }
        map.end()
    }
}

/// Document-wide settings.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SystemRecord {
    pub attrs: Attributes,
}

impl Default for SystemRecord {
    fn default() -> Self {
        Self {
            attrs: Attributes::new(RecordKind::System),
        }
    }
}

impl SystemRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }
}

/// A named menu and its entries.
#[derive(Debug, Clone, Serialize)]
pub struct MenuRecord {
    pub name: String,
    #[serde(flatten)]
    pub attrs: Attributes,
    pub entries: Vec<EntryRecord>,
}

impl MenuRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Attributes::new(RecordKind::Menu),
            entries: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => self.attrs.get(name),
        }
    }

    /// Explicit row/col, unless both are left to the runtime.
    pub fn position(&self) -> Option<(&str, &str)> {
        let row = self.attrs.get("row").unwrap_or(schema::POSITION_AUTO);
        let col = self.attrs.get("col").unwrap_or(schema::POSITION_AUTO);
        if row == schema::POSITION_AUTO && col == schema::POSITION_AUTO {
            None
        } else {
            Some((row, col))
        }
    }
}

/// One selectable item of a menu.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct EntryRecord {
    pub attrs: Attributes,
}

impl Default for EntryRecord {
    fn default() -> Self {
        Self {
            attrs: Attributes::new(RecordKind::Entry),
        }
    }
}

impl EntryRecord {
    pub fn item_type(&self) -> ItemType {
        self.attrs
            .get("type")
            .and_then(ItemType::from_tag)
            .unwrap_or_default()
    }

    /// Field text as substituted into a template; `type` yields the runtime
    /// symbol rather than the tag.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "type" => Some(self.item_type().symbol()),
            _ => self.attrs.get(name),
        }
    }

    /// Apply commit-time defaults: an empty `info` takes the value of `data`.
    pub fn finish(mut self) -> Self {
        if self.attrs.get("info").is_some_and(str::is_empty) {
            let data = self.attrs.get("data").unwrap_or_default().to_string();
            let touched = self.attrs.touched;
            self.attrs.set("info", data);
            self.attrs.touched = touched;
        }
        self
    }
}

/// The fully parsed menu description.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuDocument {
    pub system: SystemRecord,
    pub menus: Vec<MenuRecord>,
}

impl MenuDocument {
    pub fn find_menu(&self, name: &str) -> Option<&MenuRecord> {
        self.menus.iter().find(|m| m.name == name)
    }

    pub fn entry_count(&self) -> usize {
        self.menus.iter().map(|m| m.entries.len()).sum()
    }
}
