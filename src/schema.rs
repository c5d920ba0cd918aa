//! Attribute schema for the three record kinds.
//!
//! Each kind has a fixed, ordered table of attribute names with their default
//! text and value kind. Records are built from these tables, the coercion layer
//! checks values against the kind, and the emitter looks fields up by name.

use std::fmt;

/// The three levels of a menu description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    System,
    Menu,
    Entry,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::System => write!(f, "system"),
            RecordKind::Menu => write!(f, "menu"),
            RecordKind::Entry => write!(f, "entry"),
        }
    }
}

/// How a raw attribute value is checked and transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    ItemType,
    Shortcut,
    ModifierCombo,
}

/// One recognized attribute.
#[derive(Debug)]
pub struct AttrSpec {
    pub name: &'static str,
    pub default: &'static str,
    pub kind: ValueKind,
}

const fn attr(name: &'static str, default: &'static str, kind: ValueKind) -> AttrSpec {
    AttrSpec {
        name,
        default,
        kind,
    }
}

pub const SYSTEM_ATTRS: &[AttrSpec] = &[
    attr("videomode", "0xFF", ValueKind::Str),
    attr("title", "Menu System", ValueKind::Str),
    attr("top", "1", ValueKind::Str),
    attr("left", "1", ValueKind::Str),
    attr("bot", "21", ValueKind::Str),
    attr("right", "79", ValueKind::Str),
    attr("helpdir", "/isolinux/help", ValueKind::Str),
    attr("pwdfile", "", ValueKind::Str),
    attr("pwdrow", "23", ValueKind::Str),
    attr("editrow", "23", ValueKind::Str),
    attr("skipcondn", "0", ValueKind::ModifierCombo),
    attr("skipcmd", ".exit", ValueKind::Str),
    attr("startfile", "", ValueKind::Str),
    attr("onerrorcmd", ".repeat", ValueKind::Str),
    attr("exitcmd", ".exit", ValueKind::Str),
    attr("exitcmdroot", "", ValueKind::Str),
    attr("timeout", "600", ValueKind::Str),
    attr("timeoutcmd", ".beep", ValueKind::Str),
    attr("totaltimeout", "0", ValueKind::Str),
    attr("totaltimeoutcmd", ".wait", ValueKind::Str),
];

/// Menu attributes. `name` is not here: it comes from the section header and
/// cannot be reassigned.
pub const MENU_ATTRS: &[AttrSpec] = &[
    attr("title", "", ValueKind::Str),
    attr("row", POSITION_AUTO, ValueKind::Str),
    attr("col", POSITION_AUTO, ValueKind::Str),
];

pub const ENTRY_ATTRS: &[AttrSpec] = &[
    attr("item", "", ValueKind::Str),
    attr("info", "", ValueKind::Str),
    attr("data", "", ValueKind::Str),
    // PXELINUX append flag
    attr("ipappend", "0", ValueKind::Int),
    attr("helpid", "65535", ValueKind::Int),
    attr("shortcut", SHORTCUT_NONE, ValueKind::Shortcut),
    // initial state of checkboxes
    attr("state", "0", ValueKind::Int),
    attr("argsmenu", "", ValueKind::Str),
    attr("perms", "", ValueKind::Str),
    attr("type", "run", ValueKind::ItemType),
];

/// Row/col value that lets the runtime place the menu.
pub const POSITION_AUTO: &str = "0xFF";

/// Shortcut value meaning "no shortcut".
pub const SHORTCUT_NONE: &str = "-1";

/// Menu name the generated program starts from.
pub const MAIN_MENU: &str = "main";

/// Join token between resolved modifier symbols.
pub const MODIFIER_JOIN: &str = " | ";

/// Keyboard modifier names accepted in a modifier combination.
pub const MODIFIERS: &[(&str, &str)] = &[
    ("alt", "ALT_PRESSED"),
    ("ctrl", "CTRL_PRESSED"),
    ("shift", "SHIFT_PRESSED"),
    ("caps", "CAPSLOCK_ON"),
    ("num", "NUMLOCK_ON"),
    ("ins", "INSERT_ON"),
];

/// Entry type tags and the runtime symbol each one is emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemType {
    #[default]
    Run,
    Inactive,
    Checkbox,
    RadioMenu,
    Sep,
    Invisible,
    RadioItem,
    ExitMenu,
    Login,
    SubMenu,
}

impl ItemType {
    pub const ALL: &'static [ItemType] = &[
        ItemType::Run,
        ItemType::Inactive,
        ItemType::Checkbox,
        ItemType::RadioMenu,
        ItemType::Sep,
        ItemType::Invisible,
        ItemType::RadioItem,
        ItemType::ExitMenu,
        ItemType::Login,
        ItemType::SubMenu,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ItemType::Run => "run",
            ItemType::Inactive => "inactive",
            ItemType::Checkbox => "checkbox",
            ItemType::RadioMenu => "radiomenu",
            ItemType::Sep => "sep",
            ItemType::Invisible => "invisible",
            ItemType::RadioItem => "radioitem",
            ItemType::ExitMenu => "exitmenu",
            ItemType::Login => "login",
            ItemType::SubMenu => "submenu",
        }
    }

    /// Symbol substituted for `%(type)s` in the emitted code.
    pub fn symbol(self) -> &'static str {
        match self {
            ItemType::Run => "OPT_RUN",
            ItemType::Inactive => "OPT_INACTIVE",
            ItemType::Checkbox => "OPT_CHECKBOX",
            ItemType::RadioMenu => "OPT_RADIOMENU",
            ItemType::Sep => "OPT_SEP",
            ItemType::Invisible => "OPT_INVISIBLE",
            ItemType::RadioItem => "OPT_RADIOITEM",
            ItemType::ExitMenu => "OPT_EXITMENU",
            ItemType::Login => "login",
            ItemType::SubMenu => "OPT_SUBMENU",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ItemType> {
        ItemType::ALL.iter().copied().find(|t| t.tag() == tag)
    }
}

/// Attribute table for a record kind.
pub fn attrs(kind: RecordKind) -> &'static [AttrSpec] {
    match kind {
        RecordKind::System => SYSTEM_ATTRS,
        RecordKind::Menu => MENU_ATTRS,
        RecordKind::Entry => ENTRY_ATTRS,
    }
}

/// Position of `name` in the table for `kind`.
pub fn position(kind: RecordKind, name: &str) -> Option<usize> {
    attrs(kind).iter().position(|a| a.name == name)
}

pub fn lookup(kind: RecordKind, name: &str) -> Option<&'static AttrSpec> {
    attrs(kind).iter().find(|a| a.name == name)
}

/// Human-readable list of the attribute names of `kind`, for error messages.
pub fn attr_names(kind: RecordKind) -> String {
    attrs(kind)
        .iter()
        .map(|a| a.name)
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Human-readable list of the entry type tags.
pub fn type_names() -> String {
    ItemType::ALL
        .iter()
        .map(|t| t.tag())
        .collect::<Vec<_>>()
        .join(" OR ")
}

pub fn modifier_symbol(name: &str) -> Option<&'static str> {
    MODIFIERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, symbol)| *symbol)
}
