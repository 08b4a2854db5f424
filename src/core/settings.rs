//! Run settings.
//!
//! Each command-line option becomes a [`Setting`] carrying its value and a
//! validity tag. Validation is a pure function of the setting, and the
//! settings list lives on the run context rather than in global state.

use std::fmt;
use std::path::Path;

/// Validation state of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    #[default]
    Unknown,
    Validated,
    Invalid,
}

impl Validity {
    /// Single-character marker used in tables.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Validated => "✓",
            Self::Invalid => "✗",
            Self::Unknown => "?",
        }
    }
}

/// How a setting's value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any value is accepted.
    Any,
    /// Must be `true` or `false`.
    Bool,
    /// Must name an existing file.
    ExistingFile,
    /// Must be a path whose parent directory exists.
    WritablePath,
}

/// One named setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: String,
    pub description: String,
    pub validity: Validity,
    pub hidden: bool,
    pub rule: Rule,
}

impl Setting {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
        rule: Rule,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
            validity: Validity::Unknown,
            hidden: false,
            rule,
        }
    }

    /// Builder for hidden settings.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Change the value, which makes it unvalidated again.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            validity: Validity::Unknown,
            ..self
        }
    }

    /// Return the setting with its validity recomputed.
    pub fn validated(self) -> Self {
        let validity = validate(&self);
        Self { validity, ..self }
    }

    pub fn as_bool(&self) -> bool {
        self.value.eq_ignore_ascii_case("true")
    }
}

/// Compute a setting's validity.
///
/// Hidden settings are never shown or acted on, so they always validate.
pub fn validate(setting: &Setting) -> Validity {
    if setting.hidden {
        return Validity::Validated;
    }
    if setting.value.is_empty() {
        return Validity::Invalid;
    }

    let ok = match setting.rule {
        Rule::Any => true,
        Rule::Bool => {
            setting.value.eq_ignore_ascii_case("true") || setting.value.eq_ignore_ascii_case("false")
        }
        Rule::ExistingFile => Path::new(&setting.value).is_file(),
        Rule::WritablePath => {
            let path = Path::new(&setting.value);
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
                _ => true,
            }
        }
    };

    if ok {
        Validity::Validated
    } else {
        Validity::Invalid
    }
}

/// Ordered settings list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    items: Vec<Setting>,
}

impl Settings {
    pub fn new(items: Vec<Setting>) -> Self {
        Self { items }
    }

    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.items.iter().find(|s| s.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|s| s.value.as_str())
    }

    /// Settings the user should see, in their original order.
    pub fn visible(&self) -> impl Iterator<Item = &Setting> {
        self.items.iter().filter(|s| !s.hidden)
    }

    /// Revalidate every setting.
    pub fn validated(self) -> Self {
        Self {
            items: self.items.into_iter().map(Setting::validated).collect(),
        }
    }

    /// True when no visible setting is invalid.
    ///
    /// Unknown settings do not count as errors.
    pub fn error_free(&self) -> bool {
        self.visible().all(|s| s.validity != Validity::Invalid)
    }

    /// Invalid visible settings.
    pub fn invalid(&self) -> impl Iterator<Item = &Setting> {
        self.visible().filter(|s| s.validity == Validity::Invalid)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} [{}]", self.name, self.value, self.validity.marker())
    }
}
