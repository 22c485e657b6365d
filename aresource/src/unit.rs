//! A single `<string>` entry of an Android resource file.

use serde::Serialize;

use crate::{
    error::EscapeError,
    escape::{Decoded, decode, encode},
};

/// One named string resource.
///
/// The unit keeps the escaped storage text exactly as it appears in the file;
/// the logical value is produced on demand by [`AndroidResourceUnit::target`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AndroidResourceUnit {
    /// The `name` attribute.
    pub name: Option<String>,
    /// Escaped storage text, `None` when the element has no text content.
    pub text: Option<String>,
    /// Logical source string, filled in from a base resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translatable: Option<bool>,
    /// Attributes other than `name` and `translatable`, in document order.
    #[serde(skip)]
    pub attributes: Vec<(String, String)>,
    /// Serialized XML from the first child element up to the end tag. Only
    /// the text before it is the unit's value.
    #[serde(skip)]
    pub markup: Option<String>,
}

impl AndroidResourceUnit {
    /// Creates a unit identified by its source text.
    pub fn new(source: Option<&str>) -> Self {
        AndroidResourceUnit {
            name: source.map(str::to_owned),
            text: None,
            source: source.map(str::to_owned),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The context of a resource is its name as well.
    pub fn context(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.name = Some(id.into());
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Decodes the storage text, including the format-specifier flag.
    pub fn decoded(&self) -> Result<Decoded, EscapeError> {
        decode(self.text.as_deref(), self.id().unwrap_or_default())
    }

    /// The logical (translatable) value of this unit.
    pub fn target(&self) -> Result<Option<String>, EscapeError> {
        self.decoded().map(|d| d.value)
    }

    /// Whether the value is used with printf-style substitution.
    pub fn is_formatted(&self) -> Result<bool, EscapeError> {
        self.decoded().map(|d| d.formatted)
    }

    /// Escapes `target` and stores it as the new text of the unit.
    pub fn set_target(&mut self, target: Option<&str>) {
        self.text = encode(target);
    }
}
