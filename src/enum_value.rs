use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::wordify;

/// The key and label shared by every enumeration value.
///
/// An `EnumValue` is the data each enumeration kind embeds: a `key` that is
/// unique within its kind (compared case-insensitively) and an optional
/// human-readable `label`. When no label is set, [`EnumValue::label`] derives
/// one from the key with [`wordify`].
///
/// Values compare with [`EnumValue::equals`] rather than `==`: equality is by
/// key, ignoring case, so two independently constructed values with keys
/// `"Green"` and `"GREEN"` are the same value.
///
/// # Examples
///
/// ```
/// use smart_enumerations::EnumValue;
///
/// const NET_INCOME: EnumValue = EnumValue::new_static("NetIncome");
/// assert_eq!(NET_INCOME.key(), "NetIncome");
/// assert_eq!(NET_INCOME.label(), "Net Income");
///
/// let labelled = EnumValue::with_label("USD", "US Dollar");
/// assert_eq!(labelled.label(), "US Dollar");
/// assert!(labelled.equals(&EnumValue::new("usd")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct EnumValue {
    key: Cow<'static, str>,
    label: Option<Cow<'static, str>>,
}

impl EnumValue {
    /// Creates a value with the given key and no explicit label.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: Cow::Owned(key.into()), label: None }
    }

    /// Creates a value with the given key and explicit label.
    pub fn with_label(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: Cow::Owned(key.into()),
            label: Some(Cow::Owned(label.into())),
        }
    }

    /// Const constructor for values declared as associated constants.
    pub const fn new_static(key: &'static str) -> Self {
        Self { key: Cow::Borrowed(key), label: None }
    }

    /// Const constructor with an explicit label.
    pub const fn with_static_label(key: &'static str, label: &'static str) -> Self {
        Self {
            key: Cow::Borrowed(key),
            label: Some(Cow::Borrowed(label)),
        }
    }

    /// The key, unique within its kind up to case.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the key. Values declared as constants keep theirs.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Cow::Owned(key.into());
    }

    /// Returns the label set on this value, if it is set and non-empty.
    pub fn explicit_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// Returns the display label.
    ///
    /// An explicit label is returned verbatim. Otherwise the label is derived
    /// from the key on every call; the derived form is not stored.
    pub fn label(&self) -> Cow<'_, str> {
        match self.explicit_label() {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(wordify(&self.key)),
        }
    }

    /// Sets an explicit label. An empty label restores the derived one.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(Cow::Owned(label.into()));
    }

    /// The textual representation of this value: its label.
    pub fn display_label(&self) -> String {
        self.label().into_owned()
    }

    /// Returns true if both keys are equal ignoring case.
    pub fn equals(&self, other: &EnumValue) -> bool {
        std::ptr::eq(self, other) || keys_match(&self.key, &other.key)
    }

    /// Feeds a hash of the case-folded key into `state`.
    ///
    /// Values that are [`equals`](Self::equals) produce the same hash. An
    /// empty key hashes to a fixed sentinel.
    pub fn hash_key<H: Hasher>(&self, state: &mut H) {
        if self.key.is_empty() {
            0u8.hash(state);
            return;
        }
        1u8.hash(state);
        for c in self.key.chars().flat_map(char::to_uppercase) {
            c.hash(state);
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Case-insensitive key comparison using Unicode uppercase folding.
pub(crate) fn keys_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_uppercase)
        .eq(b.chars().flat_map(char::to_uppercase))
}
