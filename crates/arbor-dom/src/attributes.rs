/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// A `name="value"` pair. Names keep their source casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The attribute name.
    pub name: String,
    /// The attribute value; empty for bare attributes such as `disabled`.
    pub value: String,
}

impl Attr {
    /// Create a new attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 4.9.1 Interface NamedNodeMap](https://dom.spec.whatwg.org/#interface-namednodemap)
///
/// Attributes in insertion order, unique by exact name. Replacing an existing
/// attribute keeps its position, so serialization order is stable under edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedNodeMap {
    attrs: Vec<Attr>,
}

impl NamedNodeMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// The attribute at `index` in insertion order.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attrs.get(index)
    }

    /// The attribute called `name`.
    #[must_use]
    pub fn get_named_item(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// The value of the attribute called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_named_item(name).map(|attr| attr.value.as_str())
    }

    /// Whether an attribute called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get_named_item(name).is_some()
    }

    /// Insert `attr`, replacing the value of a same-named attribute in place.
    ///
    /// Returns the replaced attribute, if any.
    pub fn set_named_item(&mut self, attr: Attr) -> Option<Attr> {
        match self.attrs.iter_mut().find(|existing| existing.name == attr.name) {
            Some(existing) => Some(std::mem::replace(existing, attr)),
            None => {
                self.attrs.push(attr);
                None
            }
        }
    }

    /// Shorthand for [`NamedNodeMap::set_named_item`] with a fresh [`Attr`].
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<Attr> {
        self.set_named_item(Attr::new(name, value))
    }

    /// Remove the attribute called `name`, returning it.
    pub fn remove_named_item(&mut self, name: &str) -> Option<Attr> {
        let index = self.attrs.iter().position(|attr| attr.name == name)?;
        Some(self.attrs.remove(index))
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.attrs.iter()
    }
}

impl<'a> IntoIterator for &'a NamedNodeMap {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Attr> for NamedNodeMap {
    fn from_iter<I: IntoIterator<Item = Attr>>(iter: I) -> Self {
        let mut map = Self::new();
        for attr in iter {
            let _ = map.set_named_item(attr);
        }
        map
    }
}
