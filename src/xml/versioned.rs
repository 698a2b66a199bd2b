use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::coerce::to_int;
use super::{FromXml, ParseError, XmlElement};

/// An ordered list of records tagged with the version of the file it was read from.
///
/// Equality compares items only; two lists read from files with different
/// version numbers but identical records are equal. A `VersionedList` also
/// compares equal to a plain `Vec` or slice holding the same items.
///
/// Lists are populated once while a document is parsed and are not meant to be
/// mutated concurrently afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedList<T> {
    version: u32,
    items: Vec<T>,
}

impl<T> VersionedList<T> {
    /// Create an empty list
    pub fn new(version: u32) -> Self {
        Self {
            version,
            items: Vec::new(),
        }
    }

    /// Create a list from existing items
    pub fn with_items(version: u32, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            version,
            items: items.into_iter().collect(),
        }
    }

    /// Create an empty list using the `Version` of `element`.
    ///
    /// Items are not read here; call [`append_from_element`](Self::append_from_element)
    /// once any other top-level fields have been read.
    pub fn from_xml_element(element: &XmlElement) -> Result<Self, ParseError> {
        let version = to_int(element.version_text()?)
            .map_err(|e| ParseError::field("Version", e))?;
        Ok(Self::new(version))
    }

    /// Version number of the file the items were read from
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Items in document order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Append an item
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Consume the list, returning its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: FromXml> VersionedList<T> {
    /// Build an item from every child of `element` named `child_tag` and
    /// append it, in document order
    pub fn append_from_element(
        &mut self,
        element: &XmlElement,
        child_tag: &str,
    ) -> Result<&mut Self, ParseError> {
        for child in element.children_named(child_tag) {
            self.items.push(T::from_xml(child)?);
        }
        Ok(self)
    }
}

impl<T> Default for VersionedList<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> Deref for VersionedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for VersionedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a VersionedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Extend<T> for VersionedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T: PartialEq> PartialEq for VersionedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for VersionedList<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}

impl<T: PartialEq> PartialEq<[T]> for VersionedList<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

impl<T: PartialEq> PartialEq<&[T]> for VersionedList<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.items.as_slice() == *other
    }
}

impl<T: PartialEq> PartialEq<VersionedList<T>> for Vec<T> {
    fn eq(&self, other: &VersionedList<T>) -> bool {
        self == &other.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u32);

    impl FromXml for Item {
        fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
            let id = element.require_attribute("Id")?;
            Ok(Item(to_int(id).map_err(|e| ParseError::field("Id", e))?))
        }
    }

    fn document() -> XmlElement {
        XmlElement::new("Items")
            .with_text_child("Version", "3")
            .with_child(XmlElement::new("Item").with_attribute("Id", "1"))
            .with_child(XmlElement::new("Other"))
            .with_child(XmlElement::new("Item").with_attribute("Id", "2"))
    }

    #[test]
    fn test_from_xml_element_does_not_populate() {
        let list = VersionedList::<Item>::from_xml_element(&document()).unwrap();
        assert_eq!(list.version(), 3);
        assert!(list.is_empty());
    }

    #[test]
    fn test_append_from_element_keeps_order() {
        let element = document();
        let mut list = VersionedList::<Item>::from_xml_element(&element).unwrap();
        list.append_from_element(&element, "Item").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], Item(1));
        assert_eq!(list[1], Item(2));
    }

    #[test]
    fn test_equality_ignores_version() {
        let a = VersionedList::with_items(1, vec![Item(1), Item(2)]);
        let b = VersionedList::with_items(7, vec![Item(1), Item(2)]);
        assert_eq!(a, b);
        assert_eq!(a, vec![Item(1), Item(2)]);
        assert_eq!(vec![Item(1), Item(2)], a);
        assert_eq!(a, [Item(1), Item(2)][..]);
        assert_ne!(a, vec![Item(2), Item(1)]);
        assert_ne!(a, VersionedList::with_items(1, vec![Item(1)]));
    }

    #[test]
    fn test_missing_or_bad_version() {
        let missing = XmlElement::new("Items");
        assert!(matches!(
            VersionedList::<Item>::from_xml_element(&missing),
            Err(ParseError::MissingElement { .. })
        ));

        let negative = XmlElement::new("Items").with_text_child("Version", "-1");
        assert!(matches!(
            VersionedList::<Item>::from_xml_element(&negative),
            Err(ParseError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_item_errors_propagate() {
        let element = XmlElement::new("Items")
            .with_text_child("Version", "1")
            .with_child(XmlElement::new("Item"));
        let mut list = VersionedList::<Item>::from_xml_element(&element).unwrap();
        assert!(list.append_from_element(&element, "Item").is_err());
    }
}
