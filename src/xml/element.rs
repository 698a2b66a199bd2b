//! Owned XML element tree built from `quick-xml` pull events.
//!
//! The metadata files in a run directory are small (kilobytes), so each one
//! is read completely into an [`XmlElement`] tree before any record is built.
//! Element and attribute names are stored as local names; the resolved
//! namespace URI is kept alongside for reference.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::ParseError;

/// A parsed XML element with its attributes, children and text content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Create an empty element with the given local name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append a leaf child element containing only text
    pub fn with_text_child(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(XmlElement::new(name).with_text(text))
    }

    /// Parse a complete XML document and return its root element
    pub fn parse_str(xml: &str) -> Result<Self, ParseError> {
        let xml = xml.trim_start_matches('\u{feff}');
        let mut reader = NsReader::from_str(xml);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = match resolved {
                ResolveResult::Bound(ns) => Some(String::from_utf8(ns.as_ref().to_vec())?),
                _ => None,
            };

            match event {
                Event::Start(ref e) => {
                    stack.push(Self::from_start(e, namespace)?);
                }
                Event::Empty(ref e) => {
                    let element = Self::from_start(e, namespace)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        Self::attach(&mut stack, &mut root, element)?;
                    }
                }
                Event::Text(ref t) => {
                    let text = t.unescape()?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(ParseError::ContentOutsideRoot(text.into_owned())),
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8(c.into_inner().into_owned())?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = stack.pop() {
            return Err(ParseError::UnclosedElement(unclosed.name));
        }

        root.ok_or(ParseError::EmptyDocument)
    }

    /// Read and parse an XML file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    fn from_start(e: &BytesStart, namespace: Option<String>) -> Result<Self, ParseError> {
        let name = String::from_utf8(e.local_name().as_ref().to_vec())?;

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8(attr.key.local_name().as_ref().to_vec())?;
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            namespace,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn attach(
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<(), ParseError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_some() => {
                return Err(ParseError::ContentOutsideRoot(format!("<{}>", element.name)));
            }
            None => *root = Some(element),
        }
        Ok(())
    }

    /// Local name of the element
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI the element name is bound to, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Text content exactly as written (entities unescaped, whitespace kept)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the attribute with the given local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a mandatory attribute
    pub fn require_attribute(&self, name: &str) -> Result<&str, ParseError> {
        self.attribute(name)
            .ok_or_else(|| ParseError::MissingAttribute {
                element: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// All child elements in document order
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Child elements with the given local name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First child element with the given local name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// First child element with the given local name, which must exist
    pub fn require_child(&self, name: &str) -> Result<&XmlElement, ParseError> {
        self.child(name).ok_or_else(|| ParseError::MissingElement {
            parent: self.name.clone(),
            name: name.to_string(),
        })
    }

    /// Text of the first child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text)
    }

    /// Text of a mandatory child element
    pub fn require_text(&self, name: &str) -> Result<&str, ParseError> {
        self.require_child(name).map(XmlElement::text)
    }

    /// Version number of the document, read from a `Version` child element
    /// or, failing that, a `Version` attribute
    pub fn version_text(&self) -> Result<&str, ParseError> {
        if let Some(version) = self.child_text("Version") {
            return Ok(version);
        }
        self.attribute("Version")
            .ok_or_else(|| ParseError::MissingElement {
                parent: self.name.clone(),
                name: "Version".to_string(),
            })
    }
}
