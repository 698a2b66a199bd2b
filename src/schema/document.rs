use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use super::SchemaError;

/// Type of a leaf element or attribute value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Any text
    #[default]
    String,
    /// Signed integer
    Int,
    /// Floating-point number
    Float,
    /// Vendor boolean (`-1` or a boolean word)
    Bool,
    /// ISO 8601 timestamp with offset
    Datetime,
    /// Element with its own rule, validated recursively
    Element,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Datetime => "datetime",
            ValueType::Element => "element",
        };
        f.write_str(name)
    }
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

/// Occurrence rule for a child element
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildRule {
    /// Local name of the child
    pub name: String,
    /// Value type of the child
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Minimum number of occurrences
    #[serde(default = "one")]
    pub min: u32,
    /// Maximum number of occurrences
    #[serde(default = "one")]
    pub max: u32,
    /// No upper bound on occurrences; overrides `max`
    #[serde(default)]
    pub unbounded: bool,
}

impl ChildRule {
    /// Whether more than one occurrence is allowed
    pub fn repeats(&self) -> bool {
        self.unbounded || self.max > 1
    }

    pub(crate) fn allows(&self, count: u32) -> bool {
        count >= self.min && (self.unbounded || count <= self.max)
    }
}

/// Rule for an attribute
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeRule {
    /// Local name of the attribute
    pub name: String,
    /// Value type of the attribute
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Whether the attribute must be present
    #[serde(default = "yes")]
    pub required: bool,
}

/// Structure of one element
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementRule {
    /// Allow children not listed in `children`
    #[serde(default)]
    pub open: bool,
    /// Declared children
    #[serde(default)]
    pub children: Vec<ChildRule>,
    /// Declared attributes
    #[serde(default)]
    pub attributes: Vec<AttributeRule>,
}

impl ElementRule {
    /// Rule for the child with the given name
    pub fn child(&self, name: &str) -> Option<&ChildRule> {
        self.children.iter().find(|rule| rule.name == name)
    }
}

/// A structural schema for one metadata file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Expected local name of the root element
    pub root: String,
    /// Rules by element name
    #[serde(default)]
    pub elements: HashMap<String, ElementRule>,
}

impl SchemaDocument {
    /// Parse a schema document from TOML
    pub fn from_toml(name: &str, source: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = toml::from_str(source).map_err(|e| SchemaError::Load {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        document.check(name)?;
        Ok(document)
    }

    /// Rule for the element with the given name
    pub fn element(&self, name: &str) -> Option<&ElementRule> {
        self.elements.get(name)
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        let invalid = |message: String| SchemaError::Invalid {
            name: name.to_string(),
            message,
        };

        if !self.elements.contains_key(&self.root) {
            return Err(invalid(format!("no rule for root element {}", self.root)));
        }

        for (element_name, rule) in &self.elements {
            for child in &rule.children {
                if child.value_type == ValueType::Element
                    && !self.elements.contains_key(&child.name)
                {
                    return Err(invalid(format!(
                        "{} declares element child {} without a rule",
                        element_name, child.name
                    )));
                }
                if !child.unbounded && child.max < child.min {
                    return Err(invalid(format!(
                        "{}/{}: max is below min",
                        element_name, child.name
                    )));
                }
            }
            if rule
                .attributes
                .iter()
                .any(|attribute| attribute.value_type == ValueType::Element)
            {
                return Err(invalid(format!(
                    "{} declares an attribute of type element",
                    element_name
                )));
            }
        }

        Ok(())
    }
}
