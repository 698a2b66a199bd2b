use std::collections::HashMap;

use super::document::{ElementRule, SchemaDocument, ValueType};
use super::SchemaError;
use crate::xml::{parse_vendor_datetime, to_bool, to_float, to_int, XmlElement};

/// Validate a document tree against `document`, stopping at the first violation
pub(crate) fn validate_document(
    document: &SchemaDocument,
    root: &XmlElement,
) -> Result<(), SchemaError> {
    let path = format!("/{}", root.name());
    if root.name() != document.root {
        return Err(SchemaError::violation(
            path,
            format!("expected root element <{}>", document.root),
        ));
    }
    let rule = rule_for(document, &document.root, &path)?;
    validate_element(document, rule, root, &path)
}

fn rule_for<'d>(
    document: &'d SchemaDocument,
    name: &str,
    path: &str,
) -> Result<&'d ElementRule, SchemaError> {
    document
        .element(name)
        .ok_or_else(|| SchemaError::violation(path, format!("no rule for <{}>", name)))
}

fn validate_element(
    document: &SchemaDocument,
    rule: &ElementRule,
    element: &XmlElement,
    path: &str,
) -> Result<(), SchemaError> {
    for attribute in &rule.attributes {
        match element.attribute(&attribute.name) {
            Some(value) => check_value(attribute.value_type, value).map_err(|message| {
                SchemaError::violation(format!("{}/@{}", path, attribute.name), message)
            })?,
            None if attribute.required => {
                return Err(SchemaError::violation(
                    path,
                    format!("missing required attribute {}", attribute.name),
                ))
            }
            None => {}
        }
    }

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for child in element.children() {
        let count = {
            let count = counts.entry(child.name()).or_insert(0);
            *count += 1;
            *count
        };

        let Some(child_rule) = rule.child(child.name()) else {
            if rule.open {
                continue;
            }
            return Err(SchemaError::violation(
                format!("{}/{}", path, child.name()),
                "element is not allowed here",
            ));
        };

        let child_path = if child_rule.repeats() {
            format!("{}/{}[{}]", path, child.name(), count)
        } else {
            format!("{}/{}", path, child.name())
        };

        if !child_rule.unbounded && count > child_rule.max {
            return Err(SchemaError::violation(
                child_path,
                format!("at most {} occurrence(s) allowed", child_rule.max),
            ));
        }

        if child_rule.value_type == ValueType::Element {
            let child_element_rule = rule_for(document, child.name(), &child_path)?;
            validate_element(document, child_element_rule, child, &child_path)?;
        } else {
            if let Some(nested) = child.children().first() {
                return Err(SchemaError::violation(
                    child_path,
                    format!(
                        "unexpected element <{}> in a {} value",
                        nested.name(),
                        child_rule.value_type
                    ),
                ));
            }
            check_value(child_rule.value_type, child.text())
                .map_err(|message| SchemaError::violation(child_path, message))?;
        }
    }

    for child_rule in &rule.children {
        let found = counts.get(child_rule.name.as_str()).copied().unwrap_or(0);
        if !child_rule.allows(found) {
            return Err(SchemaError::violation(
                path,
                format!(
                    "expected at least {} <{}> element(s), found {}",
                    child_rule.min, child_rule.name, found
                ),
            ));
        }
    }

    Ok(())
}

fn check_value(value_type: ValueType, text: &str) -> Result<(), String> {
    let result = match value_type {
        ValueType::String | ValueType::Element => Ok(()),
        ValueType::Int => to_int::<i64>(text).map(|_| ()),
        ValueType::Float => to_float(text).map(|_| ()),
        ValueType::Bool => to_bool(text).map(|_| ()),
        ValueType::Datetime => parse_vendor_datetime(text).map(|_| ()),
    };
    result.map_err(|e| format!("expected {} value: {}", value_type, e))
}
