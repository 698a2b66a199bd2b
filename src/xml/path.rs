use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A Windows path, independent of the host operating system.
///
/// Paths recorded by the acquisition software are stored, never opened, so
/// they keep Windows semantics everywhere: both `\` and `/` separate
/// components, and comparison ignores ASCII case.
#[derive(Clone)]
pub struct WindowsPath {
    raw: String,
}

impl WindowsPath {
    /// Create a path, normalising separators to `\`
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut raw = String::with_capacity(path.as_ref().len());
        let mut previous_separator = false;
        for (idx, c) in path.as_ref().chars().enumerate() {
            let is_separator = c == '\\' || c == '/';
            // Keep a leading `\\` for UNC paths; collapse repeats elsewhere.
            if is_separator && previous_separator && idx > 1 {
                continue;
            }
            raw.push(if is_separator { '\\' } else { c });
            previous_separator = is_separator;
        }
        if raw.len() > 1 && raw.ends_with('\\') && !raw.ends_with(":\\") {
            raw.pop();
        }
        Self { raw }
    }

    /// The path as a string, with `\` separators
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Drive prefix such as `D:`, if present
    pub fn drive(&self) -> Option<&str> {
        let bytes = self.raw.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            Some(&self.raw[..2])
        } else {
            None
        }
    }

    /// Path components, excluding the drive and root separator
    pub fn components(&self) -> impl Iterator<Item = &str> {
        let rest = match self.drive() {
            Some(drive) => &self.raw[drive.len()..],
            None => self.raw.as_str(),
        };
        rest.split('\\').filter(|part| !part.is_empty())
    }

    /// Final component of the path
    pub fn file_name(&self) -> Option<&str> {
        self.components().last()
    }

    /// Final component without its extension
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => Some(name),
            Some(idx) => Some(&name[..idx]),
        }
    }

    /// Extension of the final component, without the dot
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Path without its final component
    pub fn parent(&self) -> Option<WindowsPath> {
        let idx = self.raw.rfind('\\')?;
        let parent = &self.raw[..idx];
        if parent.is_empty() {
            return Some(WindowsPath::new("\\"));
        }
        if parent.len() == 2 && parent.ends_with(':') {
            return Some(WindowsPath::new(format!("{}\\", parent)));
        }
        Some(WindowsPath::new(parent))
    }
}

impl PartialEq for WindowsPath {
    fn eq(&self, other: &Self) -> bool {
        self.raw.eq_ignore_ascii_case(&other.raw)
    }
}

impl Eq for WindowsPath {}

impl fmt::Debug for WindowsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowsPath({:?})", self.raw)
    }
}

impl fmt::Display for WindowsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for WindowsPath {
    fn from(path: &str) -> Self {
        WindowsPath::new(path)
    }
}

impl Serialize for WindowsPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for WindowsPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(WindowsPath::new(raw))
    }
}
