//! SVG attributes with escaping.

use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Number(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&escape_xml_attr(s)),
            Self::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros.
#[must_use]
pub fn format_number(n: f64) -> String {
    let mut text = format!("{n:.3}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" {
        text = String::from("0");
    }
    text
}

/// Ordered attribute list of one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    attrs: Vec<Attribute>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    #[must_use]
    pub fn set<K: Into<String>, V: Into<AttributeValue>>(mut self, name: K, value: V) -> Self {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn num<K: Into<String>>(self, name: K, value: f64) -> Self {
        self.set(name, value)
    }

    #[must_use]
    pub fn data(self, name: &str, value: &str) -> Self {
        self.set(format!("data-{name}"), value)
    }

    /// Add a class, appending to an existing class attribute.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        for attr in &mut self.attrs {
            if attr.name == "class"
                && let AttributeValue::String(ref mut s) = attr.value
            {
                s.push(' ');
                s.push_str(class);
                return self;
            }
        }
        self.set("class", class)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attrs.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut result = String::new();
        for attr in &self.attrs {
            let _ = write!(result, " {}=\"{}\"", attr.name, attr.value);
        }
        result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

pub(crate) fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape text content. Quotes are left alone.
#[must_use]
pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
