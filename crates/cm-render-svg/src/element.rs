//! SVG elements with a fluent builder API.

use std::fmt::Write;

use crate::attributes::{Attributes, escape_xml_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Rect,
    Circle,
    Line,
    Text,
    Group,
}

impl ElementKind {
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Text => "text",
            Self::Group => "g",
        }
    }

    #[must_use]
    pub const fn is_self_closing(self) -> bool {
        matches!(self, Self::Rect | Self::Circle | Self::Line)
    }
}

/// An SVG element with attributes and optional children or text.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    attrs: Attributes,
    children: Vec<Element>,
    text_content: Option<String>,
}

macro_rules! numeric_setters {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[must_use]
            pub fn $method(mut self, value: f64) -> Self {
                self.attrs = self.attrs.num($name, value);
                self
            }
        )*
    };
}

impl Element {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            children: Vec::new(),
            text_content: None,
        }
    }

    #[must_use]
    pub fn rect() -> Self {
        Self::new(ElementKind::Rect)
    }

    #[must_use]
    pub fn circle() -> Self {
        Self::new(ElementKind::Circle)
    }

    #[must_use]
    pub fn line() -> Self {
        Self::new(ElementKind::Line)
    }

    #[must_use]
    pub fn text() -> Self {
        Self::new(ElementKind::Text)
    }

    #[must_use]
    pub fn group() -> Self {
        Self::new(ElementKind::Group)
    }

    numeric_setters! {
        x => "x",
        y => "y",
        width => "width",
        height => "height",
        cx => "cx",
        cy => "cy",
        r => "r",
        x1 => "x1",
        y1 => "y1",
        x2 => "x2",
        y2 => "y2",
        stroke_width => "stroke-width",
        font_size => "font-size",
    }

    #[must_use]
    pub fn fill(self, color: &str) -> Self {
        self.attr("fill", color)
    }

    #[must_use]
    pub fn stroke(self, color: &str) -> Self {
        self.attr("stroke", color)
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.attrs = self.attrs.class(class);
        self
    }

    #[must_use]
    pub fn data(mut self, name: &str, value: &str) -> Self {
        self.attrs = self.attrs.data(name, value);
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs = self.attrs.set(name, value);
        self
    }

    #[must_use]
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, elem: Element) -> Self {
        self.children.push(elem);
        self
    }

    #[must_use]
    pub fn children<I: IntoIterator<Item = Element>>(mut self, elems: I) -> Self {
        self.children.extend(elems);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub const fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(128);
        self.write_to_string(&mut output);
        output
    }

    pub fn write_to_string(&self, output: &mut String) {
        let tag = self.kind.tag_name();
        let _ = write!(output, "<{tag}");
        output.push_str(&self.attrs.render());

        if self.kind.is_self_closing() && self.children.is_empty() && self.text_content.is_none() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        if let Some(ref text) = self.text_content {
            output.push_str(&escape_xml_text(text));
        }
        for child in &self.children {
            child.write_to_string(output);
        }
        let _ = write!(output, "</{tag}>");
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, ElementKind};

    #[test]
    fn creates_line() {
        let svg = Element::line()
            .x1(50.0)
            .y1(100.0)
            .x2(50.0)
            .y2(500.0)
            .stroke("#000")
            .stroke_width(2.0)
            .render();
        assert_eq!(
            svg,
            "<line x1=\"50\" y1=\"100\" x2=\"50\" y2=\"500\" stroke=\"#000\" stroke-width=\"2\"/>"
        );
    }

    #[test]
    fn creates_circle() {
        let svg = Element::circle().cx(50.0).cy(150.0).r(25.0).fill("#000").render();
        assert!(svg.starts_with("<circle"));
        assert!(svg.contains("r=\"25\""));
        assert!(svg.ends_with("/>"));
    }

    #[test]
    fn text_content_is_escaped_and_closed() {
        let svg = Element::text().x(10.0).y(78.5).content("5 & up").render();
        assert_eq!(svg, "<text x=\"10\" y=\"78.5\">5 &amp; up</text>");
    }

    #[test]
    fn group_wraps_children() {
        let group = Element::group()
            .class("cm-grid")
            .child(Element::line())
            .child(Element::line());
        assert_eq!(group.kind(), ElementKind::Group);
        let svg = group.render();
        assert!(svg.starts_with("<g class=\"cm-grid\">"));
        assert!(svg.ends_with("</g>"));
        assert_eq!(svg.matches("<line/>").count(), 2);
    }
}
