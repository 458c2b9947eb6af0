//! SVG document root.

use std::fmt::{self, Write};

use crate::attributes::{Attributes, escape_xml_attr, escape_xml_text, format_number};
use crate::element::Element;

#[derive(Debug, Clone, Default)]
pub struct SvgDocument {
    attrs: Attributes,
    viewbox: Option<(f64, f64, f64, f64)>,
    width: Option<String>,
    height: Option<String>,
    title: Option<String>,
    desc: Option<String>,
    children: Vec<Element>,
    style: Option<String>,
}

impl SvgDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn viewbox(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.viewbox = Some((x, y, width, height));
        self
    }

    #[must_use]
    pub fn width(mut self, w: &str) -> Self {
        self.width = Some(w.to_string());
        self
    }

    #[must_use]
    pub fn height(mut self, h: &str) -> Self {
        self.height = Some(h.to_string());
        self
    }

    /// Width and height of 100%, scaled through the viewBox.
    #[must_use]
    pub fn responsive(self) -> Self {
        self.width("100%").height("100%")
    }

    /// Add a title and description and mark the root as an image.
    #[must_use]
    pub fn accessible(mut self, title: impl Into<String>, desc: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.desc = Some(desc.into());
        self.attrs = self.attrs.set("role", "img");
        self
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
    pub fn style(mut self, css: impl Into<String>) -> Self {
        self.style = Some(css.into());
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

    pub fn write_to_string(&self, output: &mut String) {
        output.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\"");

        if let Some((x, y, w, h)) = self.viewbox {
            let _ = write!(
                output,
                " viewBox=\"{} {} {} {}\"",
                format_number(x),
                format_number(y),
                format_number(w),
                format_number(h)
            );
        }
        if let Some(ref w) = self.width {
            let _ = write!(output, " width=\"{}\"", escape_xml_attr(w));
        }
        if let Some(ref h) = self.height {
            let _ = write!(output, " height=\"{}\"", escape_xml_attr(h));
        }
        output.push_str(&self.attrs.render());
        output.push('>');

        if let Some(ref title) = self.title {
            let _ = write!(output, "<title>{}</title>", escape_xml_text(title));
        }
        if let Some(ref desc) = self.desc {
            let _ = write!(output, "<desc>{}</desc>", escape_xml_text(desc));
        }
        if let Some(ref css) = self.style {
            let _ = write!(output, "<style>{}</style>", escape_xml_text(css));
        }
        for child in &self.children {
            child.write_to_string(output);
        }

        output.push_str("</svg>");
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::with_capacity(4096);
        self.write_to_string(&mut output);
        f.write_str(&output)
    }
}
