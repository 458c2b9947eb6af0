#![forbid(unsafe_code)]

//! Terminal output for chord diagrams.
//!
//! Drawings from `cm-render` are rasterized onto a Braille, block or
//! half-block sub-cell canvas, or onto a plain ASCII glyph grid.

mod ascii;
mod canvas;
mod config;
mod renderer;

pub use ascii::{GlyphGrid, Stroke, merge_glyph};
pub use canvas::Canvas;
pub use config::{ParseRenderModeError, RenderMode, TermRenderConfig};
pub use renderer::{
    TermRenderResult, TermSurface, render_drawing_term, render_term, render_term_result,
};
