#![forbid(unsafe_code)]

//! Chord diagram rendering.
//!
//! [`render_chord`] turns a [`cm_core::ChordShape`] and a [`RenderGeometry`]
//! into a [`ChordDrawing`]: a fixed, ordered list of [`DrawPrimitive`]s in
//! grid units. Any UI layer implementing [`Surface`] can then [`paint`] it.

pub mod canvas;
mod geometry;
mod primitive;
mod renderer;
mod surface;

pub use geometry::{DEFAULT_FRET_ROWS, Point, RenderGeometry};
pub use primitive::{ChordDrawing, DiagramMode, DrawPrimitive, Style};
pub use renderer::render_chord;
pub use surface::{RecordingSurface, Surface, SurfaceCall, paint};
