#![forbid(unsafe_code)]

//! Core data model for chord-o-matic.
//!
//! A [`ChordShape`] holds one fingering of a chord: six per-string fret
//! positions decoded from a compact symbol encoding plus an optional barre.
//! The [`ChordCatalog`] is the immutable table of keys and shapes loaded once
//! at start-up, and [`SongBuilder`] assembles a song from key and suffix
//! selections. An [`Arrangement`] lays chords out in repeated sections and
//! flattens them into a beat [`Timeline`] for playback.

mod arrangement;
mod catalog;
mod playback;
mod shape;
mod song;

pub use arrangement::{
    Arrangement, DEFAULT_BEATS, DEFAULT_TEMPO, MAX_REPEAT, MAX_TEMPO, Section, SectionEvent,
    TimedEvent, Timeline,
};
pub use catalog::{ChordCatalog, Key, builtin_catalog, enharmonic};
pub use playback::{PlaybackService, SongPlayer};
pub use shape::{ChordShape, FretPosition, ShapeRecord, classify_symbol};
pub use song::{SelectionEvent, Song, SongBuilder, SongChord, SongChordAddResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of strings on the instrument. Every encoding carries one symbol per string.
pub const STRING_COUNT: usize = 6;

/// Highest fret a single encoding symbol can represent (`'o'`).
pub const MAX_FRET: u8 = 24;

/// Highest fretting-hand finger number (index = 1, little = 4).
pub const MAX_FINGER: u8 = 4;

/// Highest fret that still fits the fixed window below the nut.
pub const ABSOLUTE_FRET_WINDOW: u8 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ChordErrorCode {
    #[default]
    Encoding,
    Length,
    FretRange,
    Barre,
    Finger,
    StringRange,
    IndexRange,
    UnknownKey,
    UnknownSuffix,
    Geometry,
    Catalog,
}

impl ChordErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encoding => "chord/error/encoding",
            Self::Length => "chord/error/length",
            Self::FretRange => "chord/error/fret-range",
            Self::Barre => "chord/error/barre",
            Self::Finger => "chord/error/finger",
            Self::StringRange => "chord/error/string-range",
            Self::IndexRange => "chord/error/index-range",
            Self::UnknownKey => "chord/error/unknown-key",
            Self::UnknownSuffix => "chord/error/unknown-suffix",
            Self::Geometry => "chord/error/geometry",
            Self::Catalog => "chord/error/catalog",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum ChordError {
    #[error(
        "invalid fret symbol '{symbol}' on string {string}; expected 'x', '0'-'9' or 'a'-'o'"
    )]
    InvalidEncoding { symbol: char, string: usize },
    #[error("fret encoding has {found} symbols, expected {expected}")]
    InvalidLength { expected: usize, found: usize },
    #[error("fret {fret} on string {string} is outside 1..={max}", max = MAX_FRET)]
    InvalidFret { fret: u8, string: usize },
    #[error("barre fret {fret} is outside 0..={max}", max = MAX_FRET)]
    InvalidBarre { fret: u8 },
    #[error("finger {finger} on string {string} is outside 0..={max}", max = MAX_FINGER)]
    InvalidFinger { finger: u8, string: usize },
    #[error("string {index} does not exist on a {strings}-string shape")]
    StringOutOfRange { index: usize, strings: usize },
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unknown chord suffix '{0}'")]
    UnknownSuffix(String),
    #[error("invalid render geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid chord catalog: {0}")]
    Catalog(String),
}

impl ChordError {
    #[must_use]
    pub const fn code(&self) -> ChordErrorCode {
        match self {
            Self::InvalidEncoding { .. } => ChordErrorCode::Encoding,
            Self::InvalidLength { .. } => ChordErrorCode::Length,
            Self::InvalidFret { .. } => ChordErrorCode::FretRange,
            Self::InvalidBarre { .. } => ChordErrorCode::Barre,
            Self::InvalidFinger { .. } => ChordErrorCode::Finger,
            Self::StringOutOfRange { .. } => ChordErrorCode::StringRange,
            Self::IndexOutOfRange { .. } => ChordErrorCode::IndexRange,
            Self::UnknownKey(_) => ChordErrorCode::UnknownKey,
            Self::UnknownSuffix(_) => ChordErrorCode::UnknownSuffix,
            Self::InvalidGeometry(_) => ChordErrorCode::Geometry,
            Self::Catalog(_) => ChordErrorCode::Catalog,
        }
    }
}
