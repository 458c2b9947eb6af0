//! Song assembly from key and chord selections.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ChordCatalog, ChordError, ChordShape, Key};

/// A key paired with a chord suffix. Two song chords are the same chord when
/// their combined names match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongChord {
    key: Key,
    suffix: String,
}

impl SongChord {
    #[must_use]
    pub fn new(key: Key, suffix: impl Into<String>) -> Self {
        Self {
            key,
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Key name followed by suffix, e.g. `"Amaj"`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}", self.key, self.suffix)
    }

    fn name_parts(&self) -> impl Iterator<Item = char> + '_ {
        self.key.name().chars().chain(self.suffix.chars())
    }
}

impl PartialEq for SongChord {
    fn eq(&self, other: &Self) -> bool {
        self.name_parts().eq(other.name_parts())
    }
}

impl Eq for SongChord {}

impl Hash for SongChord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for ch in self.name_parts() {
            ch.hash(state);
        }
    }
}

impl fmt::Display for SongChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key, self.suffix)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SongChordAddResult {
    Added,
    AlreadyPresent,
}

impl SongChordAddResult {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::AlreadyPresent => "already-present",
        }
    }

    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Ordered list of song chords, newest first, without duplicates.
///
/// Deserialization drops repeated chords, keeping the first occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<SongChord>", into = "Vec<SongChord>")]
pub struct Song {
    chords: Vec<SongChord>,
}

impl Song {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a song from `(key, suffix)` pairs in the given order. Later
    /// duplicates are skipped.
    #[must_use]
    pub fn from_names<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        pairs
            .into_iter()
            .map(|(key, suffix)| SongChord::new(Key::new(key), suffix))
            .collect::<Vec<_>>()
            .into()
    }

    /// Insert at the front unless an equal chord is already present.
    pub fn add(&mut self, chord: SongChord) -> SongChordAddResult {
        if self.contains(&chord) {
            return SongChordAddResult::AlreadyPresent;
        }
        self.chords.insert(0, chord);
        SongChordAddResult::Added
    }

    /// Remove the chord at `index`. Leaves the song untouched on failure.
    pub fn remove(&mut self, index: usize) -> Result<SongChord, ChordError> {
        if index >= self.chords.len() {
            return Err(ChordError::IndexOutOfRange {
                index,
                len: self.chords.len(),
            });
        }
        Ok(self.chords.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SongChord> {
        self.chords.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SongChord> {
        self.chords.iter()
    }

    #[must_use]
    pub fn contains(&self, chord: &SongChord) -> bool {
        self.chords.iter().any(|existing| existing == chord)
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.chords.iter().map(SongChord::name).collect()
    }
}

impl From<Vec<SongChord>> for Song {
    fn from(all: Vec<SongChord>) -> Self {
        let mut chords: Vec<SongChord> = Vec::with_capacity(all.len());
        for chord in all {
            if !chords.contains(&chord) {
                chords.push(chord);
            }
        }
        Self { chords }
    }
}

impl From<Song> for Vec<SongChord> {
    fn from(song: Song) -> Self {
        song.chords
    }
}

impl<'a> IntoIterator for &'a Song {
    type Item = &'a SongChord;
    type IntoIter = std::slice::Iter<'a, SongChord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.iter()
    }
}

/// Notification sent after a selection changed something.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SelectionEvent {
    KeySelected { key: Key },
    ChordAdded { chord: SongChord },
    ChordRemoved { index: usize, chord: SongChord },
}

type Listener<'a> = Box<dyn FnMut(&SelectionEvent) + 'a>;

/// Drives key and chord selection against a catalog and accumulates a [`Song`].
pub struct SongBuilder<'a> {
    catalog: &'a ChordCatalog,
    selected: usize,
    song: Song,
    listener: Option<Listener<'a>>,
}

impl fmt::Debug for SongBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SongBuilder")
            .field("selected_key", &self.selected_key())
            .field("song", &self.song)
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> SongBuilder<'a> {
    /// Start with an empty song and the catalog's first key selected.
    pub fn new(catalog: &'a ChordCatalog) -> Result<Self, ChordError> {
        if catalog.default_key().is_none() {
            return Err(ChordError::Catalog("catalog declares no keys".to_string()));
        }
        Ok(Self {
            catalog,
            selected: 0,
            song: Song::new(),
            listener: None,
        })
    }

    #[must_use]
    pub fn with_song(mut self, song: Song) -> Self {
        self.song = song;
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl FnMut(&SelectionEvent) + 'a) -> Self {
        self.set_listener(listener);
        self
    }

    /// Replace the change listener.
    pub fn set_listener(&mut self, listener: impl FnMut(&SelectionEvent) + 'a) {
        self.listener = Some(Box::new(listener));
    }

    #[must_use]
    pub const fn catalog(&self) -> &'a ChordCatalog {
        self.catalog
    }

    #[must_use]
    pub fn selected_key(&self) -> Option<&'a Key> {
        self.catalog.keys().get(self.selected)
    }

    /// Shapes offered for the selected key.
    #[must_use]
    pub fn chord_list(&self) -> &'a [ChordShape] {
        self.catalog.shapes()
    }

    /// Chord-list entries whose name under the selected key contains `term`.
    #[must_use]
    pub fn search_chords(&self, term: &str) -> Vec<&'a ChordShape> {
        match self.selected_key() {
            Some(key) => self.catalog.search(key, term),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub const fn song(&self) -> &Song {
        &self.song
    }

    #[must_use]
    pub fn into_song(self) -> Song {
        self.song
    }

    /// Select a key by name. Enharmonic spellings resolve to the catalog's
    /// own, so `"Db"` selects `"C#"`.
    pub fn select_key(&mut self, name: &str) -> Result<&'a Key, ChordError> {
        let index = self.catalog.key_index(name)?;
        self.selected = index;
        let key = &self.catalog.keys()[index];
        debug!(key = %key, "key selected");
        self.notify(&SelectionEvent::KeySelected { key: key.clone() });
        Ok(key)
    }

    /// Add the selected key combined with `suffix` to the front of the song.
    pub fn select_chord_suffix(&mut self, suffix: &str) -> Result<SongChordAddResult, ChordError> {
        let shape = self.catalog.shape(suffix)?;
        self.add_shape(shape)
    }

    /// Same as [`Self::select_chord_suffix`] for the shape at `index` in the chord list.
    pub fn select_chord_at(&mut self, index: usize) -> Result<SongChordAddResult, ChordError> {
        let shapes = self.catalog.shapes();
        let shape = shapes.get(index).ok_or(ChordError::IndexOutOfRange {
            index,
            len: shapes.len(),
        })?;
        self.add_shape(shape)
    }

    pub fn remove_song_chord_at(&mut self, index: usize) -> Result<SongChord, ChordError> {
        let chord = self.song.remove(index)?;
        debug!(index, chord = %chord, "song chord removed");
        self.notify(&SelectionEvent::ChordRemoved {
            index,
            chord: chord.clone(),
        });
        Ok(chord)
    }

    fn add_shape(&mut self, shape: &ChordShape) -> Result<SongChordAddResult, ChordError> {
        let key = self
            .selected_key()
            .ok_or_else(|| ChordError::Catalog("catalog declares no keys".to_string()))?;
        let chord = SongChord::new(key.clone(), shape.suffix());
        let result = self.song.add(chord.clone());
        debug!(chord = %chord, result = result.as_str(), "chord selected");
        if result.is_added() {
            self.notify(&SelectionEvent::ChordAdded { chord });
        }
        Ok(result)
    }

    fn notify(&mut self, event: &SelectionEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }
}
