//! The immutable table of keys and chord shapes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ChordError, ChordShape, ShapeRecord};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

static BUILTIN: LazyLock<Result<ChordCatalog, ChordError>> = LazyLock::new(ChordCatalog::builtin);

/// The catalog shipped with the crate, parsed on first use.
pub fn builtin_catalog() -> Result<&'static ChordCatalog, ChordError> {
    BUILTIN.as_ref().map_err(Clone::clone)
}

/// A musical key name such as `"C#"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The other spelling of a sharp or flat key, e.g. `"C#"` for `"Db"`.
#[must_use]
pub fn enharmonic(name: &str) -> Option<&'static str> {
    let twin = match name {
        "C#" => "Db",
        "Db" => "C#",
        "D#" => "Eb",
        "Eb" => "D#",
        "F#" => "Gb",
        "Gb" => "F#",
        "G#" => "Ab",
        "Ab" => "G#",
        "A#" => "Bb",
        "Bb" => "A#",
        _ => return None,
    };
    Some(twin)
}

/// Names a key may be stored under, most specific first: the name itself,
/// its `sharp`/`flat` spelled-out forms, then the same for its enharmonic twin.
fn key_spellings(name: &str) -> Vec<String> {
    let mut spellings = Vec::with_capacity(6);
    for candidate in std::iter::once(name).chain(enharmonic(name)) {
        for spelling in [
            candidate.to_string(),
            candidate.replacen('#', "sharp", 1),
            candidate.replacen('b', "flat", 1),
        ] {
            if !spellings.contains(&spelling) {
                spellings.push(spelling);
            }
        }
    }
    spellings
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    keys: Vec<String>,
    #[serde(default)]
    shapes: Vec<ShapeRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChordCatalog {
    keys: Vec<Key>,
    shapes: Vec<ChordShape>,
}

impl ChordCatalog {
    /// Parse the embedded catalog.
    pub fn builtin() -> Result<Self, ChordError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog in the embedded TOML format.
    ///
    /// Every shape encoding is checked here, so later renders never see an
    /// invalid symbol. Keys must be non-empty and unique; suffixes unique.
    pub fn from_toml_str(source: &str) -> Result<Self, ChordError> {
        let raw: RawCatalog =
            toml::from_str(source).map_err(|err| ChordError::Catalog(err.to_string()))?;

        if raw.keys.is_empty() {
            return Err(ChordError::Catalog("catalog declares no keys".to_string()));
        }

        let mut seen = BTreeSet::new();
        for key in &raw.keys {
            if key.trim().is_empty() {
                return Err(ChordError::Catalog("empty key name".to_string()));
            }
            if !seen.insert(key.as_str()) {
                return Err(ChordError::Catalog(format!("duplicate key '{key}'")));
            }
        }

        let shapes = raw
            .shapes
            .into_iter()
            .map(ChordShape::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut suffixes = BTreeSet::new();
        for shape in &shapes {
            if !suffixes.insert(shape.suffix()) {
                return Err(ChordError::Catalog(format!(
                    "duplicate chord suffix '{}'",
                    shape.suffix()
                )));
            }
        }

        debug!(
            keys = raw.keys.len(),
            shapes = shapes.len(),
            "chord catalog loaded"
        );

        Ok(Self {
            keys: raw.keys.into_iter().map(Key::new).collect(),
            shapes,
        })
    }

    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[must_use]
    pub fn shapes(&self) -> &[ChordShape] {
        &self.shapes
    }

    /// Look a key up by name, falling back to other spellings of the same
    /// pitch, so `"Db"` finds a catalog that only lists `"C#"`.
    pub fn key(&self, name: &str) -> Result<&Key, ChordError> {
        self.key_index(name).map(|index| &self.keys[index])
    }

    pub(crate) fn key_index(&self, name: &str) -> Result<usize, ChordError> {
        key_spellings(name)
            .iter()
            .find_map(|spelling| self.keys.iter().position(|key| key.name() == spelling))
            .ok_or_else(|| ChordError::UnknownKey(name.to_string()))
    }

    pub fn shape(&self, suffix: &str) -> Result<&ChordShape, ChordError> {
        self.shapes
            .iter()
            .find(|shape| shape.suffix() == suffix)
            .ok_or_else(|| ChordError::UnknownSuffix(suffix.to_string()))
    }

    /// Shapes whose full chord name under `key` contains `term`, ignoring case.
    ///
    /// The name is matched both joined (`"C#m7"`) and spaced (`"C# m7"`). An
    /// empty term keeps every shape.
    #[must_use]
    pub fn search(&self, key: &Key, term: &str) -> Vec<&ChordShape> {
        let term = term.to_lowercase();
        self.shapes
            .iter()
            .filter(|shape| {
                let joined = format!("{}{}", key.name(), shape.suffix()).to_lowercase();
                let spaced = format!("{} {}", key.name(), shape.suffix()).to_lowercase();
                joined.contains(&term) || spaced.contains(&term)
            })
            .collect()
    }

    /// The key selected before the user picks one.
    #[must_use]
    pub fn default_key(&self) -> Option<&Key> {
        self.keys.first()
    }
}
