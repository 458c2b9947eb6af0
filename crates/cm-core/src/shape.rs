//! Chord shapes and the per-string fret encoding.
//!
//! An encoding is six symbols, low string first: `'x'` mutes a string, `'0'`
//! leaves it open, `'1'`-`'9'` fret it at 1-9 and `'a'`-`'o'` fret it at 10-24.
//! Fingerings are a parallel list of finger numbers, `0` for none.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ABSOLUTE_FRET_WINDOW, ChordError, MAX_FINGER, MAX_FRET, STRING_COUNT};

/// Radix whose digit alphabet is exactly `0-9a-o`.
const SYMBOL_RADIX: u32 = MAX_FRET as u32 + 1;

/// What a single string does in a chord shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(tag = "kind", content = "fret", rename_all = "camelCase")]
pub enum FretPosition {
    #[default]
    Muted,
    Open,
    Fretted(u8),
}

impl FretPosition {
    /// Decode one encoding symbol. Returns `None` outside the alphabet.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'x' => Some(Self::Muted),
            '0' => Some(Self::Open),
            '1'..='9' | 'a'..='o' => symbol
                .to_digit(SYMBOL_RADIX)
                .and_then(|digit| u8::try_from(digit).ok())
                .map(Self::Fretted),
            _ => None,
        }
    }

    /// Encode back to a single symbol. `None` for a fret outside 1..=24.
    #[must_use]
    pub fn symbol(self) -> Option<char> {
        match self {
            Self::Muted => Some('x'),
            Self::Open => Some('0'),
            Self::Fretted(fret) if (1..=MAX_FRET).contains(&fret) => {
                char::from_digit(u32::from(fret), SYMBOL_RADIX)
            }
            Self::Fretted(_) => None,
        }
    }

    #[must_use]
    pub const fn fret(self) -> Option<u8> {
        match self {
            Self::Fretted(fret) => Some(fret),
            Self::Muted | Self::Open => None,
        }
    }

    #[must_use]
    pub const fn is_fretted(self) -> bool {
        matches!(self, Self::Fretted(_))
    }

    #[must_use]
    pub const fn is_muted(self) -> bool {
        matches!(self, Self::Muted)
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for FretPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => write!(f, "{symbol}"),
            None => f.write_str("?"),
        }
    }
}

impl FromStr for FretPosition {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => classify_symbol(symbol, 0),
            _ => Err(ChordError::InvalidLength {
                expected: 1,
                found: s.chars().count(),
            }),
        }
    }
}

/// Classify the symbol found on `string`, failing on anything outside the alphabet.
pub fn classify_symbol(symbol: char, string: usize) -> Result<FretPosition, ChordError> {
    FretPosition::from_symbol(symbol).ok_or(ChordError::InvalidEncoding { symbol, string })
}

/// Serialized form of a chord shape, as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShapeRecord {
    pub suffix: String,
    pub frets: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barre: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingers: Option<Vec<u8>>,
}

/// One validated fingering of a chord.
///
/// Construction checks every symbol, so queries on a built shape never fail
/// on encoding grounds. A barre of 0 means "no barre".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "ShapeRecord", into = "ShapeRecord")]
pub struct ChordShape {
    suffix: String,
    positions: [FretPosition; STRING_COUNT],
    barre: Option<u8>,
    fingers: [Option<u8>; STRING_COUNT],
}

impl ChordShape {
    /// Build a shape from a suffix, a six-symbol encoding and a barre hint.
    pub fn new(
        suffix: impl Into<String>,
        encoding: &str,
        barre: Option<u8>,
    ) -> Result<Self, ChordError> {
        let found = encoding.chars().count();
        if found != STRING_COUNT {
            return Err(ChordError::InvalidLength {
                expected: STRING_COUNT,
                found,
            });
        }

        let mut positions = [FretPosition::Muted; STRING_COUNT];
        for (string, (slot, symbol)) in positions.iter_mut().zip(encoding.chars()).enumerate() {
            *slot = classify_symbol(symbol, string)?;
        }

        Self::from_positions(suffix, positions, barre)
    }

    /// Build a shape from already decoded positions.
    pub fn from_positions(
        suffix: impl Into<String>,
        positions: [FretPosition; STRING_COUNT],
        barre: Option<u8>,
    ) -> Result<Self, ChordError> {
        for (string, position) in positions.iter().enumerate() {
            if let FretPosition::Fretted(fret) = *position
                && !(1..=MAX_FRET).contains(&fret)
            {
                return Err(ChordError::InvalidFret { fret, string });
            }
        }
        if let Some(fret) = barre
            && fret > MAX_FRET
        {
            return Err(ChordError::InvalidBarre { fret });
        }

        Ok(Self {
            suffix: suffix.into(),
            positions,
            barre: barre.filter(|fret| *fret > 0),
            fingers: [None; STRING_COUNT],
        })
    }

    /// Attach one finger number per string, low string first. `0` leaves a
    /// string without a finger.
    ///
    /// Fingers on open or muted strings are kept but never drawn.
    pub fn with_fingers(mut self, fingers: &[u8]) -> Result<Self, ChordError> {
        if fingers.len() != STRING_COUNT {
            return Err(ChordError::InvalidLength {
                expected: STRING_COUNT,
                found: fingers.len(),
            });
        }
        for (string, (slot, &finger)) in self.fingers.iter_mut().zip(fingers).enumerate() {
            if finger > MAX_FINGER {
                return Err(ChordError::InvalidFinger { finger, string });
            }
            *slot = Some(finger).filter(|finger| *finger > 0);
        }
        Ok(self)
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    #[must_use]
    pub const fn positions(&self) -> &[FretPosition; STRING_COUNT] {
        &self.positions
    }

    #[must_use]
    pub const fn barre(&self) -> Option<u8> {
        self.barre
    }

    #[must_use]
    pub const fn fingers(&self) -> &[Option<u8>; STRING_COUNT] {
        &self.fingers
    }

    /// Finger to draw inside the dot on `string`. Only fretted strings carry one.
    #[must_use]
    pub fn finger(&self, string: usize) -> Option<u8> {
        let position = self.positions.get(string)?;
        if !position.is_fretted() {
            return None;
        }
        self.fingers.get(string).copied().flatten()
    }

    #[must_use]
    pub fn has_fingers(&self) -> bool {
        self.fingers.iter().any(Option::is_some)
    }

    /// The barre fret, or 0 when the shape has none.
    #[must_use]
    pub const fn barre_fret(&self) -> u8 {
        match self.barre {
            Some(fret) => fret,
            None => 0,
        }
    }

    /// Classify string `index` (0 = lowest string).
    pub fn classify_string(&self, index: usize) -> Result<FretPosition, ChordError> {
        self.positions
            .get(index)
            .copied()
            .ok_or(ChordError::StringOutOfRange {
                index,
                strings: STRING_COUNT,
            })
    }

    /// Lowest and highest fretted position, both seeded with the barre fret.
    ///
    /// A barre outside the fretted notes still widens the range, so the barre
    /// position anchors the diagram even when no string is fretted.
    #[must_use]
    pub fn fret_range(&self) -> (u8, u8) {
        let seed = self.barre_fret();
        self.positions
            .iter()
            .filter_map(|position| position.fret())
            .fold((seed, seed), |(min, max), fret| (min.min(fret), max.max(fret)))
    }

    /// First and last string fretted exactly at the barre fret, when at least two are.
    #[must_use]
    pub fn barre_span(&self) -> Option<(usize, usize)> {
        let barre = self.barre?;
        let mut strings = self
            .positions
            .iter()
            .enumerate()
            .filter(|(_, position)| position.fret() == Some(barre))
            .map(|(string, _)| string);
        let first = strings.next()?;
        let last = strings.last()?;
        Some((first, last))
    }

    /// Whether the shape reaches past the fixed window below the nut.
    #[must_use]
    pub fn is_offset(&self) -> bool {
        self.fret_range().1 > ABSOLUTE_FRET_WINDOW
    }

    #[must_use]
    pub fn fretted_count(&self) -> usize {
        self.positions
            .iter()
            .filter(|position| position.is_fretted())
            .count()
    }

    /// Canonical six-symbol encoding.
    #[must_use]
    pub fn encoding(&self) -> String {
        self.positions.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ChordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.suffix, self.encoding())?;
        if let Some(barre) = self.barre {
            write!(f, " barre {barre}")?;
        }
        Ok(())
    }
}

impl FromStr for ChordShape {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(String::new(), s.trim(), None)
    }
}

impl TryFrom<ShapeRecord> for ChordShape {
    type Error = ChordError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        let shape = Self::new(record.suffix, &record.frets, record.barre)?;
        match record.fingers {
            Some(fingers) => shape.with_fingers(&fingers),
            None => Ok(shape),
        }
    }
}

impl From<ChordShape> for ShapeRecord {
    fn from(shape: ChordShape) -> Self {
        let fingers = shape.has_fingers().then(|| {
            shape
                .fingers
                .iter()
                .map(|finger| finger.unwrap_or(0))
                .collect()
        });
        Self {
            frets: shape.encoding(),
            suffix: shape.suffix,
            barre: shape.barre,
            fingers,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ChordShape, FretPosition, ShapeRecord, classify_symbol};
    use crate::{ChordError, STRING_COUNT};

    #[test]
    fn open_c_shape_classifies_every_string() {
        let shape = ChordShape::new("maj", "x32010", Some(0)).expect("valid shape");
        let expected = [
            FretPosition::Muted,
            FretPosition::Fretted(3),
            FretPosition::Fretted(2),
            FretPosition::Open,
            FretPosition::Fretted(1),
            FretPosition::Open,
        ];
        for (index, position) in expected.into_iter().enumerate() {
            assert_eq!(shape.classify_string(index), Ok(position));
        }
        assert_eq!(shape.fret_range(), (0, 3));
        assert_eq!(shape.barre_span(), None);
        assert!(!shape.is_offset());
        assert_eq!(shape.barre(), None);
        assert!(shape.positions()[0].is_muted());
        assert!(shape.positions()[3].is_open());
        assert!(!shape.positions()[1].is_open());
    }

    #[test]
    fn high_barre_shape_spans_and_offsets() {
        let shape = ChordShape::new("major", "57756x", Some(5)).expect("valid shape");
        assert_eq!(shape.fret_range(), (5, 7));
        assert!(shape.is_offset());
        assert_eq!(shape.barre_span(), Some((0, 3)));
        assert_eq!(shape.fretted_count(), 5);
    }

    #[test]
    fn extended_symbols_map_to_high_frets() {
        assert_eq!(FretPosition::from_symbol('a'), Some(FretPosition::Fretted(10)));
        assert_eq!(FretPosition::from_symbol('o'), Some(FretPosition::Fretted(24)));
        assert_eq!(FretPosition::from_symbol('9'), Some(FretPosition::Fretted(9)));
        assert_eq!(FretPosition::from_symbol('p'), None);
        assert_eq!(FretPosition::from_symbol('A'), None);
        assert_eq!(FretPosition::from_symbol('X'), None);
        assert_eq!(FretPosition::from_symbol(' '), None);
    }

    #[test]
    fn invalid_symbol_reports_string_index() {
        let err = ChordShape::new("m", "x3z010", None).expect_err("z is not a fret symbol");
        assert_eq!(
            err,
            ChordError::InvalidEncoding {
                symbol: 'z',
                string: 2
            }
        );
        assert_eq!(
            classify_symbol('#', 5),
            Err(ChordError::InvalidEncoding {
                symbol: '#',
                string: 5
            })
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = ChordShape::new("major", "577765x", Some(5)).expect_err("seven symbols");
        assert_eq!(
            err,
            ChordError::InvalidLength {
                expected: STRING_COUNT,
                found: 7
            }
        );
        assert!(ChordShape::new("", "", None).is_err());
    }

    #[test]
    fn classify_string_rejects_missing_string() {
        let shape: ChordShape = "x32010".parse().expect("valid encoding");
        assert_eq!(
            shape.classify_string(STRING_COUNT),
            Err(ChordError::StringOutOfRange {
                index: STRING_COUNT,
                strings: STRING_COUNT
            })
        );
    }

    #[test]
    fn barre_outside_fretted_notes_extends_range() {
        let low = ChordShape::new("m7", "x22010", Some(2)).expect("valid shape");
        assert_eq!(low.fret_range(), (1, 2));
        assert_eq!(low.barre_span(), Some((1, 2)));

        let high = ChordShape::new("odd", "x32010", Some(7)).expect("valid shape");
        assert_eq!(high.fret_range(), (1, 7));
        assert!(high.is_offset());
        assert_eq!(high.barre_span(), None);
    }

    #[test]
    fn single_string_on_barre_fret_has_no_span() {
        let shape = ChordShape::new("dim7", "022x0x", Some(3)).expect("valid shape");
        assert_eq!(shape.barre_span(), None);
        let shape = ChordShape::new("dim7", "032x0x", Some(3)).expect("valid shape");
        assert_eq!(shape.barre_span(), None);
    }

    #[test]
    fn open_and_muted_strings_never_join_a_barre() {
        let shape = ChordShape::new("open", "000000", None).expect("valid shape");
        assert_eq!(shape.fret_range(), (0, 0));
        assert_eq!(shape.barre_span(), None);
        assert!(!shape.is_offset());
    }

    #[test]
    fn invalid_barre_and_fret_values_are_rejected() {
        assert_eq!(
            ChordShape::new("m", "x32010", Some(25)),
            Err(ChordError::InvalidBarre { fret: 25 })
        );
        let positions = [
            FretPosition::Fretted(0),
            FretPosition::Open,
            FretPosition::Open,
            FretPosition::Open,
            FretPosition::Open,
            FretPosition::Open,
        ];
        assert_eq!(
            ChordShape::from_positions("bad", positions, None),
            Err(ChordError::InvalidFret { fret: 0, string: 0 })
        );
    }

    #[test]
    fn display_shows_suffix_encoding_and_barre() {
        let shape = ChordShape::new("aug9", "8a89a8", Some(8)).expect("valid shape");
        assert_eq!(shape.to_string(), "aug9 [8a89a8] barre 8");
        assert_eq!(FretPosition::Fretted(12).to_string(), "c");
        assert_eq!(FretPosition::Fretted(40).to_string(), "?");
    }

    #[test]
    fn serde_goes_through_the_record_form() {
        let shape = ChordShape::new("m7", "x22010", Some(2)).expect("valid shape");
        let json = serde_json::to_value(&shape).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "suffix": "m7", "frets": "x22010", "barre": 2 })
        );

        let bad = serde_json::json!({ "suffix": "m7", "frets": "x2201?" });
        assert!(serde_json::from_value::<ChordShape>(bad).is_err());

        let record = ShapeRecord::from(shape.clone());
        assert_eq!(ChordShape::try_from(record), Ok(shape));
    }

    #[test]
    fn fingers_are_only_reported_on_fretted_strings() {
        let shape = ChordShape::new("m", "x32010", None)
            .and_then(|shape| shape.with_fingers(&[1, 3, 2, 0, 1, 0]))
            .expect("valid fingering");
        assert!(shape.has_fingers());
        assert_eq!(shape.fingers()[0], Some(1));
        // muted string keeps its finger but never shows it
        assert_eq!(shape.finger(0), None);
        assert_eq!(shape.finger(1), Some(3));
        assert_eq!(shape.finger(2), Some(2));
        assert_eq!(shape.finger(3), None);
        assert_eq!(shape.finger(4), Some(1));
        assert_eq!(shape.finger(STRING_COUNT), None);
    }

    #[test]
    fn bad_fingerings_are_rejected() {
        let shape: ChordShape = "x32010".parse().expect("valid encoding");
        assert_eq!(
            shape.clone().with_fingers(&[0, 5, 0, 0, 0, 0]),
            Err(ChordError::InvalidFinger {
                finger: 5,
                string: 1
            })
        );
        assert_eq!(
            shape.with_fingers(&[0, 3, 2]),
            Err(ChordError::InvalidLength {
                expected: STRING_COUNT,
                found: 3
            })
        );
    }

    #[test]
    fn fingers_travel_through_the_record_form() {
        let json = serde_json::json!({
            "suffix": "major",
            "frets": "57756x",
            "barre": 5,
            "fingers": [1, 3, 4, 1, 2, 0]
        });
        let shape: ChordShape = serde_json::from_value(json.clone()).expect("valid record");
        assert_eq!(shape.finger(2), Some(4));
        assert_eq!(shape.finger(5), None);
        assert_eq!(serde_json::to_value(&shape).expect("serialize"), json);

        let bad = serde_json::json!({ "suffix": "m", "frets": "x32010", "fingers": [9, 0, 0, 0, 0, 0] });
        assert!(serde_json::from_value::<ChordShape>(bad).is_err());
    }

    fn symbol() -> impl Strategy<Value = char> {
        prop::sample::select(
            "x0123456789abcdefghijklmno".chars().collect::<Vec<_>>(),
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_valid_encodings_classify_totally(
            symbols in prop::collection::vec(symbol(), STRING_COUNT),
            barre in 0_u8..=24,
        ) {
            let encoding: String = symbols.iter().collect();
            let shape = ChordShape::new("p", &encoding, Some(barre)).expect("alphabet only");
            for index in 0..STRING_COUNT {
                prop_assert!(shape.classify_string(index).is_ok());
            }
            prop_assert_eq!(shape.encoding(), encoding);

            let (min, max) = shape.fret_range();
            prop_assert!(min <= barre && barre <= max);
            prop_assert_eq!(shape.fret_range(), (min, max));
        }

        #[test]
        fn prop_barre_span_endpoints_sit_on_the_barre(
            symbols in prop::collection::vec(symbol(), STRING_COUNT),
            barre in 1_u8..=24,
        ) {
            let encoding: String = symbols.iter().collect();
            let shape = ChordShape::new("p", &encoding, Some(barre)).expect("alphabet only");
            if let Some((from, to)) = shape.barre_span() {
                prop_assert!(from < to);
                prop_assert_eq!(shape.positions()[from].fret(), Some(barre));
                prop_assert_eq!(shape.positions()[to].fret(), Some(barre));
            } else {
                let matching = shape
                    .positions()
                    .iter()
                    .filter(|position| position.fret() == Some(barre))
                    .count();
                prop_assert!(matching < 2);
            }
        }
    }
}
