//! Song arrangement: named sections of timed chords and the beat timeline
//! they flatten into.
//!
//! A [`Section`] holds an ordered list of [`SectionEvent`]s, each a chord (or
//! a rest) held for a number of beats, and is played `repeat` times in a row.
//! [`Arrangement::timeline`] unrolls the repeats into [`TimedEvent`]s with
//! absolute start and end beats.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ChordError, SongChord};

/// Beats given to a chord when it is added to a section.
pub const DEFAULT_BEATS: u32 = 4;
/// Most times a section can be repeated.
pub const MAX_REPEAT: u32 = 99;
/// Tempo of a new arrangement, in beats per minute.
pub const DEFAULT_TEMPO: u32 = 120;
/// Fastest accepted tempo, in beats per minute.
pub const MAX_TEMPO: u32 = 399;

/// One slot in a section. `chord: None` is a rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEvent {
    pub chord: Option<SongChord>,
    pub beats: u32,
}

impl SectionEvent {
    #[must_use]
    pub fn new(chord: Option<SongChord>) -> Self {
        Self {
            chord,
            beats: DEFAULT_BEATS,
        }
    }

    #[must_use]
    pub fn with_beats(mut self, beats: u32) -> Self {
        self.beats = beats.max(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub repeat: u32,
    pub events: Vec<SectionEvent>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repeat: 1,
            events: Vec::new(),
        }
    }

    /// Beats in one pass through the section.
    #[must_use]
    pub fn beats(&self) -> u32 {
        self.events.iter().map(|event| event.beats).sum()
    }
}

/// Title, tempo, time signature and sections of a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrangement {
    pub title: String,
    tempo: u32,
    pub time_signature: (u8, u8),
    sections: Vec<Section>,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::new("New Rock Anthem")
    }
}

impl Arrangement {
    /// Empty arrangement at 120 bpm in 4/4 with a single `Intro` section.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tempo: DEFAULT_TEMPO,
            time_signature: (4, 4),
            sections: vec![Section::new("Intro")],
        }
    }

    /// Lay the song's chords out in one section, oldest chord first, each
    /// held for `beats`.
    #[must_use]
    pub fn from_song<'a>(
        title: impl Into<String>,
        section: impl Into<String>,
        chords: impl IntoIterator<Item = &'a SongChord>,
        beats: u32,
    ) -> Self {
        let mut events: Vec<SectionEvent> = chords
            .into_iter()
            .map(|chord| SectionEvent::new(Some(chord.clone())).with_beats(beats))
            .collect();
        events.reverse();
        Self {
            sections: vec![Section {
                events,
                ..Section::new(section)
            }],
            ..Self::new(title)
        }
    }

    #[must_use]
    pub const fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Change the tempo. Values outside `1..=MAX_TEMPO` are ignored and
    /// `false` is returned.
    pub fn set_tempo(&mut self, bpm: u32) -> bool {
        if bpm == 0 || bpm > MAX_TEMPO {
            debug!(bpm, "tempo rejected");
            return false;
        }
        self.tempo = bpm;
        true
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Append a section with a repeat count of one and return its index.
    pub fn add_section(&mut self, name: impl Into<String>) -> usize {
        self.sections.push(Section::new(name));
        self.sections.len() - 1
    }

    pub fn remove_section(&mut self, index: usize) -> Result<Section, ChordError> {
        self.check_section(index)?;
        Ok(self.sections.remove(index))
    }

    pub fn rename_section(&mut self, index: usize, name: impl Into<String>) -> Result<(), ChordError> {
        self.section_mut(index)?.name = name.into();
        Ok(())
    }

    /// Set how many times a section plays, clamped to `1..=MAX_REPEAT`.
    /// Returns the stored count.
    pub fn set_section_repeat(&mut self, index: usize, repeat: u32) -> Result<u32, ChordError> {
        let section = self.section_mut(index)?;
        section.repeat = repeat.clamp(1, MAX_REPEAT);
        Ok(section.repeat)
    }

    /// Append a chord, or a rest for `None`, held for [`DEFAULT_BEATS`].
    /// Returns the event's index within the section.
    pub fn push_chord(&mut self, section: usize, chord: Option<SongChord>) -> Result<usize, ChordError> {
        let section = self.section_mut(section)?;
        section.events.push(SectionEvent::new(chord));
        Ok(section.events.len() - 1)
    }

    pub fn remove_chord(&mut self, section: usize, event: usize) -> Result<SectionEvent, ChordError> {
        let events = &mut self.section_mut(section)?.events;
        if event >= events.len() {
            return Err(ChordError::IndexOutOfRange {
                index: event,
                len: events.len(),
            });
        }
        Ok(events.remove(event))
    }

    /// Set an event's duration. Zero is raised to one beat.
    pub fn set_chord_beats(&mut self, section: usize, event: usize, beats: u32) -> Result<(), ChordError> {
        let events = &mut self.section_mut(section)?.events;
        let len = events.len();
        let slot = events
            .get_mut(event)
            .ok_or(ChordError::IndexOutOfRange { index: event, len })?;
        slot.beats = beats.max(1);
        Ok(())
    }

    /// Unroll sections and repeats into events with absolute beat positions.
    #[must_use]
    pub fn timeline(&self) -> Timeline {
        let mut events = Vec::new();
        let mut beat = 0_u64;
        for (section_index, section) in self.sections.iter().enumerate() {
            for repeat_index in 0..section.repeat {
                for (event_index, event) in section.events.iter().enumerate() {
                    let start = beat;
                    beat += u64::from(event.beats);
                    events.push(TimedEvent {
                        chord: event.chord.clone(),
                        beats: event.beats,
                        section_name: section.name.clone(),
                        section_index,
                        event_index,
                        repeat_index,
                        total_repeats: section.repeat,
                        start,
                        end: beat,
                    });
                }
            }
        }
        debug!(events = events.len(), beats = beat, "timeline built");
        Timeline { events }
    }

    /// Whole seconds needed to play the arrangement once, rounded up.
    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        (self.timeline().total_beats() * 60).div_ceil(u64::from(self.tempo.max(1)))
    }

    fn check_section(&self, index: usize) -> Result<(), ChordError> {
        if index >= self.sections.len() {
            return Err(ChordError::IndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        Ok(())
    }

    fn section_mut(&mut self, index: usize) -> Result<&mut Section, ChordError> {
        self.check_section(index)?;
        Ok(&mut self.sections[index])
    }
}

/// A section event placed on the beat axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEvent {
    pub chord: Option<SongChord>,
    pub beats: u32,
    pub section_name: String,
    pub section_index: usize,
    pub event_index: usize,
    pub repeat_index: u32,
    pub total_repeats: u32,
    pub start: u64,
    pub end: u64,
}

/// Flattened, time-ordered events of an [`Arrangement`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    events: Vec<TimedEvent>,
}

impl Timeline {
    #[must_use]
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// End beat of the last event, or zero.
    #[must_use]
    pub fn total_beats(&self) -> u64 {
        self.events.last().map_or(0, |event| event.end)
    }

    /// Index of the event sounding at `beat`, i.e. `start <= beat < end`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn event_at(&self, beat: f64) -> Option<usize> {
        self.events
            .iter()
            .position(|event| event.start as f64 <= beat && beat < event.end as f64)
    }

    /// Clamp an event index into the timeline. `None` when it is empty.
    #[must_use]
    pub fn clamp_index(&self, index: usize) -> Option<usize> {
        self.events.len().checked_sub(1).map(|last| index.min(last))
    }

    /// First event of the section `index` belongs to, counting every repeat
    /// as part of the same section.
    #[must_use]
    pub fn section_start(&self, index: usize) -> Option<usize> {
        let section = self.events.get(index)?.section_index;
        self.events[..=index]
            .iter()
            .rposition(|event| event.section_index != section)
            .map_or(Some(0), |before| Some(before + 1))
    }

    /// Where a "previous section" jump from `index` lands: the start of the
    /// current section when past it, otherwise the start of the section
    /// before.
    #[must_use]
    pub fn previous_section_start(&self, index: usize) -> Option<usize> {
        let start = self.section_start(index)?;
        if index > start || start == 0 {
            return Some(start);
        }
        self.section_start(start - 1)
    }

    /// Where a "next section" jump from `index` lands: the first event of a
    /// later section, or the last event when none follows.
    #[must_use]
    pub fn next_section_start(&self, index: usize) -> Option<usize> {
        let section = self.events.get(index)?.section_index;
        self.events[index..]
            .iter()
            .position(|event| event.section_index > section)
            .map(|offset| index + offset)
            .or_else(|| self.clamp_index(usize::MAX))
    }

    /// Seconds taken by `beats` at `tempo` beats per minute.
    #[must_use]
    pub fn seconds_for(beats: f64, tempo: u32) -> f64 {
        beats * 60.0 / f64::from(tempo.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::{Arrangement, DEFAULT_BEATS, MAX_REPEAT, SectionEvent, Timeline};
    use crate::{ChordError, Key, SongChord};

    fn chord(key: &str, suffix: &str) -> Option<SongChord> {
        Some(SongChord::new(Key::new(key), suffix))
    }

    /// Intro: Am (4) x2, Verse: C (2), rest (4), G (8).
    fn sample() -> Arrangement {
        let mut arrangement = Arrangement::default();
        arrangement.push_chord(0, chord("A", "m")).expect("intro exists");
        arrangement.set_section_repeat(0, 2).expect("intro exists");
        let verse = arrangement.add_section("Verse");
        arrangement.push_chord(verse, chord("C", "major")).expect("verse exists");
        arrangement.set_chord_beats(verse, 0, 2).expect("event exists");
        arrangement.push_chord(verse, None).expect("verse exists");
        arrangement.push_chord(verse, chord("G", "major")).expect("verse exists");
        arrangement.set_chord_beats(verse, 2, 8).expect("event exists");
        arrangement
    }

    #[test]
    fn new_arrangements_have_an_intro_at_120_bpm() {
        let arrangement = Arrangement::default();
        assert_eq!(arrangement.title, "New Rock Anthem");
        assert_eq!(arrangement.tempo(), 120);
        assert_eq!(arrangement.time_signature, (4, 4));
        assert_eq!(arrangement.sections().len(), 1);
        assert_eq!(arrangement.sections()[0].name, "Intro");
        assert_eq!(arrangement.sections()[0].repeat, 1);
        assert!(arrangement.timeline().is_empty());
        assert_eq!(arrangement.total_seconds(), 0);
    }

    #[test]
    fn repeats_are_clamped() {
        let mut arrangement = Arrangement::default();
        assert_eq!(arrangement.set_section_repeat(0, 0), Ok(1));
        assert_eq!(arrangement.set_section_repeat(0, 500), Ok(MAX_REPEAT));
        assert_eq!(arrangement.set_section_repeat(0, 3), Ok(3));
        assert_eq!(
            arrangement.set_section_repeat(1, 3),
            Err(ChordError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn chords_default_to_four_beats_and_never_drop_to_zero() {
        let mut arrangement = Arrangement::default();
        let index = arrangement.push_chord(0, chord("E", "m")).expect("intro exists");
        assert_eq!(arrangement.sections()[0].events[index].beats, DEFAULT_BEATS);
        arrangement.set_chord_beats(0, index, 0).expect("event exists");
        assert_eq!(arrangement.sections()[0].beats(), 1);
        assert_eq!(SectionEvent::new(None).with_beats(0).beats, 1);
        assert!(arrangement.set_chord_beats(0, 1, 2).is_err());
    }

    #[test]
    fn tempo_outside_range_is_ignored() {
        let mut arrangement = Arrangement::default();
        assert!(!arrangement.set_tempo(0));
        assert!(!arrangement.set_tempo(400));
        assert_eq!(arrangement.tempo(), 120);
        assert!(arrangement.set_tempo(399));
        assert_eq!(arrangement.tempo(), 399);
    }

    #[test]
    fn timeline_unrolls_repeats_with_running_beats() {
        let timeline = sample().timeline();
        let spans: Vec<(u64, u64)> = timeline
            .events()
            .iter()
            .map(|event| (event.start, event.end))
            .collect();
        assert_eq!(spans, [(0, 4), (4, 8), (8, 10), (10, 14), (14, 22)]);
        assert_eq!(timeline.total_beats(), 22);

        let second_intro = &timeline.events()[1];
        assert_eq!(second_intro.section_name, "Intro");
        assert_eq!(second_intro.repeat_index, 1);
        assert_eq!(second_intro.total_repeats, 2);
        assert_eq!(second_intro.event_index, 0);

        let rest = &timeline.events()[3];
        assert_eq!(rest.chord, None);
        assert_eq!(rest.section_index, 1);
        assert_eq!(rest.event_index, 1);
    }

    #[test]
    fn current_event_follows_the_beat() {
        let timeline = sample().timeline();
        assert_eq!(timeline.event_at(0.0), Some(0));
        assert_eq!(timeline.event_at(3.99), Some(0));
        assert_eq!(timeline.event_at(4.0), Some(1));
        assert_eq!(timeline.event_at(21.5), Some(4));
        assert_eq!(timeline.event_at(22.0), None);
        assert_eq!(timeline.clamp_index(40), Some(4));
        assert_eq!(Timeline::default().clamp_index(0), None);
    }

    #[test]
    fn section_jumps() {
        let timeline = sample().timeline();
        assert_eq!(timeline.section_start(1), Some(0));
        assert_eq!(timeline.section_start(3), Some(2));

        assert_eq!(timeline.previous_section_start(3), Some(2));
        assert_eq!(timeline.previous_section_start(2), Some(0));
        assert_eq!(timeline.previous_section_start(0), Some(0));

        assert_eq!(timeline.next_section_start(1), Some(2));
        assert_eq!(timeline.next_section_start(2), Some(4));
        assert_eq!(timeline.next_section_start(9), None);
    }

    #[test]
    fn duration_in_seconds_rounds_up() {
        let mut arrangement = sample();
        assert_eq!(arrangement.total_seconds(), 11);
        arrangement.set_tempo(90);
        assert_eq!(arrangement.total_seconds(), 15);
        assert!((Timeline::seconds_for(6.0, 120) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn songs_become_a_single_section_in_play_order() {
        let song = crate::Song::from_names([("G", "major"), ("A", "m")]);
        let arrangement = Arrangement::from_song("Demo", "Verse", &song, 2);
        let section = &arrangement.sections()[0];
        assert_eq!(section.name, "Verse");
        let names: Vec<String> = section
            .events
            .iter()
            .filter_map(|event| event.chord.as_ref().map(SongChord::name))
            .collect();
        assert_eq!(names, ["Am", "Gmajor"]);
        assert_eq!(arrangement.timeline().total_beats(), 4);
    }

    #[test]
    fn removing_sections_and_chords_checks_bounds() {
        let mut arrangement = sample();
        assert!(arrangement.remove_chord(1, 3).is_err());
        assert_eq!(arrangement.remove_chord(1, 1).map(|event| event.chord), Ok(None));
        arrangement.rename_section(1, "Chorus").expect("section exists");
        assert_eq!(arrangement.remove_section(1).map(|section| section.name), Ok("Chorus".to_string()));
        assert!(arrangement.remove_section(1).is_err());
        assert_eq!(arrangement.timeline().total_beats(), 8);
    }
}
