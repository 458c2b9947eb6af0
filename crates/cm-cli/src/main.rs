#![forbid(unsafe_code)]

//! Chord-o-matic CLI - render chord diagrams and assemble songs.
//!
//! # Commands
//!
//! - `render`: Draw a fret encoding as SVG, terminal art, ASCII or JSON primitives
//! - `catalog`: List the built-in keys and chord shapes, or search chord names
//! - `song`: Select a key, add chords by suffix and print the resulting song
//!   or its beat timeline

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cm_core::{
    Arrangement, ChordCatalog, ChordShape, SelectionEvent, Song, SongBuilder, Timeline,
    builtin_catalog,
};
use cm_render::{RenderGeometry, render_chord};
use cm_render_svg::{SvgRenderConfig, ThemePreset, render_svg};
use cm_render_term::{TermRenderConfig, render_term_result};
use serde::Serialize;
use tracing::{debug, info, warn};

const DEFAULT_WIDTH: u32 = 350;
const DEFAULT_HEIGHT: u32 = 500;

/// Chord-o-matic CLI - render chord diagrams and assemble songs.
#[derive(Debug, Parser)]
#[command(
    name = "cm-cli",
    version,
    about = "Chord-o-matic CLI - render chord diagrams and assemble songs",
    long_about = "Draws six-string chord diagrams from fret encodings such as \"x32010\".\n\n\
        Encodings list one symbol per string, low string first: x = muted,\n\
        0 = open, 1-9 = fret 1-9, a-o = fret 10-24."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a fret encoding as a chord diagram.
    Render {
        /// Six-symbol fret encoding, e.g. "x32010"
        encoding: String,

        /// Fret held across strings (0 for none)
        #[arg(short, long)]
        barre: Option<u8>,

        /// Chord suffix used in titles and headers
        #[arg(short, long, default_value = "")]
        suffix: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "svg")]
        format: OutputFormat,

        /// Width in pixels (svg, json) or terminal columns (term, ascii)
        #[arg(short = 'W', long)]
        width: Option<u32>,

        /// Height in pixels (svg, json) or terminal rows (term, ascii)
        #[arg(short = 'H', long)]
        height: Option<u32>,

        /// Theme name (classic, light, dark, high-contrast, blueprint)
        #[arg(short, long, default_value = "classic")]
        theme: String,
    },

    /// List the built-in keys and chord shapes.
    Catalog {
        /// Only list chords whose name contains this text, e.g. "m7" or "C# dim"
        #[arg(short, long)]
        search: Option<String>,

        /// Key the search names chords in; enharmonic spellings are accepted
        #[arg(short, long)]
        key: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a song from a key and chord suffixes.
    Song {
        /// Key to select before adding chords
        #[arg(short, long)]
        key: Option<String>,

        /// Chord suffix to add; repeat to add several
        #[arg(short, long = "add")]
        add: Vec<String>,

        /// Song position to remove after adding; repeat to remove several
        #[arg(short, long = "remove")]
        remove: Vec<usize>,

        /// Print the beat timeline of the song played oldest chord first
        #[arg(long)]
        timeline: bool,

        /// Beats each chord is held in the timeline
        #[arg(long, default_value_t = cm_core::DEFAULT_BEATS)]
        beats: u32,

        /// Times the song is repeated in the timeline (1-99)
        #[arg(long, default_value_t = 1)]
        repeat: u32,

        /// Tempo in beats per minute (1-399)
        #[arg(long, default_value_t = cm_core::DEFAULT_TEMPO)]
        tempo: u32,

        /// Output as JSON, including the selection events
        #[arg(long)]
        json: bool,
    },
}

/// Output format for the render command.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// SVG vector graphics
    Svg,
    /// Braille terminal art
    Term,
    /// ASCII-only output
    Ascii,
    /// Draw primitives as JSON
    Json,
}

#[derive(Debug, Serialize)]
struct SongOutput<'a> {
    key: Option<&'a str>,
    chords: Vec<String>,
    events: &'a [SelectionEvent],
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline: Option<TimelineOutput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineOutput {
    tempo: u32,
    total_beats: u64,
    total_seconds: u64,
    events: Timeline,
}

#[derive(Debug, Clone, Copy)]
struct TimelineOptions {
    beats: u32,
    repeat: u32,
    tempo: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render {
            encoding,
            barre,
            suffix,
            format,
            width,
            height,
            theme,
        } => cmd_render(&encoding, barre, &suffix, format, width, height, &theme),

        Command::Catalog { search, key, json } => {
            cmd_catalog(search.as_deref(), key.as_deref(), json)
        }

        Command::Song {
            key,
            add,
            remove,
            timeline,
            beats,
            repeat,
            tempo,
            json,
        } => {
            let timeline = timeline.then_some(TimelineOptions {
                beats,
                repeat,
                tempo,
            });
            cmd_song(key.as_deref(), &add, &remove, timeline, json)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn write_output(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        stdout.write_all(b"\n").context("Failed to write to stdout")?;
    }
    Ok(())
}

fn load_catalog() -> Result<&'static ChordCatalog> {
    builtin_catalog().context("Failed to load the built-in chord catalog")
}

// =============================================================================
// Command: render
// =============================================================================

fn cmd_render(
    encoding: &str,
    barre: Option<u8>,
    suffix: &str,
    format: OutputFormat,
    width: Option<u32>,
    height: Option<u32>,
    theme: &str,
) -> Result<()> {
    let shape = ChordShape::new(suffix, encoding, barre)
        .with_context(|| format!("Invalid chord encoding '{encoding}'"))?;
    debug!(
        "Parsed: encoding={}, barre={}, fretted={}",
        shape.encoding(),
        shape.barre_fret(),
        shape.fretted_count()
    );

    let rendered = render_format(&shape, format, theme, width, height)?;
    write_output(&rendered)?;

    info!(
        "Rendered {} as {:?} ({} bytes)",
        shape,
        format,
        rendered.len()
    );
    Ok(())
}

fn render_format(
    shape: &ChordShape,
    format: OutputFormat,
    theme: &str,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<String> {
    match format {
        OutputFormat::Svg => {
            let geometry = pixel_geometry(width, height)?;
            let mut svg_config = SvgRenderConfig::default();
            svg_config.theme = resolve_theme_preset(theme, svg_config.theme);
            render_svg(shape, &geometry, &svg_config).context("Failed to render SVG")
        }

        OutputFormat::Json => {
            warn_if_unknown_theme(theme);
            let geometry = pixel_geometry(width, height)?;
            let drawing = render_chord(shape, &geometry).context("Failed to render chord")?;
            serde_json::to_string_pretty(&drawing).context("Failed to serialize primitives")
        }

        OutputFormat::Term => {
            warn_if_unknown_theme(theme);
            let config = terminal_config(TermRenderConfig::default(), width, height);
            render_term_output(shape, &config)
        }

        OutputFormat::Ascii => {
            warn_if_unknown_theme(theme);
            let config = terminal_config(TermRenderConfig::compact(), width, height);
            render_term_output(shape, &config)
        }
    }
}

fn render_term_output(shape: &ChordShape, config: &TermRenderConfig) -> Result<String> {
    let result = render_term_result(shape, config).context("Failed to render terminal output")?;
    debug!(
        "Terminal: mode={}, cells={}x{}, diagram={}",
        result.render_mode.as_str(),
        result.width,
        result.height,
        result.diagram_mode.as_str()
    );
    Ok(result.output)
}

fn pixel_geometry(width: Option<u32>, height: Option<u32>) -> Result<RenderGeometry> {
    let width = f64::from(width.unwrap_or(DEFAULT_WIDTH));
    let height = f64::from(height.unwrap_or(DEFAULT_HEIGHT));
    RenderGeometry::default_for(width, height)
        .with_context(|| format!("Invalid diagram size {width}x{height}"))
}

fn terminal_config(
    base: TermRenderConfig,
    width: Option<u32>,
    height: Option<u32>,
) -> TermRenderConfig {
    TermRenderConfig {
        cols: width.map_or(base.cols, |w| w as usize),
        rows: height.map_or(base.rows, |h| h as usize),
        ..base
    }
}

fn resolve_theme_preset(theme: &str, fallback: ThemePreset) -> ThemePreset {
    match theme.parse::<ThemePreset>() {
        Ok(theme_preset) => theme_preset,
        Err(_err) => {
            warn!(
                "Unknown theme '{theme}', falling back to '{}'",
                fallback.as_str()
            );
            fallback
        }
    }
}

fn warn_if_unknown_theme(theme: &str) {
    let fallback = SvgRenderConfig::default().theme;
    if theme.parse::<ThemePreset>().is_err() {
        warn!(
            "Unknown theme '{theme}', falling back to '{}'",
            fallback.as_str()
        );
    }
}

// =============================================================================
// Command: catalog
// =============================================================================

fn cmd_catalog(search: Option<&str>, key: Option<&str>, json_output: bool) -> Result<()> {
    let catalog = load_catalog()?;
    if let Some(term) = search {
        let names = search_catalog(catalog, key, term)?;
        if json_output {
            let json_str = serde_json::to_string_pretty(&names)?;
            return write_output(&json_str);
        }
        if names.is_empty() {
            info!("No chord matches '{term}'");
            return Ok(());
        }
        return write_output(&names.join("\n"));
    }
    if json_output {
        let json_str = serde_json::to_string_pretty(catalog)?;
        return write_output(&json_str);
    }
    write_output(&format_catalog(catalog))
}

fn format_catalog(catalog: &ChordCatalog) -> String {
    let keys: Vec<&str> = catalog.keys().iter().map(|key| key.name()).collect();
    let width = catalog
        .shapes()
        .iter()
        .map(|shape| shape.suffix().len())
        .max()
        .unwrap_or(0)
        .max("SUFFIX".len());

    let mut out = format!("Keys: {}\n\n", keys.join(" "));
    out.push_str(&format!("{:<width$}  FRETS   BARRE  MODE\n", "SUFFIX"));
    for shape in catalog.shapes() {
        let barre = shape
            .barre()
            .map_or_else(|| String::from("-"), |fret| fret.to_string());
        let mode = if shape.is_offset() {
            "offset"
        } else {
            "absolute"
        };
        out.push_str(&format!(
            "{:<width$}  {}  {barre:<5}  {mode}\n",
            shape.suffix(),
            shape.encoding()
        ));
    }
    out
}

/// Full names of the chords under `key` (or the first key) matching `term`.
fn search_catalog(catalog: &ChordCatalog, key: Option<&str>, term: &str) -> Result<Vec<String>> {
    let key = match key {
        Some(name) => catalog
            .key(name)
            .with_context(|| format!("Cannot search key '{name}'"))?,
        None => catalog
            .default_key()
            .context("Catalog declares no keys")?,
    };
    let names: Vec<String> = catalog
        .search(key, term)
        .into_iter()
        .map(|shape| format!("{key}{}", shape.suffix()))
        .collect();
    debug!(key = %key, term, matches = names.len(), "catalog searched");
    Ok(names)
}

// =============================================================================
// Command: song
// =============================================================================

fn cmd_song(
    key: Option<&str>,
    add: &[String],
    remove: &[usize],
    timeline: Option<TimelineOptions>,
    json_output: bool,
) -> Result<()> {
    let catalog = load_catalog()?;
    let mut events = Vec::new();
    let (song, selected) = build_song(catalog, key, add, remove, |event| {
        events.push(event.clone());
    })?;
    let timeline = timeline.map(|options| song_timeline(&song, options));

    if json_output {
        let output = SongOutput {
            key: selected.as_deref(),
            chords: song.names(),
            events: &events,
            timeline,
        };
        let json_str = serde_json::to_string_pretty(&output)?;
        return write_output(&json_str);
    }

    if let Some(timeline) = timeline {
        return write_output(&format_timeline(&timeline));
    }

    if song.is_empty() {
        info!("Song is empty");
        return Ok(());
    }
    write_output(&song.names().join("\n"))
}

/// Lay the song out as one repeated section and flatten it.
fn song_timeline(song: &Song, options: TimelineOptions) -> TimelineOutput {
    let mut arrangement = Arrangement::from_song("Song", "Song", song, options.beats);
    let repeat = arrangement
        .set_section_repeat(0, options.repeat)
        .unwrap_or(1);
    if repeat != options.repeat {
        warn!("Repeat count {} clamped to {repeat}", options.repeat);
    }
    if !arrangement.set_tempo(options.tempo) {
        warn!(
            "Tempo {} is out of range, keeping {}",
            options.tempo,
            arrangement.tempo()
        );
    }

    let events = arrangement.timeline();
    TimelineOutput {
        tempo: arrangement.tempo(),
        total_beats: events.total_beats(),
        total_seconds: arrangement.total_seconds(),
        events,
    }
}

fn format_timeline(timeline: &TimelineOutput) -> String {
    let mut out = format!(
        "{} beats at {} bpm ({}s)\n",
        timeline.total_beats, timeline.tempo, timeline.total_seconds
    );
    for event in timeline.events.events() {
        let chord = event
            .chord
            .as_ref()
            .map_or_else(|| String::from("-"), ToString::to_string);
        out.push_str(&format!(
            "{:>4}-{:<4}  {chord:<10}  pass {}/{}\n",
            event.start,
            event.end,
            event.repeat_index + 1,
            event.total_repeats
        ));
    }
    out
}

/// Apply a key selection, additions and removals, in that order.
fn build_song<'a>(
    catalog: &'a ChordCatalog,
    key: Option<&str>,
    add: &[String],
    remove: &[usize],
    listener: impl FnMut(&SelectionEvent) + 'a,
) -> Result<(Song, Option<String>)> {
    let mut builder = SongBuilder::new(catalog)
        .context("Catalog cannot drive a song")?
        .with_listener(listener);

    if let Some(name) = key {
        builder
            .select_key(name)
            .with_context(|| format!("Cannot select key '{name}'"))?;
    }

    for suffix in add {
        let result = builder
            .select_chord_suffix(suffix)
            .with_context(|| format!("Cannot add chord '{suffix}'"))?;
        if result.is_added() {
            info!("Added {suffix}");
        } else {
            warn!("Chord '{suffix}' is already in the song");
        }
    }

    for &index in remove {
        let removed = builder
            .remove_song_chord_at(index)
            .with_context(|| format!("Cannot remove song chord {index}"))?;
        info!("Removed {removed} from position {index}");
    }

    let selected = builder.selected_key().map(|key| key.name().to_string());
    Ok((builder.into_song(), selected))
}
