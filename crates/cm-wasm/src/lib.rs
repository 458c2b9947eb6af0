#![forbid(unsafe_code)]

use std::sync::{LazyLock, RwLock};

use cm_core::{ChordCatalog, ChordError, ChordShape, SongBuilder, builtin_catalog};
#[cfg(target_arch = "wasm32")]
use cm_render::canvas::{Canvas2dContext, CanvasSurface};
use cm_render::canvas::CanvasRenderConfig;
#[cfg(target_arch = "wasm32")]
use cm_render::paint;
#[cfg(target_arch = "wasm32")]
use cm_render::DiagramMode;
use cm_render::{ChordDrawing, RenderGeometry, render_chord};
use cm_render_svg::{SvgRenderConfig, ThemeColors, ThemePreset, render_svg};
use serde::{Deserialize, Serialize};
use tracing::debug;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

const DEFAULT_WIDTH: f64 = 350.0;
const DEFAULT_HEIGHT: f64 = 500.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmRenderOutput {
    pub svg: String,
    pub mode: String,
}

#[derive(Debug, Clone)]
struct RuntimeConfig {
    width: f64,
    height: f64,
    svg: SvgRenderConfig,
    canvas: CanvasRenderConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            svg: SvgRenderConfig::default(),
            canvas: CanvasRenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RuntimeInitConfig {
    theme: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    svg: SvgConfigOverrides,
    canvas: CanvasConfigOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SvgConfigOverrides {
    responsive: Option<bool>,
    accessible: Option<bool>,
    embed_theme_css: Option<bool>,
    label_scale: Option<f64>,
    finger_scale: Option<f64>,
    stroke_width: Option<f64>,
    outline_width: Option<f64>,
    thick_width: Option<f64>,
    theme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CanvasConfigOverrides {
    background: Option<String>,
    foreground: Option<String>,
    finger: Option<String>,
    stroke_width: Option<f64>,
    outline_width: Option<f64>,
    thick_width: Option<f64>,
    font_family: Option<String>,
    font_size: Option<f64>,
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardDrawOutput {
    draw_calls: usize,
    mode: DiagramMode,
    canvas_width: f64,
    canvas_height: f64,
}

static RUNTIME_CONFIG: LazyLock<RwLock<RuntimeConfig>> =
    LazyLock::new(|| RwLock::new(RuntimeConfig::default()));

fn read_runtime_config() -> RuntimeConfig {
    match RUNTIME_CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_runtime_config(config: RuntimeConfig) {
    match RUNTIME_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => {
            let mut guard = poisoned.into_inner();
            *guard = config;
        }
    }
}

fn js_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

fn chord_error(err: &ChordError) -> JsValue {
    js_error(format!("{}: {err}", err.code().as_str()))
}

#[cfg(target_arch = "wasm32")]
fn js_error_with_value(prefix: &str, value: JsValue) -> JsValue {
    let detail = value
        .as_string()
        .unwrap_or_else(|| format!("non-string JS error: {value:?}"));
    js_error(format!("{prefix}: {detail}"))
}

fn parse_js_value_or_default<T>(value: Option<JsValue>) -> Result<T, JsValue>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) if raw.is_undefined() || raw.is_null() => Ok(T::default()),
        Some(raw) => {
            #[cfg(target_arch = "wasm32")]
            {
                serde_wasm_bindgen::from_value(raw)
                    .map_err(|err| js_error(format!("invalid config: {err}")))
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = raw;
                Ok(T::default())
            }
        }
    }
}

fn to_js_value<T>(value: &T) -> Result<JsValue, JsValue>
where
    T: Serialize,
{
    #[cfg(target_arch = "wasm32")]
    {
        serde_wasm_bindgen::to_value(value)
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        serde_json::to_string(value)
            .map(|json| JsValue::from_str(&json))
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
}

fn parse_theme(name: &str) -> Result<ThemePreset, String> {
    name.parse::<ThemePreset>().map_err(|err| {
        let expected = ThemePreset::ALL.map(ThemePreset::as_str).join(",");
        format!("invalid theme '{name}': {err}; expected one of {expected}")
    })
}

fn merge_svg_config(
    base: &SvgRenderConfig,
    overrides: &SvgConfigOverrides,
    theme_override: Option<&str>,
) -> Result<SvgRenderConfig, String> {
    let mut merged = base.clone();

    if let Some(value) = overrides.responsive {
        merged.responsive = value;
    }
    if let Some(value) = overrides.accessible {
        merged.accessible = value;
    }
    if let Some(value) = overrides.embed_theme_css {
        merged.embed_theme_css = value;
    }
    if let Some(value) = overrides.label_scale {
        merged.label_scale = value;
    }
    if let Some(value) = overrides.finger_scale {
        merged.finger_scale = value;
    }
    if let Some(value) = overrides.stroke_width {
        merged.stroke_width = value;
    }
    if let Some(value) = overrides.outline_width {
        merged.outline_width = value;
    }
    if let Some(value) = overrides.thick_width {
        merged.thick_width = value;
    }

    if let Some(name) = overrides.theme.as_deref().or(theme_override) {
        merged.theme = parse_theme(name)?;
    }

    Ok(merged)
}

/// Theme colors apply first so explicit color overrides win.
fn merge_canvas_config(
    base: &CanvasRenderConfig,
    overrides: &CanvasConfigOverrides,
    theme_override: Option<&str>,
) -> Result<CanvasRenderConfig, String> {
    let mut merged = base.clone();

    if let Some(name) = theme_override {
        let colors = ThemeColors::from_preset(parse_theme(name)?);
        merged.background = colors.background;
        merged.foreground = colors.ink;
        merged.finger = colors.finger;
    }
    if let Some(value) = overrides.background.as_ref() {
        merged.background = value.clone();
    }
    if let Some(value) = overrides.foreground.as_ref() {
        merged.foreground = value.clone();
    }
    if let Some(value) = overrides.finger.as_ref() {
        merged.finger = value.clone();
    }
    if let Some(value) = overrides.stroke_width {
        merged.stroke_width = value;
    }
    if let Some(value) = overrides.outline_width {
        merged.outline_width = value;
    }
    if let Some(value) = overrides.thick_width {
        merged.thick_width = value;
    }
    if let Some(value) = overrides.font_family.as_ref() {
        merged.font_family = value.clone();
    }
    if let Some(value) = overrides.font_size {
        merged.font_size = value;
    }

    Ok(merged)
}

fn merge_runtime_config(
    base: &RuntimeConfig,
    overrides: &RuntimeInitConfig,
) -> Result<RuntimeConfig, String> {
    let theme = overrides.theme.as_deref();
    Ok(RuntimeConfig {
        width: overrides.width.unwrap_or(base.width),
        height: overrides.height.unwrap_or(base.height),
        svg: merge_svg_config(&base.svg, &overrides.svg, theme)?,
        canvas: merge_canvas_config(&base.canvas, &overrides.canvas, theme)?,
    })
}

fn resolve_config(config: Option<JsValue>) -> Result<RuntimeConfig, JsValue> {
    let overrides: RuntimeInitConfig = parse_js_value_or_default(config)?;
    merge_runtime_config(&read_runtime_config(), &overrides).map_err(js_error)
}

fn build_shape(encoding: &str, barre: Option<u8>) -> Result<ChordShape, ChordError> {
    ChordShape::new("", encoding, barre)
}

fn draw(
    encoding: &str,
    barre: Option<u8>,
    config: &RuntimeConfig,
) -> Result<ChordDrawing, ChordError> {
    let shape = build_shape(encoding, barre)?;
    let geometry = RenderGeometry::default_for(config.width, config.height)?;
    render_chord(&shape, &geometry)
}

/// Render an encoding with the current runtime configuration.
pub fn render(encoding: &str, barre: Option<u8>) -> Result<WasmRenderOutput, ChordError> {
    let runtime = read_runtime_config();
    let shape = build_shape(encoding, barre)?;
    let geometry = RenderGeometry::default_for(runtime.width, runtime.height)?;
    let svg = render_svg(&shape, &geometry, &runtime.svg)?;
    Ok(WasmRenderOutput {
        svg,
        mode: render_chord(&shape, &geometry)?.mode.as_str().to_string(),
    })
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn init(config: Option<JsValue>) -> Result<(), JsValue> {
    let next = resolve_config(config)?;
    debug!(
        width = next.width,
        height = next.height,
        theme = next.svg.theme.as_str(),
        "runtime config updated"
    );
    write_runtime_config(next);
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = renderSvg))]
pub fn render_svg_js(
    encoding: &str,
    barre: Option<u8>,
    config: Option<JsValue>,
) -> Result<String, JsValue> {
    let runtime = resolve_config(config)?;
    let shape = build_shape(encoding, barre).map_err(|err| chord_error(&err))?;
    let geometry = RenderGeometry::default_for(runtime.width, runtime.height)
        .map_err(|err| chord_error(&err))?;
    render_svg(&shape, &geometry, &runtime.svg).map_err(|err| chord_error(&err))
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = renderPrimitives))]
pub fn render_primitives_js(
    encoding: &str,
    barre: Option<u8>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let runtime = resolve_config(config)?;
    let drawing = draw(encoding, barre, &runtime).map_err(|err| chord_error(&err))?;
    to_js_value(&drawing)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = catalog))]
pub fn catalog_js() -> Result<JsValue, JsValue> {
    let catalog = builtin_catalog().map_err(|err| chord_error(&err))?;
    to_js_value(catalog)
}

/// Key and chord selection against the built-in catalog.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub struct SongSession {
    builder: SongBuilder<'static>,
}

impl SongSession {
    fn open(catalog: &'static ChordCatalog) -> Result<Self, ChordError> {
        Ok(Self {
            builder: SongBuilder::new(catalog)?,
        })
    }

    fn add_suffix(&mut self, suffix: &str) -> Result<&'static str, ChordError> {
        self.builder
            .select_chord_suffix(suffix)
            .map(cm_core::SongChordAddResult::as_str)
    }

    fn remove_at(&mut self, index: usize) -> Result<String, ChordError> {
        self.builder
            .remove_song_chord_at(index)
            .map(|chord| chord.name())
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl SongSession {
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    pub fn new() -> Result<Self, JsValue> {
        let catalog = builtin_catalog().map_err(|err| chord_error(&err))?;
        Self::open(catalog).map_err(|err| chord_error(&err))
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = selectKey))]
    pub fn select_key(&mut self, name: &str) -> Result<String, JsValue> {
        self.builder
            .select_key(name)
            .map(|key| key.name().to_string())
            .map_err(|err| chord_error(&err))
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = selectedKey))]
    pub fn selected_key(&self) -> Option<String> {
        self.builder.selected_key().map(|key| key.name().to_string())
    }

    /// Suffixes offered for the selected key.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = chordList))]
    pub fn chord_list(&self) -> Vec<String> {
        self.builder
            .chord_list()
            .iter()
            .map(|shape| shape.suffix().to_string())
            .collect()
    }

    /// Returns `"added"` or `"already-present"`.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = selectChordSuffix))]
    pub fn select_chord_suffix(&mut self, suffix: &str) -> Result<String, JsValue> {
        self.add_suffix(suffix)
            .map(str::to_string)
            .map_err(|err| chord_error(&err))
    }

    /// Returns the removed chord's name.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = removeSongChordAt))]
    pub fn remove_song_chord_at(&mut self, index: usize) -> Result<String, JsValue> {
        self.remove_at(index).map_err(|err| chord_error(&err))
    }

    /// Suffixes whose full name under the selected key contains `term`.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = searchChords))]
    pub fn search_chords(&self, term: &str) -> Vec<String> {
        self.builder
            .search_chords(term)
            .into_iter()
            .map(|shape| shape.suffix().to_string())
            .collect()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = songChords))]
    pub fn song_chords(&self) -> Vec<String> {
        self.builder.song().names()
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl SongSession {
    /// Call `callback` with each selection event as a plain object.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.builder.set_listener(move |event| {
            let value = match serde_wasm_bindgen::to_value(event) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(error = %err, "selection event not converted");
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                tracing::warn!(error = ?err, "song change listener threw");
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
struct WebCanvas2dContext {
    canvas: web_sys::HtmlCanvasElement,
    context: web_sys::CanvasRenderingContext2d,
}

#[cfg(target_arch = "wasm32")]
impl WebCanvas2dContext {
    fn new(canvas: web_sys::HtmlCanvasElement, context: web_sys::CanvasRenderingContext2d) -> Self {
        Self { canvas, context }
    }
}

#[cfg(target_arch = "wasm32")]
impl Canvas2dContext for WebCanvas2dContext {
    fn width(&self) -> f64 {
        f64::from(self.canvas.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height())
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn set_fill_style(&mut self, color: &str) {
        self.context.set_fill_style(&JsValue::from_str(color));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.context.set_stroke_style(&JsValue::from_str(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_font(&mut self, font: &str) {
        self.context.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.context.set_text_align(align);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.context.set_text_baseline(baseline);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let _ = self.context.arc(x, y, radius, start_angle, end_angle);
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.fill_rect(x, y, width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.context.fill_text(text, x, y);
    }
}

/// A chord diagram bound to an HTML canvas. Every draw repaints the whole
/// canvas at its current size.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ChordBoard {
    canvas: web_sys::HtmlCanvasElement,
    context: web_sys::CanvasRenderingContext2d,
    canvas_config: CanvasRenderConfig,
    destroyed: bool,
}

#[cfg(target_arch = "wasm32")]
impl ChordBoard {
    fn ensure_alive(&self) -> Result<(), JsValue> {
        if self.destroyed {
            return Err(js_error("chord board has been destroyed"));
        }
        Ok(())
    }

    fn paint_shape(&mut self, shape: &ChordShape) -> Result<JsValue, JsValue> {
        self.ensure_alive()?;
        let mut web_canvas = WebCanvas2dContext::new(self.canvas.clone(), self.context.clone());
        let (width, height) = (web_canvas.width(), web_canvas.height());
        let geometry =
            RenderGeometry::default_for(width, height).map_err(|err| chord_error(&err))?;
        let drawing = render_chord(shape, &geometry).map_err(|err| chord_error(&err))?;

        let mut surface = CanvasSurface::new(&mut web_canvas, self.canvas_config.clone());
        let draw_calls = paint(&drawing, &mut surface);

        to_js_value(&BoardDrawOutput {
            draw_calls,
            mode: drawing.mode,
            canvas_width: width,
            canvas_height: height,
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ChordBoard {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: web_sys::HtmlCanvasElement,
        config: Option<JsValue>,
    ) -> Result<Self, JsValue> {
        let context_value = canvas
            .get_context("2d")
            .map_err(|err| js_error_with_value("failed to get 2d context", err))?;
        let context = context_value
            .ok_or_else(|| js_error("canvas 2d context is unavailable"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .map_err(|_| js_error("failed to cast context to CanvasRenderingContext2d"))?;

        let runtime = resolve_config(config)?;

        Ok(Self {
            canvas,
            context,
            canvas_config: runtime.canvas,
            destroyed: false,
        })
    }

    pub fn draw(&mut self, encoding: &str, barre: Option<u8>) -> Result<JsValue, JsValue> {
        let shape = build_shape(encoding, barre).map_err(|err| chord_error(&err))?;
        self.paint_shape(&shape)
    }

    /// Draw the built-in catalog shape named by `suffix`.
    #[wasm_bindgen(js_name = drawSuffix)]
    pub fn draw_suffix(&mut self, suffix: &str) -> Result<JsValue, JsValue> {
        let catalog = builtin_catalog().map_err(|err| chord_error(&err))?;
        let shape = catalog.shape(suffix).map_err(|err| chord_error(&err))?.clone();
        self.paint_shape(&shape)
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        self.ensure_alive()?;
        self.canvas_config = merge_canvas_config(
            &self.canvas_config,
            &CanvasConfigOverrides::default(),
            Some(theme),
        )
        .map_err(js_error)?;
        Ok(())
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.context.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        self.destroyed = true;
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct ChordBoard;

#[cfg(not(target_arch = "wasm32"))]
impl ChordBoard {
    pub fn new(_canvas: JsValue, _config: Option<JsValue>) -> Result<Self, JsValue> {
        Err(js_error("ChordBoard is only available on wasm32 targets"))
    }

    pub fn draw(&mut self, _encoding: &str, _barre: Option<u8>) -> Result<JsValue, JsValue> {
        Err(js_error("ChordBoard is only available on wasm32 targets"))
    }

    pub fn draw_suffix(&mut self, _suffix: &str) -> Result<JsValue, JsValue> {
        Err(js_error("ChordBoard is only available on wasm32 targets"))
    }

    pub fn set_theme(&mut self, _theme: &str) -> Result<(), JsValue> {
        Err(js_error("ChordBoard is only available on wasm32 targets"))
    }

    pub fn destroy(&mut self) {}
}
