//! Font lookup and text measurement.
//!
//! System faces are resolved through `fontdb` and measured with `rusttype`.
//! Loaded fonts live for the rest of the process and are cached per
//! (family, bold, italic).

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point as rt_point, Font, Scale};
use std::{
    collections::{HashMap, HashSet},
    fmt, fs,
    sync::{Mutex, OnceLock},
};

/// Font description handed to the measurement primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: &str, size: f64, bold: bool, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            size,
            bold,
            italic,
        }
    }

    /// Same face at another size.
    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// CSS-style shorthand, e.g. `italic bold 20px Arial`.
    pub fn css_string(&self) -> String {
        let mut out = String::new();
        if self.italic {
            out.push_str("italic ");
        }
        if self.bold {
            out.push_str("bold ");
        }
        out.push_str(&format!("{}px {}", self.size, self.family));
        out
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_string())
    }
}

/// Returns the rendered width of `text` in pixels.
pub trait TextMeasurer: Send + Sync {
    fn text_width(&self, font: &FontSpec, text: &str) -> f64;
}

/// Deterministic measurer: every character advances a fixed fraction of the
/// font size. Bold text is 10% wider.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasurer {
    pub advance: f64,
}

impl Default for ApproxMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for ApproxMeasurer {
    fn text_width(&self, font: &FontSpec, text: &str) -> f64 {
        let weight = if font.bold { 1.1 } else { 1.0 };
        text.chars().count() as f64 * font.size * self.advance * weight
    }
}

/// Measures with real glyph advances from system fonts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontMeasurer {
    fallback: ApproxMeasurer,
}

impl FontMeasurer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextMeasurer for FontMeasurer {
    fn text_width(&self, font: &FontSpec, text: &str) -> f64 {
        match get_font_for(&font.family, font.bold, font.italic) {
            Some(face) => layout_width(face, font.size as f32, text) as f64,
            None => self.fallback.text_width(font, text),
        }
    }
}

/// Advance width of `text` laid out on a single line.
pub fn layout_width(font: &Font<'_>, size: f32, text: &str) -> f32 {
    let scale = Scale::uniform(size);
    font.layout(text, scale, rt_point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

/// Family names available for the style picker, sorted.
pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

fn sans_serif() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<&'static Font<'static>>> = OnceLock::new();
    *FONT.get_or_init(|| {
        let font = load_font_from_system("Sans", false, false);
        if font.is_none() {
            tracing::warn!("No sans-serif system font found, text is measured approximately");
        }
        font.map(|f| &*Box::leak(Box::new(f)))
    })
}

/// Resolves a face for the family, falling back to the system sans-serif.
///
/// `None` only when the system has no usable fonts at all.
pub fn get_font_for(family: &str, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, &'static Font<'static>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.to_string(),
        bold,
        italic,
    };

    if let Some(font) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return Some(font);
    }

    let font_ref: &'static Font<'static> = match load_font_from_system(family, bold, italic) {
        Some(font) => Box::leak(Box::new(font)),
        None => {
            tracing::warn!("Font family '{}' not found, using sans-serif", family);
            sans_serif()?
        }
    };

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, font_ref);
    Some(font_ref)
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" | "sans-serif" => vec![Family::SansSerif],
        "Serif" | "serif" => vec![Family::Serif],
        "Monospace" | "monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    }
}
