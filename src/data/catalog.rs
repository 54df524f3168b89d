use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use eframe::egui::Color32;
use serde::Deserialize;

use crate::color;

// ---------------------------------------------------------------------------
// Class catalog – fixed code → (name, color) reference data
// ---------------------------------------------------------------------------

/// Display label for codes the catalog does not know.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Land-cover legend bundled with the binary (collection-9 classes).
const BUILTIN_CATALOG: &str = include_str!("../../assets/classes.json");

/// One legend entry as stored in catalog files.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassEntry {
    pub code: u16,
    pub name: String,
    /// `#rrggbb`; entries without a color get a generated hue.
    #[serde(default)]
    pub color: Option<String>,
}

/// Immutable land-cover legend, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ClassCatalog {
    entries: BTreeMap<u16, ClassEntry>,
}

impl ClassCatalog {
    /// The legend bundled with the binary.
    ///
    /// The embedded JSON is validated by tests, so a parse failure here is a
    /// build defect rather than a runtime condition.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CATALOG).expect("embedded class catalog is valid")
    }

    /// Load a legend from a file. Dispatch by extension.
    ///
    /// Supported formats:
    /// * `.json` – `[{ "code": 3, "name": "...", "color": "#1f8d49" }, ...]`
    /// * `.csv`  – header `code,name,color`
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading catalog {}", path.display()))?;
                Self::from_json(&text)
            }
            "csv" => Self::from_csv(path),
            other => bail!("Unsupported catalog extension: .{other}"),
        }
    }

    fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<ClassEntry> =
            serde_json::from_str(text).context("parsing catalog JSON")?;
        Self::from_entries(entries)
    }

    fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path).context("opening catalog CSV")?;
        let mut entries = Vec::new();
        for (row_no, result) in reader.deserialize::<ClassEntry>().enumerate() {
            let entry = result.with_context(|| format!("catalog CSV row {row_no}"))?;
            entries.push(entry);
        }
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<ClassEntry>) -> Result<Self> {
        if entries.is_empty() {
            bail!("catalog contains no classes");
        }
        let mut map = BTreeMap::new();
        for entry in entries {
            if let Some(hex) = &entry.color {
                if color::parse_hex(hex).is_none() {
                    bail!("class {} has malformed color '{hex}'", entry.code);
                }
            }
            if map.insert(entry.code, entry.clone()).is_some() {
                bail!("duplicate class code {}", entry.code);
            }
        }
        Ok(Self { entries: map })
    }

    /// Number of cataloged classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the code belongs to the legend.
    pub fn contains(&self, code: u16) -> bool {
        self.entries.contains_key(&code)
    }

    /// All codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.keys().copied()
    }

    /// Display name for a cataloged code.
    pub fn name_of(&self, code: u16) -> Option<&str> {
        self.entries.get(&code).map(|e| e.name.as_str())
    }

    /// Display name, substituting the placeholder for unknown codes.
    pub fn name_or_unknown(&self, code: u16) -> String {
        self.name_of(code)
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    /// Display color. Cataloged entries without a color get a generated hue;
    /// unknown codes get the black placeholder.
    pub fn color_of(&self, code: u16) -> Color32 {
        match self.entries.get(&code) {
            Some(entry) => entry
                .color
                .as_deref()
                .and_then(color::parse_hex)
                .unwrap_or_else(|| color::fallback_color(code)),
            None => color::UNKNOWN_COLOR,
        }
    }
}
