// Wed Jan 14 2026 - Alex

use crate::structure::{Alignment, Layout, LayoutError, ScalarKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Platform sizes and alignments the resolver works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiTable {
    pub name: String,
    /// `int`, `uint` and `uintptr`.
    pub word: Layout,
    pub pointer: Layout,
    pub int64: Layout,
    pub float64: Layout,
    pub complex64: Layout,
    pub complex128: Layout,
    pub string: Layout,
    pub slice: Layout,
    pub map: Layout,
    pub channel: Layout,
    pub interface: Layout,
    pub function: Layout,
}

fn entry(size: u64, align: u64) -> Layout {
    // Preset entries are powers of two by construction.
    Layout::new(size, Alignment::new(align).unwrap_or(Alignment::ONE))
}

impl AbiTable {
    pub fn amd64() -> Self {
        Self {
            name: "amd64".to_string(),
            word: entry(8, 8),
            pointer: entry(8, 8),
            int64: entry(8, 8),
            float64: entry(8, 8),
            complex64: entry(8, 8),
            complex128: entry(16, 8),
            string: entry(16, 8),
            slice: entry(24, 8),
            map: entry(8, 8),
            channel: entry(8, 8),
            interface: entry(16, 8),
            function: entry(8, 8),
        }
    }

    pub fn arm64() -> Self {
        Self {
            name: "arm64".to_string(),
            ..Self::amd64()
        }
    }

    pub fn i386() -> Self {
        Self {
            name: "386".to_string(),
            word: entry(4, 4),
            pointer: entry(4, 4),
            int64: entry(8, 4),
            float64: entry(8, 4),
            complex64: entry(8, 4),
            complex128: entry(16, 4),
            string: entry(8, 4),
            slice: entry(12, 4),
            map: entry(4, 4),
            channel: entry(4, 4),
            interface: entry(8, 4),
            function: entry(4, 4),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "amd64" | "x86_64" | "x86-64" => Some(Self::amd64()),
            "arm64" | "aarch64" => Some(Self::arm64()),
            "386" | "i386" | "x86" => Some(Self::i386()),
            _ => None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path.as_ref())?;
        let table: Self = serde_json::from_str(&text)?;
        table.validate()?;
        Ok(table)
    }

    /// A preset name, or a path to a JSON table.
    pub fn load(spec: &str) -> Result<Self, LayoutError> {
        if let Some(table) = Self::by_name(spec) {
            return Ok(table);
        }
        let path = Path::new(spec);
        if path.exists() {
            return Self::from_file(path);
        }
        Err(LayoutError::UnknownAbi(spec.to_string()))
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let entries = [
            ("word", self.word),
            ("pointer", self.pointer),
            ("int64", self.int64),
            ("float64", self.float64),
            ("complex64", self.complex64),
            ("complex128", self.complex128),
            ("string", self.string),
            ("slice", self.slice),
            ("map", self.map),
            ("channel", self.channel),
            ("interface", self.interface),
            ("function", self.function),
        ];
        for (name, layout) in entries {
            if layout.size % layout.align.as_u64() != 0 {
                return Err(LayoutError::ValidationFailed(format!(
                    "{} entry of ABI {}: size {} is not a multiple of alignment {}",
                    name, self.name, layout.size, layout.align
                )));
            }
        }
        Ok(())
    }

    pub fn scalar(&self, kind: ScalarKind) -> Layout {
        match kind {
            ScalarKind::Bool | ScalarKind::Int8 | ScalarKind::Uint8 => entry(1, 1),
            ScalarKind::Int16 | ScalarKind::Uint16 => entry(2, 2),
            ScalarKind::Int32 | ScalarKind::Uint32 | ScalarKind::Float32 => entry(4, 4),
            ScalarKind::Int64 | ScalarKind::Uint64 => self.int64,
            ScalarKind::Float64 => self.float64,
            ScalarKind::Int | ScalarKind::Uint | ScalarKind::Uintptr => self.word,
            ScalarKind::Complex64 => self.complex64,
            ScalarKind::Complex128 => self.complex128,
            ScalarKind::String => self.string,
        }
    }
}

impl Default for AbiTable {
    fn default() -> Self {
        Self::amd64()
    }
}
