//! Panel material labels parsed into a comparable kind and thickness.

use serde::{Deserialize, Serialize};

/// Known panel material families.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// ПДЧ (particle board).
    Chipboard,
    /// МДФ.
    Mdf,
    /// ХДЛ (hardboard).
    Hdf,
    /// Масив (solid wood).
    SolidWood,
    /// Фурнир (veneer).
    Veneer,
    /// Шперплат (plywood).
    Plywood,
    /// Unrecognized label, compared verbatim.
    Other(String),
}

impl MaterialKind {
    /// Label prefixes recognized as a material family.
    const TOKENS: [(&'static str, MaterialKind); 6] = [
        ("ПДЧ", MaterialKind::Chipboard),
        ("МДФ", MaterialKind::Mdf),
        ("ХДЛ", MaterialKind::Hdf),
        ("Масив", MaterialKind::SolidWood),
        ("Фурнир", MaterialKind::Veneer),
        ("Шперплат", MaterialKind::Plywood),
    ];

    /// Kind named by the start of `label`, or `Other` with the whole label.
    pub fn from_label(label: &str) -> Self {
        Self::TOKENS
            .iter()
            .find(|(token, _)| label.starts_with(token))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| MaterialKind::Other(label.to_string()))
    }

    /// Display token for this kind.
    pub fn token(&self) -> &str {
        match self {
            MaterialKind::Chipboard => "ПДЧ",
            MaterialKind::Mdf => "МДФ",
            MaterialKind::Hdf => "ХДЛ",
            MaterialKind::SolidWood => "Масив",
            MaterialKind::Veneer => "Фурнир",
            MaterialKind::Plywood => "Шперплат",
            MaterialKind::Other(label) => label,
        }
    }
}

/// A material as entered by the user together with its parsed kind and thickness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Material {
    label: String,
    kind: MaterialKind,
    thickness_mm: Option<u32>,
}

impl Material {
    /// Parse a display label such as `"ПДЧ 18мм"`.
    pub fn parse(label: impl Into<String>) -> Self {
        let label = label.into();
        let kind = MaterialKind::from_label(&label);
        let thickness_mm = parse_thickness(&label);
        Self {
            label,
            kind,
            thickness_mm,
        }
    }

    /// Label as entered.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parsed material family.
    pub fn kind(&self) -> &MaterialKind {
        &self.kind
    }

    /// Declared thickness, if the label carries one.
    pub fn thickness_mm(&self) -> Option<u32> {
        self.thickness_mm
    }

    /// Check if a part of this material may be cut from a sheet of `sheet`.
    ///
    /// Kinds must be equal. Thicknesses must be equal when both are declared.
    pub fn matches(&self, sheet: &Material) -> bool {
        if self.kind != sheet.kind {
            return false;
        }
        match (self.thickness_mm, sheet.thickness_mm) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::parse(crate::config::DEFAULT_MATERIAL)
    }
}

impl From<String> for Material {
    fn from(label: String) -> Self {
        Material::parse(label)
    }
}

impl From<&str> for Material {
    fn from(label: &str) -> Self {
        Material::parse(label)
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.label
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// First digit run followed by optional whitespace and `мм`.
fn parse_thickness(label: &str) -> Option<u32> {
    let mut rest = label;
    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let from_digits = &rest[start..];
        let digits_len = from_digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(from_digits.len());
        let (digits, tail) = from_digits.split_at(digits_len);
        if tail.trim_start().starts_with("мм") {
            return digits.parse().ok();
        }
        rest = tail;
    }
    None
}
