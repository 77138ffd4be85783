//! Grain direction of panels and the per-material grain preference table.

use serde::{Deserialize, Serialize};

/// Dominant fiber orientation of a part or sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrainDirection {
    /// Fibers run along the X axis.
    Horizontal,
    /// Fibers run along the Y axis.
    Vertical,
    /// No grain constraint.
    #[default]
    Any,
}

impl GrainDirection {
    /// Grain after a 90° rotation.
    pub fn rotated(self) -> Self {
        match self {
            GrainDirection::Horizontal => GrainDirection::Vertical,
            GrainDirection::Vertical => GrainDirection::Horizontal,
            GrainDirection::Any => GrainDirection::Any,
        }
    }

    /// Check if this is a fixed orientation.
    pub fn is_fixed(self) -> bool {
        self != GrainDirection::Any
    }

    /// Orientation of a piece's long axis. Square pieces count as horizontal.
    pub fn along_long_side(width: u32, height: u32) -> Self {
        if width >= height {
            GrainDirection::Horizontal
        } else {
            GrainDirection::Vertical
        }
    }
}

impl std::fmt::Display for GrainDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrainDirection::Horizontal => write!(f, "horizontal"),
            GrainDirection::Vertical => write!(f, "vertical"),
            GrainDirection::Any => write!(f, "any"),
        }
    }
}

/// One entry of the grain preference table: a material token and the grain
/// panels of that material carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrainRule {
    /// Token searched for anywhere in the material label.
    pub token: String,
    /// Preferred grain for labels containing the token.
    pub grain: GrainDirection,
}

impl GrainRule {
    pub fn new(token: impl Into<String>, grain: GrainDirection) -> Self {
        Self {
            token: token.into(),
            grain,
        }
    }
}

/// Ordered material → grain preference table. The first matching token wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrainPreferences {
    rules: Vec<GrainRule>,
}

impl Default for GrainPreferences {
    fn default() -> Self {
        use GrainDirection::{Any, Horizontal};

        Self {
            rules: vec![
                GrainRule::new("ПДЧ", Any),
                GrainRule::new("МДФ", Any),
                GrainRule::new("ХДЛ", Horizontal),
                GrainRule::new("Масив", Horizontal),
                GrainRule::new("Фурнир", Horizontal),
                GrainRule::new("Шперплат", Any),
            ],
        }
    }
}

impl GrainPreferences {
    /// Create a table from explicit rules.
    pub fn new(rules: Vec<GrainRule>) -> Self {
        Self { rules }
    }

    /// Get the rules in lookup order.
    pub fn rules(&self) -> &[GrainRule] {
        &self.rules
    }

    /// Set or append the preference for a token.
    pub fn set(&mut self, token: impl Into<String>, grain: GrainDirection) {
        let token = token.into();
        match self.rules.iter_mut().find(|r| r.token == token) {
            Some(rule) => rule.grain = grain,
            None => self.rules.push(GrainRule::new(token, grain)),
        }
    }

    /// Preference of the first rule whose token appears in `label`.
    pub fn lookup(&self, label: &str) -> Option<GrainDirection> {
        self.rules
            .iter()
            .find(|r| label.contains(r.token.as_str()))
            .map(|r| r.grain)
    }

    /// Resolve the grain of a `width` × `height` piece cut from `label`.
    ///
    /// A fixed preference follows the piece's long axis; unknown materials and
    /// grain-agnostic ones resolve to [`GrainDirection::Any`].
    pub fn detect(&self, label: &str, width: u32, height: u32) -> GrainDirection {
        match self.lookup(label) {
            Some(GrainDirection::Any) | None => GrainDirection::Any,
            Some(_) => GrainDirection::along_long_side(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_flips_fixed_grain() {
        assert_eq!(GrainDirection::Horizontal.rotated(), GrainDirection::Vertical);
        assert_eq!(GrainDirection::Vertical.rotated(), GrainDirection::Horizontal);
        assert_eq!(GrainDirection::Any.rotated(), GrainDirection::Any);
    }

    #[test]
    fn test_detect_grain_agnostic_material() {
        let prefs = GrainPreferences::default();
        assert_eq!(prefs.detect("ПДЧ 18мм", 800, 600), GrainDirection::Any);
        assert_eq!(prefs.detect("МДФ 16мм", 300, 900), GrainDirection::Any);
    }

    #[test]
    fn test_detect_fixed_grain_follows_long_side() {
        let prefs = GrainPreferences::default();
        assert_eq!(prefs.detect("Масив 20мм", 800, 600), GrainDirection::Horizontal);
        assert_eq!(prefs.detect("Масив 20мм", 600, 800), GrainDirection::Vertical);
        assert_eq!(prefs.detect("ХДЛ 3мм", 500, 500), GrainDirection::Horizontal);
    }

    #[test]
    fn test_detect_token_anywhere_in_label() {
        let prefs = GrainPreferences::default();
        assert_eq!(prefs.detect("Дъб Фурнир 18мм", 400, 900), GrainDirection::Vertical);
    }

    #[test]
    fn test_detect_unknown_material() {
        let prefs = GrainPreferences::default();
        assert_eq!(prefs.detect("Acrylic 5mm", 800, 600), GrainDirection::Any);
    }

    #[test]
    fn test_set_overrides_existing_rule() {
        let mut prefs = GrainPreferences::default();
        prefs.set("ПДЧ", GrainDirection::Horizontal);
        assert_eq!(prefs.rules().len(), 6);
        assert_eq!(prefs.detect("ПДЧ 18мм", 300, 900), GrainDirection::Vertical);

        prefs.set("OSB", GrainDirection::Vertical);
        assert_eq!(prefs.rules().len(), 7);
        assert_eq!(prefs.lookup("OSB 12мм"), Some(GrainDirection::Vertical));
    }

    #[test]
    fn test_preferences_serialize_as_list() {
        let prefs = GrainPreferences::new(vec![GrainRule::new("ХДЛ", GrainDirection::Horizontal)]);
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json, r#"[{"token":"ХДЛ","grain":"horizontal"}]"#);
    }
}
