//! CSS-style colors for entities
//!
//! Particles roll HSL hues; enemy tables name colors directly. Both render to
//! CSS strings, and HSL colors can fade for trail segments.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rand_between;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hue in degrees, saturation and lightness in percent
    Hsl { h: f32, s: f32, l: f32 },
    /// Any CSS color keyword or hex string
    Named(String),
}

impl Default for Color {
    fn default() -> Self {
        Color::named("red")
    }
}

impl Color {
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Color::Hsl { h, s, l }
    }

    pub fn named(name: &str) -> Self {
        Color::Named(name.to_string())
    }

    /// Vivid particle color with a hue drawn from `[hue_min, hue_min + span)`
    pub fn random_hue<R: Rng + ?Sized>(rng: &mut R, hue_min: f32, span: f32) -> Self {
        Color::hsl(rand_between(rng, hue_min, hue_min + span), 80.0, 60.0)
    }

    pub fn gold() -> Self {
        Color::named("gold")
    }

    pub fn light_green() -> Self {
        Color::named("lightgreen")
    }

    /// CSS color string
    pub fn css(&self) -> String {
        match self {
            Color::Hsl { h, s, l } => format!("hsl({}, {}%, {}%)", h, s, l),
            Color::Named(name) => name.clone(),
        }
    }

    /// CSS color string faded to `alpha` (named colors stay opaque)
    pub fn css_with_alpha(&self, alpha: f32) -> String {
        match self {
            Color::Hsl { h, s, l } => format!("hsla({}, {}%, {}%, {})", h, s, l, alpha),
            Color::Named(name) => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_output() {
        assert_eq!(Color::hsl(0.0, 100.0, 70.0).css(), "hsl(0, 100%, 70%)");
        assert_eq!(
            Color::hsl(200.0, 80.0, 60.0).css_with_alpha(0.5),
            "hsla(200, 80%, 60%, 0.5)"
        );
        assert_eq!(Color::gold().css_with_alpha(0.2), "gold");
    }

    #[test]
    fn test_deserialize_either_form() {
        let named: Color = serde_json::from_str("\"purple\"").unwrap();
        assert_eq!(named, Color::named("purple"));

        let hsl: Color = serde_json::from_str(r#"{"h": 120, "s": 50, "l": 40}"#).unwrap();
        assert_eq!(hsl, Color::hsl(120.0, 50.0, 40.0));
    }
}
