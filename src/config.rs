//! Field configuration.
//!
//! A [`FieldConfig`] fully describes one particle field: how many bodies a
//! surface gets ([`Population`]), how the pointer affects them
//! ([`PointerConfig`]), and which variant runs with what sampling ranges
//! ([`Style`]).
//!
//! Two presets match the effects shipped on the marketing pages:
//!
//! ```ignore
//! let embers = FieldConfig::ember();     // rising, flickering, glowing
//! let ambient = FieldConfig::ambient();  // drifting dots with connection lines
//! ```
//!
//! Configs can also be loaded from JSON. Anything omitted falls back to the
//! preset for the chosen variant:
//!
//! ```json
//! {
//!     "style": { "variant": "ember", "hue": { "start": 190.0, "end": 220.0 } },
//!     "population": { "cap": 40, "density_divisor": 30000.0 }
//! }
//! ```

use crate::color::Color;
use crate::connections::ConnectionConfig;
use crate::error::ConfigError;
use crate::interactions::{PointerConfig, PointerResponse};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// How many bodies a surface of a given size receives.
///
/// `count = min(cap, floor(width * height / density_divisor))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Population {
    /// Upper bound, independent of surface area.
    pub cap: usize,
    /// Square pixels per body.
    pub density_divisor: f32,
}

impl Population {
    pub fn ambient() -> Self {
        Self {
            cap: 80,
            density_divisor: 15_000.0,
        }
    }

    pub fn ember() -> Self {
        Self {
            cap: 60,
            density_divisor: 25_000.0,
        }
    }
}

/// Sampling ranges and rendering for the ambient variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientStyle {
    /// Range for each velocity component, pixels per frame.
    pub speed: Range<f32>,
    pub radius: Range<f32>,
    pub opacity: Range<f32>,
    /// Dot color. Its alpha is replaced by each particle's opacity.
    pub color: Color,
    /// Velocity multiplier applied every frame.
    pub damping: f32,
    /// Lines between nearby particles. `None` disables them.
    pub connections: Option<ConnectionConfig>,
}

impl Default for AmbientStyle {
    fn default() -> Self {
        Self {
            speed: -0.25..0.25,
            radius: 0.5..2.0,
            opacity: 0.2..0.7,
            color: Color::rgb8(100, 255, 218, 1.0),
            damping: 0.999,
            connections: Some(ConnectionConfig::default()),
        }
    }
}

/// Sampling ranges and rendering for the ember variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmberStyle {
    /// Hue band in degrees (warm oranges by default).
    pub hue: Range<f32>,
    /// Horizontal velocity, pixels per frame.
    pub speed_x: Range<f32>,
    /// Upward speed, pixels per frame. Sampled positive, applied upward.
    pub rise_speed: Range<f32>,
    pub radius: Range<f32>,
    /// Base opacity before fade, flicker and pointer boost.
    pub opacity: Range<f32>,
    /// Lifespan in frames.
    pub life: Range<f32>,
    /// Flicker angular rate, radians per millisecond of frame time.
    pub flicker_rate: Range<f32>,
    /// Sideways drift angular rate, radians per millisecond of frame time.
    pub drift: Range<f32>,
    /// Embers spawn up to this many pixels below the bottom edge.
    pub spawn_depth: f32,
    /// Peak sideways drift per frame, pixels.
    pub drift_amplitude: f32,
    /// Fraction of the lifespan spent fading in.
    pub fade_in: f32,
    /// Fraction of the lifespan spent fading out.
    pub fade_out: f32,
    /// Upper bound on opacity once the pointer brightens an ember.
    pub opacity_cap: f32,
    /// Glow radius as a multiple of the ember radius.
    pub glow_scale: f32,
    /// Bright core radius as a multiple of the ember radius.
    pub core_scale: f32,
    /// Embers this far above the top edge are respawned.
    pub escape_margin: f32,
}

impl Default for EmberStyle {
    fn default() -> Self {
        Self {
            hue: 15.0..45.0,
            speed_x: -0.15..0.15,
            rise_speed: 0.15..0.75,
            radius: 0.5..3.0,
            opacity: 0.05..0.45,
            life: 300.0..700.0,
            flicker_rate: 0.005..0.025,
            drift: 0.001..0.004,
            spawn_depth: 100.0,
            drift_amplitude: 0.3,
            fade_in: 0.1,
            fade_out: 0.3,
            opacity_cap: 0.7,
            glow_scale: 6.0,
            core_scale: 0.5,
            escape_margin: 50.0,
        }
    }
}

/// Which variant a field runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Style {
    /// Drifting particles, reflective walls, connection lines, no lifespan.
    Ambient(AmbientStyle),
    /// Rising embers with lifespan, flicker and glow, respawned in place.
    Ember(EmberStyle),
}

impl Style {
    pub fn name(&self) -> &'static str {
        match self {
            Style::Ambient(_) => "ambient",
            Style::Ember(_) => "ember",
        }
    }
}

/// Complete description of a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldDocument")]
pub struct FieldConfig {
    pub population: Population,
    pub pointer: PointerConfig,
    pub style: Style,
}

impl FieldConfig {
    /// Drifting connected dots with soft pointer attraction.
    pub fn ambient() -> Self {
        Self {
            population: Population::ambient(),
            pointer: PointerConfig::ambient(),
            style: Style::Ambient(AmbientStyle::default()),
        }
    }

    /// Rising, flickering embers pushed away by the pointer.
    pub fn ember() -> Self {
        Self {
            population: Population::ember(),
            pointer: PointerConfig::ember(),
            style: Style::Ember(EmberStyle::default()),
        }
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON for this config.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the upper bound on the body count.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.population.cap = cap;
        self
    }

    /// Set the square pixels per body.
    pub fn with_density_divisor(mut self, divisor: f32) -> Self {
        self.population.density_divisor = divisor;
        self
    }

    /// Set the pointer interaction radius.
    pub fn with_pointer_radius(mut self, radius: f32) -> Self {
        self.pointer.radius = radius;
        self
    }

    /// Set whether the pointer attracts or repels.
    pub fn with_pointer_response(mut self, response: PointerResponse) -> Self {
        self.pointer.response = response;
        self
    }

    /// Replace the connection lines of an ambient field. Ember fields ignore this.
    pub fn with_connections(mut self, connections: Option<ConnectionConfig>) -> Self {
        if let Style::Ambient(style) = &mut self.style {
            style.connections = connections;
        }
        self
    }

    /// Reject configs that cannot produce a sensible field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.population.density_divisor > 0.0) {
            return Err(invalid("population.density_divisor must be positive"));
        }
        if !(self.pointer.radius > 0.0) {
            return Err(invalid("pointer.radius must be positive"));
        }
        match &self.style {
            Style::Ambient(style) => {
                check_range("speed", &style.speed)?;
                check_range("radius", &style.radius)?;
                check_range("opacity", &style.opacity)?;
                if !(style.damping > 0.0 && style.damping <= 1.0) {
                    return Err(invalid("damping must be in (0, 1]"));
                }
                if let Some(conn) = &style.connections {
                    if !(conn.distance > 0.0) {
                        return Err(invalid("connections.distance must be positive"));
                    }
                }
            }
            Style::Ember(style) => {
                check_range("hue", &style.hue)?;
                check_range("speed_x", &style.speed_x)?;
                check_range("rise_speed", &style.rise_speed)?;
                check_range("radius", &style.radius)?;
                check_range("opacity", &style.opacity)?;
                check_range("life", &style.life)?;
                check_range("flicker_rate", &style.flicker_rate)?;
                check_range("drift", &style.drift)?;
                if !(style.life.start > 0.0) {
                    return Err(invalid("life must be positive"));
                }
                if !(style.fade_in >= 0.0 && style.fade_out >= 0.0 && style.fade_in + style.fade_out <= 1.0) {
                    return Err(invalid("fade_in + fade_out must lie within the lifespan"));
                }
            }
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::ember()
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

fn check_range(name: &str, range: &Range<f32>) -> Result<(), ConfigError> {
    if range.start.is_finite() && range.end.is_finite() && range.start <= range.end {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} range {}..{} is inverted or not finite",
            name, range.start, range.end
        )))
    }
}

/// On-disk shape of a [`FieldConfig`]: only the style is required.
#[derive(Deserialize)]
struct FieldDocument {
    style: Style,
    population: Option<Population>,
    pointer: Option<PointerConfig>,
}

impl From<FieldDocument> for FieldConfig {
    fn from(doc: FieldDocument) -> Self {
        let preset = match doc.style {
            Style::Ambient(_) => FieldConfig::ambient(),
            Style::Ember(_) => FieldConfig::ember(),
        };
        FieldConfig {
            population: doc.population.unwrap_or(preset.population),
            pointer: doc.pointer.unwrap_or(preset.pointer),
            style: doc.style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let ember = FieldConfig::ember();
        assert_eq!(ember.population.cap, 60);
        assert_eq!(ember.population.density_divisor, 25_000.0);
        assert_eq!(ember.pointer.radius, 100.0);
        assert_eq!(ember.pointer.response, PointerResponse::Repel);

        let ambient = FieldConfig::ambient();
        assert_eq!(ambient.population.cap, 80);
        assert_eq!(ambient.population.density_divisor, 15_000.0);
        assert_eq!(ambient.pointer.radius, 120.0);
        assert_eq!(ambient.style.name(), "ambient");

        assert!(ember.validate().is_ok());
        assert!(ambient.validate().is_ok());
    }

    #[test]
    fn test_minimal_document_uses_variant_preset() {
        let config = FieldConfig::from_json(r#"{ "style": { "variant": "ambient" } }"#).unwrap();
        assert_eq!(config, FieldConfig::ambient());

        let config = FieldConfig::from_json(r#"{ "style": { "variant": "ember" } }"#).unwrap();
        assert_eq!(config, FieldConfig::ember());
    }

    #[test]
    fn test_partial_style_overrides() {
        let json = r#"{
            "style": { "variant": "ember", "hue": { "start": 190.0, "end": 220.0 } },
            "population": { "cap": 12, "density_divisor": 5000.0 }
        }"#;
        let config = FieldConfig::from_json(json).unwrap();
        assert_eq!(config.population.cap, 12);
        assert_eq!(config.pointer, PointerConfig::ember());
        match config.style {
            Style::Ember(style) => {
                assert_eq!(style.hue, 190.0..220.0);
                assert_eq!(style.life, 300.0..700.0);
            }
            Style::Ambient(_) => panic!("expected ember style"),
        }
    }

    #[test]
    fn test_serialized_config_reloads() {
        let config = FieldConfig::ambient()
            .with_cap(20)
            .with_connections(None);
        let json = config.to_json().unwrap();
        assert_eq!(FieldConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let zero_divisor = FieldConfig::ember().with_density_divisor(0.0);
        assert!(matches!(zero_divisor.validate(), Err(ConfigError::Invalid(_))));

        let no_radius = FieldConfig::ambient().with_pointer_radius(-1.0);
        assert!(no_radius.validate().is_err());

        let json = r#"{ "style": { "variant": "ember", "life": { "start": 700.0, "end": 300.0 } } }"#;
        assert!(matches!(FieldConfig::from_json(json), Err(ConfigError::Invalid(_))));

        assert!(matches!(FieldConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = FieldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_connections_ignored_for_embers() {
        let config = FieldConfig::ember().with_connections(None);
        assert_eq!(config, FieldConfig::ember());
    }
}
