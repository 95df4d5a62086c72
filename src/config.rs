use super::*;
use serde::{Deserialize, Serialize};

/// Thresholds, delays and effect constants for the page behaviors.
///
/// `Default` reproduces the values the CPU Wars page ships with. A JSON
/// document only needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
    pub effects: EffectsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Navbar gets `scrolled` strictly above this offset.
    pub scrolled_threshold: f64,
    /// A section becomes current once the offset reaches `top - section_offset`.
    pub section_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 100.0,
            section_offset: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    /// Trimmed off the bottom of the viewport before testing visibility.
    pub bottom_margin: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub filter_reveal_ms: i64,
    pub filter_collapse_ms: i64,
    pub result_reveal_ms: i64,
    pub ripple_lifetime_ms: i64,
    pub hero_stagger_ms: i64,
    pub notification_visible_ms: i64,
    pub notification_exit_ms: i64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            filter_reveal_ms: 50,
            filter_collapse_ms: 300,
            result_reveal_ms: 100,
            ripple_lifetime_ms: 600,
            hero_stagger_ms: 100,
            notification_visible_ms: 2000,
            notification_exit_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Widths at or below this are treated as touch layouts.
    pub mobile_breakpoint: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub parallax_step: f64,
    pub float_speed: f64,
    pub float_duration_factor: f64,
    pub float_delay_step: f64,
    pub cursor_glow_size: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            parallax_step: 0.1,
            float_speed: 2.0,
            float_duration_factor: 3.0,
            float_delay_step: 0.5,
            cursor_glow_size: 300.0,
        }
    }
}

impl PageConfig {
    pub fn from_json(src: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(Error::Config(format!(
                "reveal.threshold must be within [0, 1], got {}",
                self.reveal.threshold
            )));
        }

        let lengths = [
            ("scroll.scrolled_threshold", self.scroll.scrolled_threshold),
            ("scroll.section_offset", self.scroll.section_offset),
            ("reveal.bottom_margin", self.reveal.bottom_margin),
            ("layout.mobile_breakpoint", self.layout.mobile_breakpoint),
            ("effects.parallax_step", self.effects.parallax_step),
            ("effects.float_speed", self.effects.float_speed),
            ("effects.float_duration_factor", self.effects.float_duration_factor),
            ("effects.float_delay_step", self.effects.float_delay_step),
            ("effects.cursor_glow_size", self.effects.cursor_glow_size),
        ];
        if let Some((name, value)) = lengths
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(Error::Config(format!(
                "{name} must be a finite non-negative number, got {value}"
            )));
        }

        let delays = [
            ("timing.filter_reveal_ms", self.timing.filter_reveal_ms),
            ("timing.filter_collapse_ms", self.timing.filter_collapse_ms),
            ("timing.result_reveal_ms", self.timing.result_reveal_ms),
            ("timing.ripple_lifetime_ms", self.timing.ripple_lifetime_ms),
            ("timing.hero_stagger_ms", self.timing.hero_stagger_ms),
            ("timing.notification_visible_ms", self.timing.notification_visible_ms),
            ("timing.notification_exit_ms", self.timing.notification_exit_ms),
        ];
        if let Some((name, value)) = delays.iter().find(|(_, value)| *value < 0) {
            return Err(Error::Config(format!(
                "{name} must not be negative, got {value}"
            )));
        }

        Ok(())
    }
}
