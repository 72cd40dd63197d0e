//! Configuration surface for the liquid-wave component.
//!
//! Defaults mirror the stock look: solid blue front wave over a blue→cyan
//! gradient back wave, white ripples every three seconds.

use crate::color::{Color, FillStyle, LinearGradient};
use crate::decoration::FloatingDecoration;
use crate::error::{positive_dimension, positive_duration, ConfigError, Result};
use crate::mask::Mask;
use crate::ripple::RippleSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct WaveConfig {
    pub front_fill: FillStyle,
    pub back_fill: FillStyle,
    pub mask: Option<Mask>,
    pub decoration: Option<FloatingDecoration>,
    pub auto_ripple_enabled: bool,
    pub tap_ripple_enabled: bool,
    pub ripple_color: Color,
    pub ripple_max_diameter: f64,
    pub ripple_opacity: f64,
    pub ripple_stroke_width: f64,
    /// Seconds for a ripple to expand fully and disappear.
    pub ripple_duration: f64,
    /// Seconds between automatic ripples.
    pub ripple_interval: f64,
    /// Wave height as a fraction of surface height (front layer).
    pub wave_amplitude: f64,
    /// Seconds between wave ticks when driven by [`crate::driver::Driver`].
    pub tick_interval: f64,
    /// Seconds to ease toward a new level; zero jumps immediately.
    pub level_transition: f64,
}

fn default_back_fill() -> FillStyle {
    // Two stops never fail validation
    match LinearGradient::vertical(&[Color::BLUE, Color::CYAN]) {
        Ok(gradient) => FillStyle::Gradient(gradient),
        Err(_) => FillStyle::Solid(Color::CYAN),
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            front_fill: FillStyle::Solid(Color::BLUE),
            back_fill: default_back_fill(),
            mask: None,
            decoration: None,
            auto_ripple_enabled: true,
            tap_ripple_enabled: true,
            ripple_color: Color::WHITE,
            ripple_max_diameter: 100.0,
            ripple_opacity: 0.5,
            ripple_stroke_width: 2.0,
            ripple_duration: 2.0,
            ripple_interval: 3.0,
            wave_amplitude: 0.04,
            tick_interval: 0.016,
            level_transition: 0.3,
        }
    }
}

impl WaveConfig {
    pub fn builder() -> WaveConfigBuilder {
        WaveConfigBuilder::default()
    }

    /// Reject settings that would stall or divide by zero.
    pub fn validate(&self) -> Result<()> {
        positive_duration("ripple_duration", self.ripple_duration)?;
        positive_duration("ripple_interval", self.ripple_interval)?;
        positive_duration("tick_interval", self.tick_interval)?;
        if !(self.level_transition.is_finite() && self.level_transition >= 0.0) {
            return Err(ConfigError::NonPositiveDuration {
                name: "level_transition",
                value: self.level_transition,
            });
        }
        positive_dimension("ripple_max_diameter", self.ripple_max_diameter)?;
        positive_dimension("ripple_stroke_width", self.ripple_stroke_width)?;
        if !self.wave_amplitude.is_finite() {
            return Err(ConfigError::InvalidDimension {
                name: "wave_amplitude",
                value: self.wave_amplitude,
            });
        }
        if let Some(decoration) = &self.decoration {
            decoration.validate()?;
        }
        Ok(())
    }

    /// Whether ripples are drawn at all.
    pub fn ripples_visible(&self) -> bool {
        self.auto_ripple_enabled || self.tap_ripple_enabled
    }

    pub(crate) fn ripple_settings(&self) -> RippleSettings {
        RippleSettings {
            color: self.ripple_color,
            duration: self.ripple_duration,
            interval: self.ripple_interval,
            auto_enabled: self.auto_ripple_enabled,
        }
    }
}

/// Fluent builder over [`WaveConfig`]; `build` validates.
#[derive(Clone, Debug, Default)]
pub struct WaveConfigBuilder {
    config: WaveConfig,
}

macro_rules! setter {
    ($name:ident: $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.config.$name = value;
            self
        }
    };
}

impl WaveConfigBuilder {
    setter!(auto_ripple_enabled: bool);
    setter!(tap_ripple_enabled: bool);
    setter!(ripple_color: Color);
    setter!(ripple_max_diameter: f64);
    setter!(ripple_opacity: f64);
    setter!(ripple_stroke_width: f64);
    setter!(ripple_duration: f64);
    setter!(ripple_interval: f64);
    setter!(wave_amplitude: f64);
    setter!(tick_interval: f64);
    setter!(level_transition: f64);

    pub fn front_fill(mut self, fill: impl Into<FillStyle>) -> Self {
        self.config.front_fill = fill.into();
        self
    }

    pub fn back_fill(mut self, fill: impl Into<FillStyle>) -> Self {
        self.config.back_fill = fill.into();
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.config.mask = Some(mask);
        self
    }

    pub fn decoration(mut self, decoration: FloatingDecoration) -> Self {
        self.config.decoration = Some(decoration);
        self
    }

    pub fn build(self) -> Result<WaveConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
