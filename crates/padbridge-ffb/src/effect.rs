//! Parameterised, time-addressable force effects.
//!
//! Every effect family shares the same time transform: start delay, then
//! the type-specific nominal waveform, then the optional envelope, then the
//! gain scale, with the result clamped to the magnitude domain.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use padbridge_schemas::elements::VirtualAxis;
use padbridge_schemas::error::{Error, Result};
use padbridge_schemas::forces::{
    EffectTimeMs, EffectValue, OrderedMagnitudeComponents, ZERO_MAGNITUDE_COMPONENTS,
};

use crate::constants::{
    EFFECT_AXES_MAX, EFFECT_AXES_MIN, EFFECT_MAGNITUDE_MAX, EFFECT_MAGNITUDE_MIN,
    EFFECT_MODIFIER_MAX, EFFECT_MODIFIER_MIN,
};
use crate::direction::DirectionVector;
use crate::envelope::Envelope;

/// Unique identity of an effect, stable across parameter updates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EffectId(u64);

impl EffectId {
    /// Allocates a fresh, process-unique identifier.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        EffectId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw identifier value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Shape of a periodic effect's base waveform, evaluated on normalized
/// phase `[0, 1)` into `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// +1 for the first half period, −1 for the second.
    Square,
    /// Sine starting at zero, rising.
    Sine,
    /// Triangle starting at +1.
    Triangle,
    /// Linear ramp from −1 to +1 each period.
    SawtoothUp,
    /// Linear ramp from +1 to −1 each period.
    SawtoothDown,
}

impl Waveform {
    /// Waveform value at normalized phase `x` in `[0, 1)`.
    pub fn evaluate(self, x: EffectValue) -> EffectValue {
        match self {
            Waveform::Square => {
                if x < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sine => (x * std::f32::consts::TAU).sin(),
            Waveform::Triangle => {
                if x < 0.5 {
                    1.0 - 4.0 * x
                } else {
                    4.0 * x - 3.0
                }
            }
            Waveform::SawtoothUp => 2.0 * x - 1.0,
            Waveform::SawtoothDown => 1.0 - 2.0 * x,
        }
    }
}

/// Parameters specific to the periodic effect family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicParams {
    /// Peak deviation from the offset.
    pub magnitude: EffectValue,
    /// Constant offset added to the waveform.
    pub offset: EffectValue,
    /// Phase shift, in milliseconds, added to local time before the
    /// period reduction.
    pub phase_offset: EffectTimeMs,
    /// Waveform period in milliseconds. Must be positive.
    pub period: EffectTimeMs,
}

/// Parameters specific to custom-force effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomForceParams {
    /// Force samples, each within the magnitude domain. Playback cycles
    /// through them.
    pub samples: Vec<EffectValue>,
    /// Time each sample covers, in milliseconds. Must be positive.
    pub sample_period: EffectTimeMs,
}

/// Type-specific parameters, one variant per effect family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Constant force at a fixed magnitude.
    Constant {
        /// Nominal magnitude.
        magnitude: EffectValue,
    },
    /// Linear interpolation between two magnitudes over the duration.
    Ramp {
        /// Magnitude at local time zero.
        start_magnitude: EffectValue,
        /// Magnitude at the end of the duration.
        end_magnitude: EffectValue,
    },
    /// A repeating waveform.
    Periodic {
        /// Base waveform shape.
        waveform: Waveform,
        /// Periodic parameters.
        params: PeriodicParams,
    },
    /// A sampled waveform supplied by the application.
    Custom(CustomForceParams),
}

impl EffectKind {
    fn validate(&self) -> Result<()> {
        let magnitude_domain = EFFECT_MAGNITUDE_MIN..=EFFECT_MAGNITUDE_MAX;
        match self {
            EffectKind::Constant { magnitude } => {
                if !magnitude_domain.contains(magnitude) {
                    return Err(Error::invalid_argument(
                        "constant magnitude",
                        magnitude.to_string(),
                    ));
                }
            }
            EffectKind::Ramp {
                start_magnitude,
                end_magnitude,
            } => {
                for (name, value) in [
                    ("ramp start magnitude", start_magnitude),
                    ("ramp end magnitude", end_magnitude),
                ] {
                    if !magnitude_domain.contains(value) {
                        return Err(Error::invalid_argument(name, value.to_string()));
                    }
                }
            }
            EffectKind::Periodic { params, .. } => {
                if params.period == 0 {
                    return Err(Error::invalid_argument("periodic period", "0"));
                }
                if !magnitude_domain.contains(&params.magnitude) {
                    return Err(Error::invalid_argument(
                        "periodic magnitude",
                        params.magnitude.to_string(),
                    ));
                }
                if !magnitude_domain.contains(&params.offset) {
                    return Err(Error::invalid_argument(
                        "periodic offset",
                        params.offset.to_string(),
                    ));
                }
            }
            EffectKind::Custom(params) => {
                if params.sample_period == 0 {
                    return Err(Error::invalid_argument("custom sample period", "0"));
                }
                if params.samples.is_empty() {
                    return Err(Error::invalid_argument("custom samples", "empty"));
                }
                if let Some(sample) = params
                    .samples
                    .iter()
                    .find(|sample| !magnitude_domain.contains(*sample))
                {
                    return Err(Error::invalid_argument(
                        "custom sample",
                        sample.to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A force effect: immutable identity plus mutable parameters.
///
/// The force feedback device clones effects on insert, so an application's
/// copy and the device's copy evolve independently until the next
/// add-or-update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    id: EffectId,
    kind: EffectKind,
    axes: Vec<VirtualAxis>,
    direction: DirectionVector,
    duration: Option<EffectTimeMs>,
    start_delay: EffectTimeMs,
    sample_period: EffectTimeMs,
    gain: EffectValue,
    envelope: Option<Envelope>,
}

impl Effect {
    /// Creates an effect of the given family over the given axes.
    ///
    /// The direction must carry one component per declared axis. Duration
    /// defaults to infinite, start delay to zero, gain to maximum.
    pub fn new(
        kind: EffectKind,
        axes: Vec<VirtualAxis>,
        direction: DirectionVector,
    ) -> Result<Self> {
        kind.validate()?;
        if axes.len() < EFFECT_AXES_MIN || axes.len() > EFFECT_AXES_MAX {
            return Err(Error::invalid_argument(
                "effect axes",
                format!("expected 1..=4 axes, got {}", axes.len()),
            ));
        }
        if direction.component_count() != axes.len() {
            return Err(Error::invalid_argument(
                "effect direction",
                format!(
                    "{} components for {} axes",
                    direction.component_count(),
                    axes.len()
                ),
            ));
        }
        Ok(Effect {
            id: EffectId::next(),
            kind,
            axes,
            direction,
            duration: None,
            start_delay: 0,
            sample_period: 0,
            gain: EFFECT_MODIFIER_MAX,
            envelope: None,
        })
    }

    /// Identity of this effect.
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Type-specific parameters.
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Declared axes.
    pub fn axes(&self) -> &[VirtualAxis] {
        &self.axes
    }

    /// Direction over the declared axes.
    pub fn direction(&self) -> &DirectionVector {
        &self.direction
    }

    /// Duration in milliseconds, `None` meaning infinite.
    pub fn duration(&self) -> Option<EffectTimeMs> {
        self.duration
    }

    /// Delay before the effect produces output, in milliseconds.
    pub fn start_delay(&self) -> EffectTimeMs {
        self.start_delay
    }

    /// Requested sampling interval, in milliseconds; zero means the device
    /// default.
    pub fn sample_period(&self) -> EffectTimeMs {
        self.sample_period
    }

    /// Gain modifier in `0..=10000`.
    pub fn gain(&self) -> EffectValue {
        self.gain
    }

    /// Envelope, if one is set.
    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// Replaces the type-specific parameters. The family may not change.
    pub fn set_kind(&mut self, kind: EffectKind) -> Result<()> {
        kind.validate()?;
        if std::mem::discriminant(&kind) != std::mem::discriminant(&self.kind) {
            return Err(Error::invalid_argument(
                "effect kind",
                "an effect cannot change its family",
            ));
        }
        self.kind = kind;
        Ok(())
    }

    /// Sets the duration; `None` means infinite. The envelope, if set, is
    /// re-validated against the new duration.
    pub fn set_duration(&mut self, duration: Option<EffectTimeMs>) -> Result<()> {
        if let Some(envelope) = &self.envelope {
            envelope.validate(duration)?;
        }
        self.duration = duration;
        Ok(())
    }

    /// Sets the start delay.
    pub fn set_start_delay(&mut self, start_delay: EffectTimeMs) {
        self.start_delay = start_delay;
    }

    /// Sets the requested sampling interval; zero selects the device
    /// default.
    pub fn set_sample_period(&mut self, sample_period: EffectTimeMs) {
        self.sample_period = sample_period;
    }

    /// Sets the gain modifier.
    pub fn set_gain(&mut self, gain: EffectValue) -> Result<()> {
        if !(EFFECT_MODIFIER_MIN..=EFFECT_MODIFIER_MAX).contains(&gain) {
            return Err(Error::invalid_argument("effect gain", gain.to_string()));
        }
        self.gain = gain;
        Ok(())
    }

    /// Sets or clears the envelope, validating against the current
    /// duration.
    pub fn set_envelope(&mut self, envelope: Option<Envelope>) -> Result<()> {
        if let Some(envelope) = &envelope {
            envelope.validate(self.duration)?;
        }
        self.envelope = envelope;
        Ok(())
    }

    /// Replaces the direction. Component count must still match the
    /// declared axes.
    pub fn set_direction(&mut self, direction: DirectionVector) -> Result<()> {
        if direction.component_count() != self.axes.len() {
            return Err(Error::invalid_argument(
                "effect direction",
                format!(
                    "{} components for {} axes",
                    direction.component_count(),
                    self.axes.len()
                ),
            ));
        }
        self.direction = direction;
        Ok(())
    }

    /// Length of one playback iteration including the start delay, `None`
    /// for effects that never complete.
    pub fn total_time(&self) -> Option<EffectTimeMs> {
        self.duration
            .map(|duration| duration.saturating_add(self.start_delay))
    }

    /// Output magnitude at `raw_time` milliseconds after the effect
    /// started. Zero during the start delay and after a finite duration
    /// has elapsed; always within the magnitude domain.
    pub fn magnitude_at(&self, raw_time: EffectTimeMs) -> EffectValue {
        if raw_time < self.start_delay {
            return 0.0;
        }
        let t = raw_time - self.start_delay;
        if let Some(duration) = self.duration {
            if t >= duration {
                return 0.0;
            }
        }

        let nominal = self.nominal_at(t);
        let leveled = match &self.envelope {
            Some(envelope) => envelope.apply(t, self.duration, nominal),
            None => nominal,
        };
        (leveled * self.gain / EFFECT_MODIFIER_MAX)
            .clamp(EFFECT_MAGNITUDE_MIN, EFFECT_MAGNITUDE_MAX)
    }

    /// Distributes a scalar magnitude over the declared axes according to
    /// the direction vector.
    pub fn ordered_magnitude_components(
        &self,
        magnitude: EffectValue,
    ) -> OrderedMagnitudeComponents {
        let mut components = ZERO_MAGNITUDE_COMPONENTS;
        for (axis, unit) in self.axes.iter().zip(self.direction.unit_components()) {
            components[axis.index()] += magnitude * unit;
        }
        components
    }

    fn nominal_at(&self, t: EffectTimeMs) -> EffectValue {
        match &self.kind {
            EffectKind::Constant { magnitude } => *magnitude,
            EffectKind::Ramp {
                start_magnitude,
                end_magnitude,
            } => match self.duration {
                Some(duration) if duration > 0 => {
                    let progress = t as EffectValue / duration as EffectValue;
                    start_magnitude + (end_magnitude - start_magnitude) * progress
                }
                // A ramp with no end never leaves its starting magnitude.
                _ => *start_magnitude,
            },
            EffectKind::Periodic { waveform, params } => {
                let phase_ms = (t.wrapping_add(params.phase_offset)) % params.period;
                let x = phase_ms as EffectValue / params.period as EffectValue;
                waveform.evaluate(x) * params.magnitude + params.offset
            }
            EffectKind::Custom(params) => {
                let index = (t / params.sample_period) as usize % params.samples.len();
                params.samples[index]
            }
        }
    }
}
