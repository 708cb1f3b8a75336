//! Effect envelopes: piecewise-linear attenuation applied over an effect's
//! lifetime.

use serde::{Deserialize, Serialize};

use padbridge_schemas::error::{Error, Result};
use padbridge_schemas::forces::{EffectTimeMs, EffectValue};

use crate::constants::{EFFECT_MODIFIER_MAX, EFFECT_MODIFIER_MIN};

/// Attack/sustain/fade shaping of an effect's output level.
///
/// The envelope operates on the absolute sustain level and reapplies the
/// sign afterwards, so a negative nominal magnitude fades the same way a
/// positive one does. With no envelope set, an effect plays at its nominal
/// level for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Level the attack ramp starts from.
    pub attack_level: EffectValue,
    /// Length of the attack ramp, in milliseconds.
    pub attack_time: EffectTimeMs,
    /// Level the fade ramp ends at.
    pub fade_level: EffectValue,
    /// Length of the fade ramp, in milliseconds. The ramp ends exactly at
    /// the effect's duration.
    pub fade_time: EffectTimeMs,
}

impl Envelope {
    /// Checks levels against the modifier domain and times against a
    /// duration, when the duration is finite.
    pub fn validate(&self, duration: Option<EffectTimeMs>) -> Result<()> {
        for (name, level) in [
            ("attack level", self.attack_level),
            ("fade level", self.fade_level),
        ] {
            if !(EFFECT_MODIFIER_MIN..=EFFECT_MODIFIER_MAX).contains(&level) {
                return Err(Error::invalid_argument(name, level.to_string()));
            }
        }
        if let Some(duration) = duration {
            if self.attack_time > duration {
                return Err(Error::invalid_argument(
                    "attack time",
                    format!("{} exceeds duration {duration}", self.attack_time),
                ));
            }
            if self.fade_time > duration {
                return Err(Error::invalid_argument(
                    "fade time",
                    format!("{} exceeds duration {duration}", self.fade_time),
                ));
            }
        }
        Ok(())
    }

    /// Applies the envelope at local time `t` to a sustain level.
    pub fn apply(
        &self,
        t: EffectTimeMs,
        duration: Option<EffectTimeMs>,
        sustain: EffectValue,
    ) -> EffectValue {
        let sustain_abs = sustain.abs();

        let level = if t < self.attack_time {
            let progress = t as EffectValue / self.attack_time as EffectValue;
            self.attack_level + (sustain_abs - self.attack_level) * progress
        } else if let Some(duration) = duration.filter(|d| {
            self.fade_time > 0 && t >= d.saturating_sub(self.fade_time)
        }) {
            let remaining = duration.saturating_sub(t) as EffectValue;
            self.fade_level + (sustain_abs - self.fade_level) * remaining / self.fade_time as EffectValue
        } else {
            sustain_abs
        };

        if sustain < 0.0 {
            -level
        } else {
            level
        }
    }
}
