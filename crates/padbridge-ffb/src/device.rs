//! In-process emulation of a physical force feedback buffer.
//!
//! The device holds up to [`EFFECT_MAX_COUNT`] effects split across two
//! disjoint sets, *ready* and *playing*, and composes the playing set into
//! a per-axis magnitude vector on every sample. Mute and pause are
//! orthogonal global states: muting silences output while clocks advance,
//! pausing freezes the clock while output continues to reflect the frozen
//! instant.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use tracing::debug;

use padbridge_schemas::error::{Error, Result};
use padbridge_schemas::forces::{
    EffectTimeMs, OrderedMagnitudeComponents, ZERO_MAGNITUDE_COMPONENTS,
};

use crate::constants::{EFFECT_MAGNITUDE_MAX, EFFECT_MAGNITUDE_MIN, EFFECT_MAX_COUNT};
use crate::effect::{Effect, EffectId};

/// One stored effect with its playback bookkeeping.
#[derive(Debug, Clone)]
struct EffectSlot {
    effect: Effect,
    /// Relative timestamp at which the current iteration started.
    start_time: EffectTimeMs,
    /// Iterations remaining, including the one in progress.
    iterations_left: u32,
}

#[derive(Debug, Default)]
struct DeviceState {
    ready: BTreeMap<EffectId, EffectSlot>,
    playing: BTreeMap<EffectId, EffectSlot>,
    muted: bool,
    paused: bool,
    /// Relative timestamp of the last playback that advanced time.
    last_play: EffectTimeMs,
}

impl DeviceState {
    fn stored_count(&self) -> usize {
        self.ready.len() + self.playing.len()
    }
}

/// Emulated force feedback system of one physical controller.
///
/// Concurrency-safe behind a reader-writer lock: predicates take the shared
/// side, every state transition (including playback, which advances clocks)
/// takes the exclusive side. Work under the lock is bounded by the number
/// of playing effects and never touches I/O.
#[derive(Debug)]
pub struct ForceFeedbackDevice {
    created: Instant,
    state: RwLock<DeviceState>,
    /// Exclusive registration slot; zero means unowned.
    exclusive_owner: AtomicU32,
}

impl Default for ForceFeedbackDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceFeedbackDevice {
    /// New device with an empty buffer; the construction instant becomes
    /// the zero point of the device's relative clock.
    pub fn new() -> Self {
        ForceFeedbackDevice {
            created: Instant::now(),
            state: RwLock::new(DeviceState::default()),
            exclusive_owner: AtomicU32::new(0),
        }
    }

    /// Milliseconds elapsed since device construction.
    pub fn now_relative(&self) -> EffectTimeMs {
        self.created.elapsed().as_millis() as EffectTimeMs
    }

    /// Inserts an effect into the buffer, or updates its parameters if the
    /// identifier is already present.
    ///
    /// Updating a playing effect replaces parameters in place without
    /// resetting its start timestamp or iteration counter, so playback
    /// phase is preserved.
    pub fn add_or_update_effect(&self, effect: &Effect) -> Result<()> {
        let mut state = self.state.write();
        let id = effect.id();

        if let Some(slot) = state.playing.get_mut(&id) {
            slot.effect = effect.clone();
            return Ok(());
        }
        if let Some(slot) = state.ready.get_mut(&id) {
            slot.effect = effect.clone();
            return Ok(());
        }
        if state.stored_count() >= EFFECT_MAX_COUNT {
            return Err(Error::capacity_exceeded("effect buffer", EFFECT_MAX_COUNT));
        }
        state.ready.insert(
            id,
            EffectSlot {
                effect: effect.clone(),
                start_time: 0,
                iterations_left: 0,
            },
        );
        Ok(())
    }

    /// Starts playing an effect, restarting from the beginning if it is
    /// already playing.
    ///
    /// `timestamp` overrides the relative start time and exists for
    /// testing; omitted, the current relative time is used.
    pub fn start_effect(
        &self,
        id: EffectId,
        num_iterations: u32,
        timestamp: Option<EffectTimeMs>,
    ) -> Result<()> {
        if num_iterations == 0 {
            return Err(Error::invalid_argument("effect iterations", "0"));
        }
        let start_time = timestamp.unwrap_or_else(|| self.now_relative());
        let mut state = self.state.write();

        if let Some(slot) = state.playing.get_mut(&id) {
            slot.start_time = start_time;
            slot.iterations_left = num_iterations;
            return Ok(());
        }
        let Some(mut slot) = state.ready.remove(&id) else {
            return Err(Error::not_found(format!("effect {}", id.value())));
        };
        slot.start_time = start_time;
        slot.iterations_left = num_iterations;
        state.playing.insert(id, slot);
        Ok(())
    }

    /// Stops a playing effect, returning it to the ready set. Fails if the
    /// effect is not currently playing.
    pub fn stop_effect(&self, id: EffectId) -> Result<()> {
        let mut state = self.state.write();
        let Some(slot) = state.playing.remove(&id) else {
            return Err(Error::not_found(format!("playing effect {}", id.value())));
        };
        state.ready.insert(id, slot);
        Ok(())
    }

    /// Stops every playing effect.
    pub fn stop_all_effects(&self) {
        let mut state = self.state.write();
        while let Some((id, slot)) = state.playing.pop_first() {
            state.ready.insert(id, slot);
        }
    }

    /// Removes an effect from the buffer, stopping it first if needed.
    pub fn remove_effect(&self, id: EffectId) -> Result<()> {
        let mut state = self.state.write();
        if state.playing.remove(&id).is_some() || state.ready.remove(&id).is_some() {
            Ok(())
        } else {
            Err(Error::not_found(format!("effect {}", id.value())))
        }
    }

    /// Empties the buffer and resets the muted and paused states.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.ready.clear();
        state.playing.clear();
        state.muted = false;
        state.paused = false;
    }

    /// Sets the muted state. Muted effects keep playing, and their clocks
    /// keep advancing, but the output vector is zero.
    pub fn set_muted_state(&self, muted: bool) {
        self.state.write().muted = muted;
    }

    /// Current muted state.
    pub fn muted_state(&self) -> bool {
        self.state.read().muted
    }

    /// Sets the paused state. While paused the playback clock does not
    /// advance; sampling reflects the frozen instant.
    pub fn set_pause_state(&self, paused: bool) {
        self.state.write().paused = paused;
    }

    /// Current paused state.
    pub fn pause_state(&self) -> bool {
        self.state.read().paused
    }

    /// Whether the identified effect is loaded, playing or not.
    pub fn is_effect_on_device(&self, id: EffectId) -> bool {
        let state = self.state.read();
        state.ready.contains_key(&id) || state.playing.contains_key(&id)
    }

    /// Whether the identified effect is currently playing.
    pub fn is_effect_playing(&self, id: EffectId) -> bool {
        self.state.read().playing.contains_key(&id)
    }

    /// Identifiers of every loaded effect, ready and playing.
    pub fn effect_ids(&self) -> Vec<EffectId> {
        let state = self.state.read();
        state.ready.keys().chain(state.playing.keys()).copied().collect()
    }

    /// Number of loaded effects.
    pub fn effect_count(&self) -> usize {
        self.state.read().stored_count()
    }

    /// Composes the magnitude components of every playing effect at the
    /// given time, automatically retiring effects that complete.
    ///
    /// `timestamp` overrides the sampling time and exists for testing. A
    /// timestamp earlier than the last playback is used for computation but
    /// never moves the playback clock backwards; while paused, the supplied
    /// timestamp is ignored entirely in favour of the frozen clock.
    pub fn play_effects(&self, timestamp: Option<EffectTimeMs>) -> OrderedMagnitudeComponents {
        let mut state = self.state.write();

        let now = timestamp.unwrap_or_else(|| self.now_relative());
        let t = if state.paused {
            state.last_play
        } else {
            if now > state.last_play {
                state.last_play = now;
            }
            now
        };

        let mut output = ZERO_MAGNITUDE_COMPONENTS;
        let mut completed = Vec::new();

        for (id, slot) in state.playing.iter_mut() {
            if let Some(total) = slot.effect.total_time() {
                let mut complete = total == 0;
                while !complete && t.saturating_sub(slot.start_time) >= total {
                    if slot.iterations_left <= 1 {
                        complete = true;
                    } else {
                        slot.iterations_left -= 1;
                        slot.start_time = slot.start_time.saturating_add(total);
                    }
                }
                if complete {
                    completed.push(*id);
                    continue;
                }
            }

            let local = t.saturating_sub(slot.start_time);
            let magnitude = slot.effect.magnitude_at(local);
            let components = slot.effect.ordered_magnitude_components(magnitude);
            for (sum, component) in output.iter_mut().zip(components) {
                *sum += component;
            }
        }

        for id in completed {
            if let Some(slot) = state.playing.remove(&id) {
                debug!(effect = id.value(), "effect completed, returning to ready set");
                state.ready.insert(id, slot);
            }
        }

        if state.muted {
            return ZERO_MAGNITUDE_COMPONENTS;
        }
        for component in output.iter_mut() {
            *component = component.clamp(EFFECT_MAGNITUDE_MIN, EFFECT_MAGNITUDE_MAX);
        }
        output
    }

    /// Attempts to register `owner` (nonzero) as the exclusive user of this
    /// device. Succeeds if unowned or already owned by the same owner.
    pub fn try_register_exclusive(&self, owner: u32) -> Result<()> {
        if owner == 0 {
            return Err(Error::invalid_argument("exclusive owner", "0"));
        }
        match self.exclusive_owner.compare_exchange(
            0,
            owner,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Ok(()),
            Err(current) if current == owner => Ok(()),
            Err(_) => Err(Error::NotExclusiveRegistered),
        }
    }

    /// Releases an exclusive registration held by `owner`. Succeeds only if
    /// `owner` is the current registrant.
    pub fn unregister_exclusive(&self, owner: u32) -> Result<()> {
        match self
            .exclusive_owner
            .compare_exchange(owner, 0, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(()),
            Err(_) => Err(Error::NotExclusiveRegistered),
        }
    }

    /// Current exclusive registrant, if any.
    pub fn exclusive_owner(&self) -> Option<u32> {
        match self.exclusive_owner.load(Ordering::Acquire) {
            0 => None,
            owner => Some(owner),
        }
    }

    /// Whether `owner` holds the exclusive registration.
    pub fn is_registered_to(&self, owner: u32) -> bool {
        owner != 0 && self.exclusive_owner.load(Ordering::Acquire) == owner
    }
}
