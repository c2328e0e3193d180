//! Ability slots with duration and cooldown timers
//!
//! Each player carries three slots. Timers count down one per tick toward
//! zero; a slot can fire again once its cooldown has drained.

use serde::{Deserialize, Serialize};

/// Which of the three slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKey {
    Q,
    W,
    E,
}

impl AbilityKey {
    pub const ALL: [AbilityKey; 3] = [AbilityKey::Q, AbilityKey::W, AbilityKey::E];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    /// Ticks of active effect remaining
    pub duration: u32,
    /// Ticks until usable again
    pub cooldown: u32,
    /// Upgrade level
    pub level: u32,
    pub max_dur: u32,
    pub max_cool: u32,
}

impl AbilitySlot {
    pub const fn new(max_dur: u32, max_cool: u32) -> Self {
        Self {
            duration: 0,
            cooldown: 0,
            level: 0,
            max_dur,
            max_cool,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    /// Arm the slot: both timers jump to their maxima
    pub fn trigger(&mut self) {
        self.duration = self.max_dur;
        self.cooldown = self.max_cool;
    }

    pub fn tick(&mut self) {
        self.duration = self.duration.saturating_sub(1);
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.duration = 0;
        self.cooldown = 0;
    }

    /// Cooldown bar fraction in [0, 1]
    pub fn cooldown_fraction(&self) -> f32 {
        if self.max_cool == 0 {
            return 0.0;
        }
        (self.cooldown as f32 / self.max_cool as f32).clamp(0.0, 1.0)
    }

    pub fn level_up(&mut self) {
        self.level += 1;
    }
}

/// The Q/W/E slot set of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub q: AbilitySlot,
    pub w: AbilitySlot,
    /// Mirrors W's maxima; no class binds an effect to it
    pub e: AbilitySlot,
}

impl Abilities {
    pub fn new(q_dur: u32, q_cool: u32, w_dur: u32, w_cool: u32) -> Self {
        Self {
            q: AbilitySlot::new(q_dur, q_cool),
            w: AbilitySlot::new(w_dur, w_cool),
            e: AbilitySlot::new(w_dur, w_cool),
        }
    }

    pub fn slot(&self, key: AbilityKey) -> &AbilitySlot {
        match key {
            AbilityKey::Q => &self.q,
            AbilityKey::W => &self.w,
            AbilityKey::E => &self.e,
        }
    }

    pub fn slot_mut(&mut self, key: AbilityKey) -> &mut AbilitySlot {
        match key {
            AbilityKey::Q => &mut self.q,
            AbilityKey::W => &mut self.w,
            AbilityKey::E => &mut self.e,
        }
    }

    /// Decrement every timer by one tick
    pub fn tick_all(&mut self) {
        self.q.tick();
        self.w.tick();
        self.e.tick();
    }

    /// Zero every timer (levels are kept)
    pub fn reset_all(&mut self) {
        self.q.reset();
        self.w.reset();
        self.e.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_then_tick() {
        let mut slot = AbilitySlot::new(300, 350);
        assert!(slot.is_ready());
        slot.trigger();
        assert_eq!((slot.duration, slot.cooldown), (300, 350));
        assert!(!slot.is_ready());
        assert!(slot.is_active());
        slot.tick();
        assert_eq!((slot.duration, slot.cooldown), (299, 349));
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut slot = AbilitySlot::new(0, 5);
        slot.trigger();
        for _ in 0..10 {
            slot.tick();
        }
        assert_eq!((slot.duration, slot.cooldown), (0, 0));
        assert!(slot.is_ready());
    }

    #[test]
    fn test_reset_keeps_levels() {
        let mut abilities = Abilities::new(300, 350, 24, 350);
        abilities.q.level_up();
        abilities.q.trigger();
        abilities.w.trigger();
        abilities.reset_all();
        for key in AbilityKey::ALL {
            assert_eq!(abilities.slot(key).duration, 0);
            assert_eq!(abilities.slot(key).cooldown, 0);
        }
        assert_eq!(abilities.q.level, 1);
    }

    #[test]
    fn test_e_mirrors_w() {
        let abilities = Abilities::new(0, 30, 200, 650);
        assert_eq!(abilities.e.max_dur, 200);
        assert_eq!(abilities.e.max_cool, 650);
    }

    #[test]
    fn test_cooldown_fraction() {
        let mut slot = AbilitySlot::new(0, 0);
        slot.trigger();
        assert_eq!(slot.cooldown_fraction(), 0.0);

        let mut slot = AbilitySlot::new(0, 300);
        slot.trigger();
        assert_eq!(slot.cooldown_fraction(), 1.0);
        for _ in 0..150 {
            slot.tick();
        }
        assert_eq!(slot.cooldown_fraction(), 0.5);
    }
}
