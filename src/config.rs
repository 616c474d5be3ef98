//! Per-game configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Heist tuning: entry stake, crew bounds, recruitment window, and the
/// resolution probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeistConfig {
    /// Stake debited from every crew member at join time.
    pub entry_fee: i64,

    /// Fewer joiners than this at the deadline cancels the heist.
    pub min_crew: usize,

    /// Hard cap on crew size.
    pub max_crew: usize,

    /// How long recruitment stays open.
    pub window: Duration,

    /// Success chance floor before crew and luck scaling.
    pub base_chance: f64,

    /// Added success chance per crew member.
    pub per_member_bonus: f64,

    /// Success chance ceiling after all scaling.
    pub max_chance: f64,

    /// Loot drawn as a uniform fraction of the target's bank in this range.
    pub loot_fraction_min: f64,
    pub loot_fraction_max: f64,

    /// Per-member chance of walking away with their share on success.
    pub survival_chance: f64,
}

impl Default for HeistConfig {
    fn default() -> Self {
        Self {
            entry_fee: 2_000,
            min_crew: 2,
            max_crew: 5,
            window: Duration::from_secs(60),
            base_chance: 0.3,
            per_member_bonus: 0.1,
            max_chance: 0.9,
            loot_fraction_min: 0.25,
            loot_fraction_max: 0.75,
            survival_chance: 0.9,
        }
    }
}

impl HeistConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.entry_fee <= 0 {
            return Err("Entry fee must be positive".to_string());
        }
        if self.min_crew < 1 || self.max_crew < self.min_crew {
            return Err("Crew bounds must satisfy 1 <= min <= max".to_string());
        }
        if !(0.0..=1.0).contains(&self.max_chance) || !(0.0..=1.0).contains(&self.survival_chance) {
            return Err("Probabilities must be within [0, 1]".to_string());
        }
        if self.loot_fraction_min < 0.0
            || self.loot_fraction_max > 1.0
            || self.loot_fraction_max < self.loot_fraction_min
        {
            return Err("Loot fraction range must be within [0, 1] and ordered".to_string());
        }
        Ok(())
    }
}

/// Blackjack tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackConfig {
    /// Smallest stake the table accepts.
    pub min_bet: i64,
}

impl Default for BlackjackConfig {
    fn default() -> Self {
        Self { min_bet: 1_000 }
    }
}

impl BlackjackConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_bet <= 0 {
            return Err("Minimum bet must be positive".to_string());
        }
        Ok(())
    }
}

/// Roulette payout multipliers, applied to the per-option slice of the stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteConfig {
    pub color_multiplier: i64,
    pub green_multiplier: i64,
    pub straight_multiplier: i64,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            color_multiplier: 2,
            green_multiplier: 14,
            straight_multiplier: 35,
        }
    }
}

/// Steal tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StealConfig {
    /// Base chance of being caught, divided by the thief's luck.
    pub caught_chance: f64,

    /// Fine range when caught, debited clamped-at-zero.
    pub fine_min: i64,
    pub fine_max: i64,

    /// Fraction of the target's pocket taken on success.
    pub take_fraction_min: f64,
    pub take_fraction_max: f64,
}

impl Default for StealConfig {
    fn default() -> Self {
        Self {
            caught_chance: 0.2,
            fine_min: 100,
            fine_max: 10_000,
            take_fraction_min: 0.03,
            take_fraction_max: 1.0,
        }
    }
}

impl StealConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.caught_chance) {
            return Err("Caught chance must be within [0, 1]".to_string());
        }
        if self.fine_min <= 0 || self.fine_max < self.fine_min {
            return Err("Fine range must be positive and ordered".to_string());
        }
        if self.take_fraction_min < 0.0
            || self.take_fraction_max > 1.0
            || self.take_fraction_max < self.take_fraction_min
        {
            return Err("Take fraction range must be within [0, 1] and ordered".to_string());
        }
        Ok(())
    }
}

/// Daily reward tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyConfig {
    /// Base reward range, drawn uniformly.
    pub base_min: i64,
    pub base_max: i64,

    /// Bonus added per consecutive day of the streak.
    pub streak_step: i64,

    /// Ceiling on the streak bonus.
    pub streak_bonus_cap: i64,

    /// Time between claims.
    pub cooldown: chrono::Duration,

    /// Claims spaced further apart than this reset the streak to day one.
    pub streak_break: chrono::Duration,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            base_min: 1_000,
            base_max: 3_000,
            streak_step: 100,
            streak_bonus_cap: 1_000,
            cooldown: chrono::Duration::hours(24),
            streak_break: chrono::Duration::hours(48),
        }
    }
}

impl DailyConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_min <= 0 || self.base_max < self.base_min {
            return Err("Base reward range must be positive and ordered".to_string());
        }
        if self.streak_step < 0 || self.streak_bonus_cap < 0 {
            return Err("Streak bonus values must be non-negative".to_string());
        }
        if self.streak_break < self.cooldown {
            return Err("Streak break must be at least the cooldown".to_string());
        }
        Ok(())
    }
}

/// Shop pricing and item effects.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopConfig {
    pub bank_note_price: i64,
    pub luck_boost_price: i64,
    pub theft_shield_price: i64,

    /// Bank limit increase per bank note.
    pub bank_note_limit_increase: i64,

    /// Luck is multiplied by this per boost.
    pub luck_boost_multiplier: f64,

    /// How long a theft shield holds.
    pub shield_duration: chrono::Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            bank_note_price: 10_000,
            luck_boost_price: 25_000,
            theft_shield_price: 100_000,
            bank_note_limit_increase: 5_000,
            luck_boost_multiplier: 1.2,
            shield_duration: chrono::Duration::hours(24),
        }
    }
}

impl ShopConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bank_note_price <= 0 || self.luck_boost_price <= 0 || self.theft_shield_price <= 0
        {
            return Err("Item prices must be positive".to_string());
        }
        if self.bank_note_limit_increase <= 0 {
            return Err("Bank note limit increase must be positive".to_string());
        }
        if self.luck_boost_multiplier <= 1.0 {
            return Err("Luck boost multiplier must exceed 1.0".to_string());
        }
        Ok(())
    }
}

/// Duel tuning. No ledger balance is at stake in duels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelConfig {
    pub max_health: i32,
    pub slash_damage: i32,
    pub thrust_damage: i32,
    /// Damage rolls land within `base ± spread`.
    pub damage_spread: i32,
    pub block_min: i32,
    pub block_max: i32,
    /// Fighters who don't act within this window forfeit the round.
    pub action_timeout: Duration,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            slash_damage: 20,
            thrust_damage: 25,
            damage_spread: 5,
            block_min: 10,
            block_max: 20,
            action_timeout: Duration::from_secs(30),
        }
    }
}

/// Shootout (Russian roulette) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootoutConfig {
    /// Chambers in the cylinder; one holds the shell.
    pub chambers: u32,

    /// Chance the barrel swings toward the opponent on a hit.
    pub swing_chance: f64,
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self {
            chambers: 8,
            swing_chance: 0.49,
        }
    }
}
