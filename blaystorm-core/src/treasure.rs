//! Treasure chest drops: the bonus-loot roll, rarity table, and container.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

use crate::config::CascadeConfigError;
use crate::constants::{
    COIN_BASE_BY_RARITY, COIN_JITTER_BY_RARITY, DEFAULT_DROP_CHANCE, DEFAULT_RARITY_WEIGHTS,
    GEM_BASE_BY_RARITY, LEGENDARY_ITEMS, MYTHIC_ITEMS,
};
use crate::numbers::{clamp_unit, floor_f64_to_i64, i64_to_f64};
use crate::rng::{RandomSource, RandomSourceError};

/// Rarity tier, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Mythic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Mythic => "mythic",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Epic => 2,
            Self::Legendary => 3,
            Self::Mythic => 4,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single reward entry inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reward {
    Coins { amount: i64 },
    Gems { amount: i64 },
    Item { name: String },
}

/// Inline storage for the handful of rewards a chest carries.
pub type RewardList = SmallVec<[Reward; 4]>;

/// A dropped treasure chest. Contents are fixed at generation time and may
/// be opened exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardContainer {
    rarity: Rarity,
    rewards: RewardList,
    #[serde(default)]
    opened: bool,
}

/// Invalid container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreasureError {
    #[error("container already opened")]
    AlreadyOpened,
}

impl RewardContainer {
    #[must_use]
    pub const fn rarity(&self) -> Rarity {
        self.rarity
    }

    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    #[must_use]
    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    /// Finalize the grant. Exactly-once: a second open is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TreasureError::AlreadyOpened`] on repeat opens.
    pub fn open(&mut self) -> Result<&[Reward], TreasureError> {
        if self.opened {
            return Err(TreasureError::AlreadyOpened);
        }
        self.opened = true;
        Ok(&self.rewards)
    }
}

/// Rarity weight table; weights must decrease as rarity climbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityWeights {
    #[serde(default = "RarityWeights::default_common")]
    pub common: u32,
    #[serde(default = "RarityWeights::default_rare")]
    pub rare: u32,
    #[serde(default = "RarityWeights::default_epic")]
    pub epic: u32,
    #[serde(default = "RarityWeights::default_legendary")]
    pub legendary: u32,
    #[serde(default = "RarityWeights::default_mythic")]
    pub mythic: u32,
}

impl RarityWeights {
    const fn default_common() -> u32 {
        DEFAULT_RARITY_WEIGHTS[0]
    }

    const fn default_rare() -> u32 {
        DEFAULT_RARITY_WEIGHTS[1]
    }

    const fn default_epic() -> u32 {
        DEFAULT_RARITY_WEIGHTS[2]
    }

    const fn default_legendary() -> u32 {
        DEFAULT_RARITY_WEIGHTS[3]
    }

    const fn default_mythic() -> u32 {
        DEFAULT_RARITY_WEIGHTS[4]
    }

    #[must_use]
    pub const fn as_array(&self) -> [u32; 5] {
        [
            self.common,
            self.rare,
            self.epic,
            self.legendary,
            self.mythic,
        ]
    }

    pub(crate) fn validate(&self) -> Result<(), CascadeConfigError> {
        let weights = self.as_array();
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return Err(CascadeConfigError::EmptyRarityTable);
        }
        for window in weights.windows(2) {
            if window[1] > window[0] {
                return Err(CascadeConfigError::RarityWeightsNotDecreasing);
            }
        }
        Ok(())
    }
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: Self::default_common(),
            rare: Self::default_rare(),
            epic: Self::default_epic(),
            legendary: Self::default_legendary(),
            mythic: Self::default_mythic(),
        }
    }
}

/// Drop-roll configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureCfg {
    #[serde(default = "TreasureCfg::default_drop_chance")]
    pub drop_chance: f64,
    #[serde(default)]
    pub weights: RarityWeights,
}

impl TreasureCfg {
    const fn default_drop_chance() -> f64 {
        DEFAULT_DROP_CHANCE
    }

    pub(crate) fn validate(&self) -> Result<(), CascadeConfigError> {
        if !(0.0..=1.0).contains(&self.drop_chance) || !self.drop_chance.is_finite() {
            return Err(CascadeConfigError::RangeViolation {
                field: "treasure.drop_chance",
                min: 0.0,
                max: 1.0,
                value: self.drop_chance,
            });
        }
        self.weights.validate()
    }

    pub(crate) fn sanitize(&mut self) {
        if !self.drop_chance.is_finite() {
            self.drop_chance = Self::default_drop_chance();
        }
        self.drop_chance = self.drop_chance.clamp(0.0, 1.0);
        if self.weights.validate().is_err() {
            self.weights = RarityWeights::default();
        }
    }
}

impl Default for TreasureCfg {
    fn default() -> Self {
        Self {
            drop_chance: Self::default_drop_chance(),
            weights: RarityWeights::default(),
        }
    }
}

/// Roll for a bonus chest after one correct answer.
///
/// A single uniform draw decides the drop; rarity and contents consume the
/// loot stream only when the roll succeeds. The caller is expected to
/// degrade a failed source to "no drop" rather than failing its own
/// invocation.
///
/// # Errors
///
/// Returns [`RandomSourceError`] when the injected source cannot produce a
/// draw.
pub fn roll_drop(
    cfg: &TreasureCfg,
    drop_rng: &mut dyn RandomSource,
    loot_rng: &mut dyn RandomSource,
) -> Result<Option<RewardContainer>, RandomSourceError> {
    let roll = drop_rng.next_unit()?;
    if clamp_unit(roll) >= cfg.drop_chance {
        return Ok(None);
    }
    let rarity = pick_rarity(&cfg.weights, loot_rng.next_unit()?);
    let rewards = generate_rewards(rarity, loot_rng)?;
    Ok(Some(RewardContainer {
        rarity,
        rewards,
        opened: false,
    }))
}

/// Map a unit draw onto the cumulative rarity table.
fn pick_rarity(weights: &RarityWeights, unit: f64) -> Rarity {
    let table = weights.as_array();
    let total: u64 = table.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return Rarity::Common;
    }
    let scaled = clamp_unit(unit) * i64_to_f64(total as i64);
    let mut cumulative = 0.0;
    for rarity in Rarity::ALL {
        cumulative += i64_to_f64(i64::from(table[rarity.index()]));
        if scaled < cumulative {
            return rarity;
        }
    }
    Rarity::Mythic
}

fn generate_rewards(
    rarity: Rarity,
    loot_rng: &mut dyn RandomSource,
) -> Result<RewardList, RandomSourceError> {
    let tier = rarity.index();
    let mut rewards = RewardList::new();

    let jitter = floor_f64_to_i64(
        clamp_unit(loot_rng.next_unit()?) * i64_to_f64(COIN_JITTER_BY_RARITY[tier] + 1),
    );
    rewards.push(Reward::Coins {
        amount: COIN_BASE_BY_RARITY[tier] + jitter,
    });

    if GEM_BASE_BY_RARITY[tier] > 0 {
        let bonus = floor_f64_to_i64(
            clamp_unit(loot_rng.next_unit()?) * i64_to_f64(GEM_BASE_BY_RARITY[tier]),
        );
        rewards.push(Reward::Gems {
            amount: GEM_BASE_BY_RARITY[tier] + bonus,
        });
    }

    let pool: &[&str] = match rarity {
        Rarity::Legendary => LEGENDARY_ITEMS,
        Rarity::Mythic => MYTHIC_ITEMS,
        _ => &[],
    };
    if !pool.is_empty() {
        let idx =
            floor_f64_to_i64(clamp_unit(loot_rng.next_unit()?) * i64_to_f64(pool.len() as i64));
        let idx = usize::try_from(idx).unwrap_or(0).min(pool.len() - 1);
        rewards.push(Reward::Item {
            name: pool[idx].to_string(),
        });
    }

    Ok(rewards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::UnitSequence;

    #[test]
    fn drop_boundary_is_exclusive_at_chance() {
        let cfg = TreasureCfg::default();
        let mut loot = UnitSequence::new(&[0.0, 0.5, 0.5, 0.5]);

        let mut hit = UnitSequence::new(&[0.049]);
        assert!(roll_drop(&cfg, &mut hit, &mut loot).expect("draws").is_some());

        let mut miss = UnitSequence::new(&[0.050]);
        let mut loot_untouched = UnitSequence::new(&[0.5]);
        assert!(roll_drop(&cfg, &mut miss, &mut loot_untouched)
            .expect("draws")
            .is_none());
        assert_eq!(loot_untouched.remaining(), 1, "miss must not draw loot");
    }

    #[test]
    fn failed_drop_source_surfaces_error() {
        let cfg = TreasureCfg::default();
        let mut exhausted = UnitSequence::default();
        let mut loot = UnitSequence::new(&[0.1]);
        assert!(roll_drop(&cfg, &mut exhausted, &mut loot).is_err());
        assert_eq!(loot.remaining(), 1, "failed roll must not draw loot");
    }

    #[test]
    fn failed_loot_source_surfaces_error() {
        let cfg = TreasureCfg::default();
        let mut hit = UnitSequence::new(&[0.0]);
        let mut exhausted = UnitSequence::default();
        assert!(roll_drop(&cfg, &mut hit, &mut exhausted).is_err());
    }

    #[test]
    fn rarity_pick_walks_cumulative_table() {
        let weights = RarityWeights::default();
        assert_eq!(pick_rarity(&weights, 0.0), Rarity::Common);
        assert_eq!(pick_rarity(&weights, 0.56), Rarity::Rare);
        assert_eq!(pick_rarity(&weights, 0.85), Rarity::Epic);
        assert_eq!(pick_rarity(&weights, 0.95), Rarity::Legendary);
        assert_eq!(pick_rarity(&weights, 0.999), Rarity::Mythic);
    }

    #[test]
    fn legendary_contents_include_named_item_and_gems() {
        let mut loot = UnitSequence::new(&[0.999, 0.5, 0.5, 0.0]);
        let cfg = TreasureCfg {
            drop_chance: 1.0,
            weights: RarityWeights {
                common: 1,
                rare: 1,
                epic: 1,
                legendary: 1,
                mythic: 0,
            },
        };
        let mut always = UnitSequence::new(&[0.0]);
        let container = roll_drop(&cfg, &mut always, &mut loot)
            .expect("draws")
            .expect("drop");
        assert_eq!(container.rarity(), Rarity::Legendary);
        assert!(container
            .rewards()
            .iter()
            .any(|reward| matches!(reward, Reward::Item { .. })));
        assert!(container
            .rewards()
            .iter()
            .any(|reward| matches!(reward, Reward::Gems { .. })));
    }

    #[test]
    fn container_opens_exactly_once() {
        let mut container = RewardContainer {
            rarity: Rarity::Common,
            rewards: RewardList::from_vec(vec![Reward::Coins { amount: 25 }]),
            opened: false,
        };
        assert!(container.open().is_ok());
        assert_eq!(container.open(), Err(TreasureError::AlreadyOpened));
        assert!(container.is_opened());
    }

    #[test]
    fn weight_table_rejects_increasing_rarity() {
        let weights = RarityWeights {
            common: 1,
            rare: 5,
            epic: 1,
            legendary: 1,
            mythic: 1,
        };
        assert!(weights.validate().is_err());
        assert!(RarityWeights::default().validate().is_ok());
    }
}
