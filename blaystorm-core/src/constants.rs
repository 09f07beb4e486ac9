//! Centralized balance and tuning constants for the BlayStorm reward cascade.
//!
//! These values define the deterministic math for the core reward loop.
//! Keeping them together ensures that gameplay balance can only be adjusted
//! via code changes reviewed in version control, rather than through
//! external JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_PLAYER_LEVEL_UP: &str = "log.player.level-up";
pub(crate) const LOG_COMBO_BROKEN: &str = "log.combo.broken";
pub(crate) const LOG_COMBO_MILESTONE: &str = "log.combo.milestone";
pub(crate) const LOG_QUEST_COMPLETED: &str = "log.quest.completed";
pub(crate) const LOG_COMPANION_LEVEL_UP: &str = "log.companion.level-up";
pub(crate) const LOG_SEASON_LEVEL_UP: &str = "log.season.level-up";
pub(crate) const LOG_TREASURE_FOUND: &str = "log.treasure.found";
pub(crate) const LOG_TREASURE_ROLL_SKIPPED: &str = "log.treasure.roll-skipped";
pub(crate) const LOG_BOSS_DAMAGE: &str = "log.boss.damage";
pub(crate) const LOG_BOSS_DEFEATED: &str = "log.boss.defeated";

// Combo tuning ---------------------------------------------------------------
// Breakpoint bands evaluated high-to-low; first qualifying band wins.
pub(crate) const COMBO_MULTIPLIER_BANDS: &[(u32, f64)] = &[
    (50, 3.00),
    (20, 2.50),
    (10, 2.00),
    (5, 1.50),
    (3, 1.25),
];
pub(crate) const COMBO_BASE_MULTIPLIER: f64 = 1.00;
pub(crate) const COMBO_MILESTONES: &[u32] = &[5, 10, 20];

// XP share tuning ------------------------------------------------------------
pub(crate) const DEFAULT_COMPANION_SHARE: f64 = 0.30;
pub(crate) const DEFAULT_SEASON_SHARE: f64 = 0.50;
pub(crate) const DEFAULT_XP_GROWTH: f64 = 1.5;
pub(crate) const DEFAULT_SEASON_MAX_LEVEL: u32 = 100;
pub(crate) const COMPANION_FIRST_LEVEL_XP: f64 = 100.0;
pub(crate) const SEASON_FIRST_LEVEL_XP: f64 = 200.0;
pub(crate) const HAPPINESS_MAX: u8 = 100;
pub(crate) const DEFAULT_HAPPINESS_PER_CORRECT: u8 = 1;

// Treasure tuning ------------------------------------------------------------
pub(crate) const DEFAULT_DROP_CHANCE: f64 = 0.05;
pub(crate) const DEFAULT_RARITY_WEIGHTS: [u32; 5] = [55, 25, 12, 6, 2];
pub(crate) const COIN_BASE_BY_RARITY: [i64; 5] = [25, 60, 150, 400, 1_000];
pub(crate) const COIN_JITTER_BY_RARITY: [i64; 5] = [10, 25, 50, 100, 250];
pub(crate) const GEM_BASE_BY_RARITY: [i64; 5] = [0, 0, 5, 15, 40];
pub(crate) const LEGENDARY_ITEMS: &[&str] = &[
    "item.golden-abacus",
    "item.infinity-compass",
    "item.prime-crown",
];
pub(crate) const MYTHIC_ITEMS: &[&str] = &[
    "item.euler-sigil",
    "item.fractal-heart",
];

// Boss tuning ----------------------------------------------------------------
pub(crate) const DEFAULT_BOSS_FLAT_DAMAGE: i64 = 10;
pub(crate) const DEFAULT_BOSS_DAMAGE_PER_DIFFICULTY: i64 = 5;

// Input validation -----------------------------------------------------------
pub(crate) const MIN_DIFFICULTY: u32 = 1;
