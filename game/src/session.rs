//! The game session: save lifecycle and battle assembly.
//!
//! A session sits between the host and the simulation. It owns a
//! [`SaveStore`], builds battles from the shipped asset data plus the
//! player's records, and writes the records back once a battle is over.

use caster_assets as assets;
use caster_battle::{
    Battle, BattleError, BattleOutcome, Catalog, CharacterId, CharacterStats, Faction, Inventory,
    Item, SpawnPoint,
};
use log::{info, warn};
use parity_scale_codec::Encode;

use crate::records::{SaveRecord, StatsRecord};
use crate::store::{SaveStore, StoreError};

/// Store key for the player's permanent stats.
pub const STATS_KEY: &str = "PlayerStats";

/// Store key for the player's battle-to-battle progress.
pub const SAVE_KEY: &str = "PlayerSave";

/// Spawn capacity per faction in every battle.
const SPAWN_SLOTS_PER_FACTION: usize = 4;

/// Errors from session operations: either the store or the battle layer.
#[derive(Debug)]
pub enum SessionError {
    Store(StoreError),
    Battle(BattleError),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::Store(err) => write!(f, "store error: {err}"),
            SessionError::Battle(err) => write!(f, "battle error: {err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

impl From<BattleError> for SessionError {
    fn from(err: BattleError) -> Self {
        SessionError::Battle(err)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

pub struct GameSession<S: SaveStore> {
    store: S,
    player_id: Option<CharacterId>,
    player_stats: Option<CharacterStats>,
}

impl<S: SaveStore> GameSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            player_id: None,
            player_stats: None,
        }
    }

    /// The player's character in the most recently started battle.
    pub fn player_id(&self) -> Option<CharacterId> {
        self.player_id
    }

    /// Whether a full save exists, i.e. the "continue" option is valid.
    pub fn has_save(&self) -> bool {
        self.store.exists(STATS_KEY) && self.store.exists(SAVE_KEY)
    }

    /// Writes a fresh save: template stats, full pools, starter items.
    pub fn new_save(&mut self) -> SessionResult<()> {
        let stats = assets::player_template().stats;
        self.store
            .save(STATS_KEY, &StatsRecord::new(stats).encode())?;
        let save = SaveRecord::new(stats.max_health, stats.max_mana, starter_items());
        self.store.save(SAVE_KEY, &save.encode())?;
        info!("created a new save");
        Ok(())
    }

    pub fn delete_save(&mut self) -> SessionResult<()> {
        self.store.delete(STATS_KEY)?;
        self.store.delete(SAVE_KEY)?;
        info!("deleted the save");
        Ok(())
    }

    /// Assembles a battle: the player restored from their records plus
    /// `enemy_count` stock enemies, on a seeded deterministic simulation.
    pub fn start_battle(&mut self, enemy_count: usize, seed: u64) -> SessionResult<Battle> {
        let catalog = Catalog::new(assets::default_attacks())?;
        let mut spawn_points = Vec::new();
        for _ in 0..SPAWN_SLOTS_PER_FACTION {
            spawn_points.push(SpawnPoint::new(Faction::Friendly));
            spawn_points.push(SpawnPoint::new(Faction::Enemy));
        }
        let mut battle = Battle::new(catalog, assets::character_templates(), spawn_points, seed);

        let player = battle
            .add_character(Faction::Friendly, assets::PLAYER_TEMPLATE)?
            .ok_or(BattleError::NoSpawnPoint)?;
        let (stats, save) = self.load_player()?;
        battle.restore_character(player, stats, save.current_health, save.current_mana)?;
        battle.set_inventory(Inventory::from_items(save.items));

        for _ in 0..enemy_count {
            // Capacity-limited; extra enemies beyond the bench are dropped.
            battle.add_character(Faction::Enemy, assets::ENEMY_TEMPLATE)?;
        }

        battle.start()?;
        self.player_id = Some(player);
        self.player_stats = Some(stats);
        Ok(battle)
    }

    /// Persists the player's pools and inventory once the battle is over.
    /// A dead player is saved at zero pools; reviving them is the host
    /// menu's concern.
    pub fn finish_battle(&mut self, battle: &Battle) -> SessionResult<BattleOutcome> {
        let outcome = battle
            .outcome()
            .ok_or(SessionError::Battle(BattleError::WrongPhase))?;
        let stats = match self.player_stats {
            Some(stats) => stats,
            None => assets::player_template().stats,
        };
        let (health, mana) = match self.player_id.and_then(|id| battle.character(id)) {
            Some(player) => (player.health(), player.mana()),
            None => (0, 0),
        };
        self.store
            .save(STATS_KEY, &StatsRecord::new(stats).encode())?;
        let save = SaveRecord::new(health, mana, battle.inventory().items().to_vec());
        self.store.save(SAVE_KEY, &save.encode())?;
        info!("battle finished: {:?}", outcome);
        self.player_id = None;
        Ok(outcome)
    }

    /// The player's records, falling back to a fresh save when none exist.
    /// Any other store failure is real and propagates.
    fn load_player(&self) -> SessionResult<(CharacterStats, SaveRecord)> {
        let template_stats = assets::player_template().stats;
        let stats = match self.store.load(STATS_KEY) {
            Ok(bytes) => StatsRecord::from_bytes(&bytes)?.stats,
            Err(StoreError::Missing { .. }) => {
                warn!("no stats record, starting from template defaults");
                template_stats
            }
            Err(err) => return Err(err.into()),
        };
        let save = match self.store.load(SAVE_KEY) {
            Ok(bytes) => SaveRecord::from_bytes(&bytes)?,
            Err(StoreError::Missing { .. }) => {
                warn!("no save record, starting fresh");
                SaveRecord::new(stats.max_health, stats.max_mana, starter_items())
            }
            Err(err) => return Err(err.into()),
        };
        Ok((stats, save))
    }
}

fn starter_items() -> Vec<Item> {
    vec![Item::health_potion(5), Item::mana_potion(3)]
}
