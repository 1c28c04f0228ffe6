//! Option Tiles and Triggers
//!
//! Map cells carrying side effects that fire while the player overlaps them.
//! Trigger payloads are typed, so a trigger with a malformed argument list
//! cannot be built.

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::core::position::Position;
use crate::game::events::GameEvent;
use crate::game::level::Level;
use crate::game::map::CellChange;

/// One side effect of an option tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Hurt the player every tick it stands here
    Damage {
        /// Hit points removed
        amount: u32,
    },
    /// Give gold once, then turn the cell into `replacement`
    Gold {
        /// Gold added to the level counter
        amount: u32,
        /// New symbol for the cell (config default when absent)
        #[serde(default)]
        replacement: Option<char>,
    },
    /// Switch to another map of the level and move the player there
    Teleport {
        /// Index of the destination map within the level
        map_index: usize,
        /// Where the player's first body cell lands
        target: Position,
    },
}

/// Discriminant of a [`Trigger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TriggerKind {
    /// Damage trigger
    Damage = 0,
    /// Gold trigger
    Gold = 1,
    /// Teleport trigger
    Teleport = 2,
}

impl Trigger {
    /// Kind of this trigger.
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Damage { .. } => TriggerKind::Damage,
            Trigger::Gold { .. } => TriggerKind::Gold,
            Trigger::Teleport { .. } => TriggerKind::Teleport,
        }
    }

    /// Does this trigger disappear after firing?
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Trigger::Gold { .. })
    }
}

/// A map cell with triggers attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTile {
    /// Cell the triggers are attached to
    pub position: Position,
    /// Active triggers
    pub triggers: Vec<Trigger>,
}

impl OptionTile {
    /// Create an option tile.
    pub fn new(position: Position, triggers: Vec<Trigger>) -> Self {
        Self { position, triggers }
    }

    /// Triggers in firing order: damage, gold, then teleport.
    fn firing_order(&self) -> Vec<Trigger> {
        let mut ordered = self.triggers.clone();
        ordered.sort_by_key(Trigger::kind);
        ordered
    }
}

/// What the trigger scan did this tick.
#[derive(Debug, Default)]
pub struct TriggerOutcome {
    /// Events raised by fired triggers
    pub events: Vec<GameEvent>,
    /// Cells to redraw on the (possibly new) active map
    pub changes: Vec<CellChange>,
    /// Did a teleport switch the active map?
    pub map_switched: bool,
    /// Did damage kill the player?
    pub player_died: bool,
}

/// Fire every trigger on option tiles the player overlaps.
///
/// A teleport ends the scan: remaining tiles belonged to the previous map.
pub fn process_triggers(level: &mut Level, config: &GameConfig, tick: u32) -> TriggerOutcome {
    let mut outcome = TriggerOutcome::default();

    let hits: Vec<OptionTile> = level
        .map()
        .option_tiles()
        .filter(|option| level.player().colliding_positions().contains(&option.position))
        .cloned()
        .collect();

    for option in hits {
        for trigger in option.firing_order() {
            match trigger {
                Trigger::Damage { amount } => {
                    apply_damage(level, option.position, amount, tick, &mut outcome);
                }
                Trigger::Gold { amount, replacement } => {
                    let symbol = replacement.unwrap_or(config.trigger_replacement);
                    collect_gold(level, option.position, amount, symbol, tick, &mut outcome);
                }
                Trigger::Teleport { map_index, target } => {
                    let from = level.active_map_index();
                    match level.switch_map(map_index, target) {
                        Some(changes) => {
                            debug!(from, to = map_index, %target, "Teleported");
                            outcome.changes = changes;
                            outcome.map_switched = true;
                            outcome.events.push(GameEvent::map_switched(tick, from, map_index, target));
                            return outcome;
                        }
                        None => {
                            warn!(map_index, "Teleport to missing map ignored");
                        }
                    }
                }
            }
        }
    }

    outcome
}

fn apply_damage(
    level: &mut Level,
    position: Position,
    amount: u32,
    tick: u32,
    outcome: &mut TriggerOutcome,
) {
    let Some(stats) = level.player_mut().stats_mut() else {
        return;
    };

    let died = stats.lose_hp(amount);
    let hp = stats.hp();
    debug!(%position, amount, hp, "Damage trigger");
    outcome.events.push(GameEvent::damaged(tick, amount, hp));

    if died {
        outcome.player_died = true;
        outcome.events.push(GameEvent::player_died(tick));
    }
}

fn collect_gold(
    level: &mut Level,
    position: Position,
    amount: u32,
    replacement: char,
    tick: u32,
    outcome: &mut TriggerOutcome,
) {
    let total = level.add_gold(amount);

    let map = level.map_mut();
    if let Some(change) = map.set_symbol_at(position, replacement) {
        outcome.changes.push(change);
    }
    map.remove_trigger_at(position, TriggerKind::Gold);

    debug!(%position, amount, total, "Gold collected");
    outcome.events.push(GameEvent::gold_collected(tick, position, amount, total));
}
