/// Cards in a standard deck.
pub const CARDS_IN_DECK: usize = 52;

/// Hole cards dealt to each player.
pub const HOLE_CARDS: usize = 2;

/// Community cards revealed on the flop.
pub const FLOP_CARDS: usize = 3;

/// Seats at a single tournament table. Ten players need 20 hole cards plus
/// five board cards, well inside one deck.
pub const MAX_PLAYERS: usize = 10;

/// Players needed to deal a hand.
pub const MIN_PLAYERS: usize = 2;

pub const DEFAULT_STARTING_CHIPS: u32 = 2000;
pub const DEFAULT_LEVEL_SECS: u32 = 20 * 60;
