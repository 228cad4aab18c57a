//! Tournament simulator.
//!
//! Seats players at one table and plays hands through the `TableManager`
//! until a single player holds every chip. Bets are random and everyone
//! reaches showdown; the pot goes to a random player in the hand.

use std::sync::Arc;

use anyhow::{Context, Error, bail};
use chrono::TimeDelta;
use log::{debug, info};
use pico_args::Arguments;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tourney_poker::{
    db::InMemoryGameRepository,
    game::constants::{MAX_PLAYERS, MIN_PLAYERS},
    hand::{DeckSource, ShuffledDecks},
    table::{DeckFactory, Entrant, TableHandle, TableManager},
    tournament::{BlindScheduleConfig, ManualClock},
};

const HELP: &str = "\
Simulate a single-table poker tournament

USAGE:
  tourney_sim [OPTIONS]

OPTIONS:
  --players    N           Players to seat (2-10)           [default: 6]
  --hands      N           Stop after this many hands       [default: 1000]
  --hand-secs  SECS        Simulated duration of each hand  [default: 90]
  --config     PATH        Blind schedule JSON file         [default: env or standard]
  --seed       N           Seed for decks and betting       [default: random]

FLAGS:
  --turbo                  Use the turbo blind schedule
  -h, --help               Print help information

ENVIRONMENT:
  BLIND_LEVELS             Blind levels, e.g. 10/20,15/30,25/50
  BLIND_LEVEL_SECS         Level duration in seconds
  BLIND_STARTING_LEVEL     Level to start on
  STARTING_CHIPS           Chips per player
  RUST_LOG                 Log filter [default: info]
";

struct Args {
    players: usize,
    max_hands: u64,
    hand_secs: i64,
    config: Option<String>,
    seed: Option<u64>,
    turbo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        players: pargs.opt_value_from_str("--players")?.unwrap_or(6),
        max_hands: pargs.opt_value_from_str("--hands")?.unwrap_or(1000),
        hand_secs: pargs.opt_value_from_str("--hand-secs")?.unwrap_or(90),
        config: pargs.opt_value_from_str("--config")?,
        seed: pargs.opt_value_from_str("--seed")?,
        turbo: pargs.contains("--turbo"),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = load_config(&args)?;
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&args.players) {
        bail!(
            "--players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
            args.players
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let deck_seed: u64 = rng.random();
    let decks: DeckFactory =
        Arc::new(move || Box::new(ShuffledDecks::seeded(deck_seed)) as Box<dyn DeckSource>);

    let clock = ManualClock::default();
    let manager = TableManager::with_sources(
        Arc::new(InMemoryGameRepository::new()),
        Arc::new(clock.clone()),
        decks,
    );

    let entrants: Vec<Entrant> = (1..=args.players)
        .map(|i| Entrant::new(i as i64, &format!("player{i}"), i as u32))
        .collect();
    let table = manager
        .create_game("simulation", &config, &entrants, None)
        .await?;
    info!(
        "Seated {} players with {} chips, levels every {}s",
        args.players, config.starting_chips, config.level_duration_secs
    );

    let mut hands = 0;
    while hands < args.max_hands {
        play_hand(&table, &mut rng).await?;
        clock.advance(TimeDelta::seconds(args.hand_secs));
        hands += 1;

        if table.game().await?.is_finished() {
            break;
        }
    }

    let game = table.game().await?;
    let mut standings: Vec<_> = game.players().iter().collect();
    standings.sort_by_key(|p| (p.finish_position.unwrap_or(0), std::cmp::Reverse(p.chips)));
    info!("Finished after {} hands", game.hands_played());
    for player in standings {
        match player.finish_position {
            Some(position) => info!("  #{position} {}", player.name),
            None => info!("  -- {} ({} chips)", player.name, player.chips),
        }
    }

    manager.close_table(game.id()).await?;
    Ok(())
}

fn load_config(args: &Args) -> Result<BlindScheduleConfig, Error> {
    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read blind schedule from {path}"))?;
        return Ok(BlindScheduleConfig::from_json(&json)?);
    }
    if args.turbo {
        return Ok(BlindScheduleConfig::turbo());
    }
    Ok(BlindScheduleConfig::from_env()?)
}

async fn play_hand(table: &TableHandle, rng: &mut StdRng) -> Result<(), Error> {
    let hand = table.start_hand().await?;
    debug!(
        "Hand #{}: button {} sb {} bb {} at {}",
        hand.number(),
        hand.button(),
        hand.small_blind(),
        hand.big_blind(),
        hand.blinds()
    );

    betting_round(table, rng).await?;
    table.flop().await?;
    betting_round(table, rng).await?;
    table.turn().await?;
    betting_round(table, rng).await?;
    let hand = table.river().await?;
    betting_round(table, rng).await?;
    debug!("Hand #{}: board {}", hand.number(), hand.board());

    let game = table.game().await?;
    let hand = game.current_hand().context("hand vanished before showdown")?;
    let winner = hand
        .players()
        .choose(rng)
        .context("hand has no players")?;
    let stack = game
        .player(winner.player_id)
        .map(|p| p.chips)
        .context("winner is not seated")?;
    table.set_chips(winner.player_id, stack + hand.pot()).await?;
    debug!("Hand #{}: player {} wins {}", hand.number(), winner.player_id, hand.pot());

    table.end_hand().await?;
    Ok(())
}

/// Everyone still holding chips matches the street's bet, which a random
/// player sometimes raises first.
async fn betting_round(table: &TableHandle, rng: &mut StdRng) -> Result<(), Error> {
    let game = table.game().await?;
    let hand = game.current_hand().context("no hand in play")?;

    let mut target = hand.total_bet_amount();
    let live: Vec<_> = game.active_players();
    if rng.random_bool(0.3)
        && let Some(raiser) = live.choose(rng)
    {
        target += rng.random_range(1..=raiser.chips);
    }

    for player_hand in hand.players() {
        let owed = target.saturating_sub(player_hand.round_bet_amount());
        let has_chips = game
            .player(player_hand.player_id)
            .is_some_and(|p| p.is_active());
        if owed > 0 && has_chips {
            table.commit_bet(player_hand.player_id, owed).await?;
        }
    }
    Ok(())
}
