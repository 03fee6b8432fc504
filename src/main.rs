// Local game runner: alternates turns between two players on a board
// loaded from a file, referees fruit expiry and forfeits, and announces
// the result.

use log::info;
use std::collections::HashMap;
use std::env;
use std::process;
use std::time::Duration;

use fruit_duel::config::Config;
use fruit_duel::game::Game;
use fruit_duel::loader;
use fruit_duel::player::Player;
use fruit_duel::types::PlayerId;

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment
    // variable is set, we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: fruit-duel <board-file>");
        process::exit(2);
    }

    let config = Config::load_or_default();

    match run_game(&args[1], config) {
        Ok(outcome) => println!("{}", outcome),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

/// Plays one full game and returns a human-readable outcome line
fn run_game(board_path: &str, config: Config) -> Result<String, String> {
    let (board, fruits, starts) = loader::load_board(board_path)?;
    info!(
        "Loaded {}x{} board with {} fruits",
        board.width(),
        board.height(),
        fruits.len()
    );

    // The referee holds the authoritative state; each player keeps its own
    // synchronized copy
    let mut referee = Game::new(
        board.clone(),
        starts,
        fruits.clone(),
        PlayerId::One,
        config.rules.penalty_score,
    );
    let mut players = [
        Player::new(board.clone(), starts, fruits.clone(), PlayerId::One, config.clone()),
        Player::new(board, starts, fruits, PlayerId::Two, config.clone()),
    ];

    let turn_limit = Duration::from_millis(config.rules.turn_time_limit_ms);
    let mut round = 0u32;

    loop {
        for &id in &[PlayerId::One, PlayerId::Two] {
            if referee.mobility(id) == 0 {
                let both_stuck = referee.mobility(id.rival()) == 0;
                return Ok(describe_outcome(&referee, id, both_stuck));
            }

            let direction = players[id.index()].make_move(turn_limit);
            let from = referee.position_of(id);
            let to = direction.apply(from);
            referee.apply_move(from, to);
            players[id.rival().index()].set_rival_move(to);
        }

        round += 1;
        info!(
            "Round {}: scores {} - {}",
            round,
            referee.score_of(PlayerId::One),
            referee.score_of(PlayerId::Two)
        );

        if round == config.rules.fruit_lifetime_turns {
            info!("Round {}: fruits expired", round);
            referee.update_fruits(HashMap::new());
            for player in players.iter_mut() {
                player.update_fruits(HashMap::new());
            }
        }
    }
}

/// Final scoring: the player who got stuck first pays the forfeit penalty,
/// unless both are stuck at once
fn describe_outcome(referee: &Game, stuck: PlayerId, both_stuck: bool) -> String {
    let mut totals = [
        referee.score_of(PlayerId::One),
        referee.score_of(PlayerId::Two),
    ];
    if !both_stuck {
        totals[stuck.index()] -= referee.penalty();
    }

    let [one, two] = totals;
    if one > two {
        format!("player one wins, {} to {}", one, two)
    } else if two > one {
        format!("player two wins, {} to {}", two, one)
    } else {
        format!("draw at {}", one)
    }
}
