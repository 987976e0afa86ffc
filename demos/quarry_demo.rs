//! quarry-demo: replay the classic search examples from the command line.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use rand::SeedableRng;

use quarry_adversarial::{Board, GameTree, Mark, evaluate_with_stats, rank_moves, select_best_move};
use quarry_andor::{AoState, solve_and_or};
use quarry_core::{Point, SearchError, Zero};
use quarry_demos::{
    AndOrScenario, PursuitConfig, Scenario, classic_and_or, classic_game_tree, load_json,
    random_walk, run_pursuit,
};
use quarry_paths::{
    DepthLimited, search_cost_optimal_with_cost, search_depth_limited,
    search_greedy_best_first, search_iterative_deepening, traverse_breadth_first,
};

#[derive(Parser)]
#[command(name = "quarry-demo")]
#[command(about = "Classic graph, game and AND-OR search examples")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG also applies
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Breadth-first visiting order
    Bfs {
        #[arg(long, default_value = "S")]
        start: String,
        /// Scenario file with a graph (and optional heuristic)
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Depth-limited depth-first search
    Dls {
        #[arg(long, default_value = "A")]
        start: String,
        #[arg(long, default_value = "D")]
        goal: String,
        #[arg(long, default_value_t = 2)]
        limit: usize,
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Iterative deepening up to a maximum limit
    Iddfs {
        #[arg(long, default_value = "A")]
        start: String,
        #[arg(long, default_value = "K")]
        goal: String,
        #[arg(long, default_value_t = 10)]
        max_limit: usize,
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Greedy best-first expansion order
    Greedy {
        #[arg(long, default_value = "A")]
        start: String,
        #[arg(long, default_value = "G")]
        goal: String,
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Cheapest path with A*
    Astar {
        #[arg(long, default_value = "A")]
        start: String,
        #[arg(long, default_value = "G")]
        goal: String,
        /// Ignore the heuristic table (uniform-cost search)
        #[arg(long)]
        zero: bool,
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Minimax value of a game tree
    Minimax {
        #[arg(long, default_value = "A")]
        root: String,
        /// Evaluate for the minimizing player
        #[arg(long)]
        minimizing: bool,
        /// Disable alpha-beta pruning
        #[arg(long)]
        no_pruning: bool,
        /// Game tree JSON file
        #[arg(long)]
        tree: Option<PathBuf>,
    },

    /// AO* solution subgraph of an AND-OR graph
    AoStar {
        #[arg(long, default_value = "A")]
        root: String,
        /// AND-OR scenario JSON file
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Tic-tac-toe move selection, or self-play without a board
    Tictactoe {
        /// Board as nine cells of X, O and '.', e.g. "XO./.X./..."
        #[arg(long)]
        board: Option<String>,
        #[arg(long, value_enum, default_value = "x")]
        player: Player,
    },

    /// Pursuit on a grid: A* chaser against a random walker
    Chase {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 60)]
        ticks: u32,
        /// Chaser moves once every this many ticks
        #[arg(long, default_value_t = 1)]
        period: u32,
        #[arg(long, default_value_t = 10)]
        size: i32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Player {
    X,
    O,
}

impl From<Player> for Mark {
    fn from(p: Player) -> Mark {
        match p {
            Player::X => Mark::X,
            Player::O => Mark::O,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli.command)
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn scenario_or(
    path: Option<PathBuf>,
    default: fn() -> Result<Scenario, SearchError>,
) -> Result<Scenario> {
    match path {
        Some(p) => Scenario::load(p),
        None => Ok(default()?),
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Bfs { start, scenario } => {
            let sc = scenario_or(scenario, Scenario::network)?;
            let order = traverse_breadth_first(&sc.graph, start)?
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", order.join(" -> "));
        }

        Commands::Dls {
            start,
            goal,
            limit,
            scenario,
        } => {
            let sc = scenario_or(scenario, Scenario::binary_tree)?;
            let outcome = search_depth_limited(&sc.graph, start, &goal, limit)?;
            report_depth_limited(&outcome, &goal, limit);
        }

        Commands::Iddfs {
            start,
            goal,
            max_limit,
            scenario,
        } => {
            let sc = scenario_or(scenario, Scenario::binary_tree)?;
            let outcome = search_iterative_deepening(&sc.graph, start, &goal, max_limit)?;
            report_depth_limited(&outcome, &goal, max_limit);
        }

        Commands::Greedy {
            start,
            goal,
            scenario,
        } => {
            let sc = scenario_or(scenario, Scenario::weighted)?;
            let order = search_greedy_best_first(&sc.graph, start, &goal, &sc.heuristic)?;
            println!("{}", order.join(" -> "));
            if order.last() != Some(&goal) {
                println!("goal {goal} was not reached");
            }
        }

        Commands::Astar {
            start,
            goal,
            zero,
            scenario,
        } => {
            let sc = scenario_or(scenario, Scenario::weighted)?;
            let route = if zero {
                search_cost_optimal_with_cost(&sc.graph, start, &goal, &Zero)?
            } else {
                search_cost_optimal_with_cost(&sc.graph, start, &goal, &sc.heuristic)?
            };
            match route {
                Some(r) => println!("{} (cost {})", r.path.join(" -> "), r.cost),
                None => println!("goal {goal} is unreachable"),
            }
        }

        Commands::Minimax {
            root,
            minimizing,
            no_pruning,
            tree,
        } => {
            let tree: GameTree<String> = match tree {
                Some(p) => load_json(p)?,
                None => classic_game_tree(),
            };
            let eval = evaluate_with_stats(&tree, &root, !minimizing, !no_pruning)?;
            println!(
                "value of {root}: {} ({} nodes, {} leaves visited)",
                eval.value, eval.nodes_visited, eval.leaves_visited
            );
        }

        Commands::AoStar { root, scenario } => {
            let sc: AndOrScenario = match scenario {
                Some(p) => load_json(p)?,
                None => classic_and_or()?,
            };
            let state = solve_and_or(&sc.graph, &root, AoState::new(sc.heuristic))?;
            match state.cost_of(&root) {
                Some(cost) => println!("cost of {root}: {cost}"),
                None => println!("no estimate for {root}"),
            }
            print!("{}", state.solution.display(&root));
        }

        Commands::Tictactoe { board, player } => {
            let player = Mark::from(player);
            match board {
                Some(text) => {
                    let board: Board = text.parse()?;
                    println!("{board}\n");
                    for (p, score) in rank_moves(&board, player) {
                        println!("{player} at {p}: {score:+}");
                    }
                    match select_best_move(&board, player) {
                        Some(p) => println!("best move for {player}: {p}"),
                        None => println!("game over"),
                    }
                }
                None => self_play(player)?,
            }
        }

        Commands::Chase {
            seed,
            ticks,
            period,
            size,
        } => {
            if size < 2 {
                bail!("grid size must be at least 2, got {size}");
            }
            let config = PursuitConfig {
                size,
                ticks,
                chaser_period: period,
            };
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let round = run_pursuit(&config, random_walk(&mut rng))?;
            if round.caught {
                println!("chaser wins after {} ticks at {}", round.ticks, round.evader);
            } else {
                println!("evader escapes after {} ticks at {}", round.ticks, round.evader);
            }
            let trail: Vec<String> = round.chaser_trail.iter().map(Point::to_string).collect();
            println!("chaser trail: {}", trail.join(" "));
        }
    }
    Ok(())
}

fn report_depth_limited(outcome: &DepthLimited<String>, goal: &str, limit: usize) {
    match outcome {
        DepthLimited::Found(path) => println!("{}", path.join(" -> ")),
        DepthLimited::LimitExceeded => {
            println!("goal {goal} is unreachable within depth limit {limit}")
        }
        DepthLimited::Absent => println!("goal {goal} is not reachable from the start"),
    }
}

fn self_play(first: Mark) -> Result<()> {
    let mut board = Board::new();
    let mut turn = first;
    while let Some(p) = select_best_move(&board, turn) {
        board.place(p, turn)?;
        log::info!("{turn} plays {p}");
        println!("{board}\n");
        turn = turn.opponent();
    }
    match board.winner() {
        Some(m) => println!("{m} wins"),
        None => println!("draw"),
    }
    Ok(())
}
