use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use rand::rngs::StdRng;
use rand::SeedableRng;

use slide_puzzle_engine::{
    format_time, init_logging, is_solvable, shuffle, AutoSolve, Availability, Board, Direction,
    MoveOutcome, Phase, PlaybackStep, Session, SessionError, Solution, SolverPolicy,
    MAX_SOLVER_SIDE,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shuffle a board, solve it and print every step.
    Demo {
        #[arg(long, default_value_t = 3)]
        side: usize,
        #[arg(long, help = "Fix RNG seed for a reproducible shuffle")]
        seed: Option<u64>,
        #[arg(long, default_value_t = MAX_SOLVER_SIDE)]
        max_solver_side: usize,
    },
    /// Solve a layout given as comma-separated tile values, blank = side*side-1.
    Solve {
        #[arg(long)]
        side: usize,
        #[arg(long, value_delimiter = ',', required = true)]
        tiles: Vec<usize>,
        #[arg(long, default_value_t = MAX_SOLVER_SIDE)]
        max_solver_side: usize,
    },
    /// Suggest one move for a layout.
    Hint {
        #[arg(long)]
        side: usize,
        #[arg(long, value_delimiter = ',', required = true)]
        tiles: Vec<usize>,
        #[arg(long, default_value_t = MAX_SOLVER_SIDE)]
        max_solver_side: usize,
    },
    /// Report whether a layout can be solved.
    Check {
        #[arg(long)]
        side: usize,
        #[arg(long, value_delimiter = ',', required = true)]
        tiles: Vec<usize>,
    },
    /// Play in the terminal. Arrows slide tiles, h points at a misplaced
    /// tile, m suggests a move, s auto-solves.
    Play {
        #[arg(long, default_value_t = 3)]
        side: usize,
        #[arg(long, help = "Fix RNG seed for a reproducible shuffle")]
        seed: Option<u64>,
        #[arg(long, default_value_t = MAX_SOLVER_SIDE)]
        max_solver_side: usize,
        #[arg(long, default_value_t = 400, help = "Pause between auto-solve moves")]
        delay_ms: u64,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            side,
            seed,
            max_solver_side,
        } => {
            let policy = SolverPolicy::new(max_solver_side);
            let mut board = Board::new(side)?;
            println!("Initial Puzzle:\n{}", board);

            let mut rng = seeded_rng(seed);
            shuffle(&mut board, &mut rng);
            println!("Shuffled Puzzle:\n{}", board);

            gate(policy, side)?;
            print_solution(&board, board.solve()?)?;
        }
        Commands::Solve {
            side,
            tiles,
            max_solver_side,
        } => {
            let board = Board::from_tiles(side, tiles).context("invalid board")?;
            gate(SolverPolicy::new(max_solver_side), side)?;
            print_solution(&board, board.solve()?)?;
        }
        Commands::Hint {
            side,
            tiles,
            max_solver_side,
        } => {
            let board = Board::from_tiles(side, tiles).context("invalid board")?;
            gate(SolverPolicy::new(max_solver_side), side)?;
            match board.next_best_move() {
                Some(pos) => println!(
                    "Slide tile {} at position {}",
                    board.tiles()[pos] + 1,
                    pos
                ),
                None => println!("No move available"),
            }
        }
        Commands::Check { side, tiles } => {
            let board = Board::from_tiles(side, tiles).context("invalid board")?;
            if is_solvable(board.tiles(), side) {
                println!("Solvable");
            } else {
                println!("Unsolvable");
            }
        }
        Commands::Play {
            side,
            seed,
            max_solver_side,
            delay_ms,
        } => {
            let mut session = Session::new(SolverPolicy::new(max_solver_side));
            let mut rng = seeded_rng(seed);
            session.configure(side)?;
            session.start(&mut rng)?;

            // Log lines would land in the middle of the redrawn screen.
            let level = log::max_level();
            log::set_max_level(log::LevelFilter::Off);
            terminal::enable_raw_mode()?;
            let result = play(&mut session, &mut rng, Duration::from_millis(delay_ms));
            terminal::disable_raw_mode()?;
            log::set_max_level(level);
            result?;
        }
    }

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => {
            println!("Using fixed seed: {}", s);
            StdRng::seed_from_u64(s)
        }
        None => StdRng::from_entropy(),
    }
}

fn gate(policy: SolverPolicy, side: usize) -> Result<()> {
    match policy.availability(side) {
        Availability::Available => Ok(()),
        Availability::Unsupported { side, max_side } => {
            Err(SessionError::SolverUnavailable { side, max_side }.into())
        }
    }
}

fn print_solution(board: &Board, solution: Solution) -> Result<()> {
    let moves = match solution {
        Solution::Unsolvable => {
            println!("No solution exists for this layout");
            return Ok(());
        }
        Solution::Moves(moves) => moves,
    };

    println!("Found optimal solution with {} moves", moves.len());
    let mut replay = board.clone();
    for (step, pos) in moves.into_iter().enumerate() {
        let tile = replay.tiles()[pos] + 1;
        let direction = Direction::toward_blank(replay.blank_position(), pos, replay.side());
        replay.apply_move(pos)?;
        match direction {
            Some(direction) => println!("{}: {} {}\n{}", step + 1, tile, direction, replay),
            None => println!("{}: {}\n{}", step + 1, tile, replay),
        }
    }
    Ok(())
}

fn play(session: &mut Session, rng: &mut StdRng, delay: Duration) -> Result<()> {
    let mut message = String::new();

    loop {
        render(session, &message)?;
        message.clear();

        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        let direction = match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        };

        if let Some(direction) = direction {
            if session.phase() != Phase::Active {
                continue;
            }
            let Some(board) = session.board() else {
                continue;
            };
            let Some(pos) = direction.source(board.blank_position(), board.side()) else {
                continue;
            };
            if let MoveOutcome::Won(stats) = session.make_move(pos)? {
                message = format!(
                    "Solved in {} moves, {}! n: new game, q: quit",
                    stats.moves,
                    format_time(stats.elapsed.as_secs())
                );
            }
            continue;
        }

        match code {
            KeyCode::Char('h') => match session.hint(rng) {
                Ok(Some(pos)) => message = describe_misplaced(session, pos),
                Ok(None) => message = "Every tile is home".to_string(),
                Err(err) => message = err.to_string(),
            },
            KeyCode::Char('m') => match session.next_move() {
                Ok(Some(pos)) => message = describe_hint(session, pos),
                Ok(None) => message = "No move available".to_string(),
                Err(err) => message = err.to_string(),
            },
            KeyCode::Char('s') if session.phase() == Phase::Active => {
                message = auto_solve(session, delay)?
            }
            KeyCode::Char('n') if session.phase() == Phase::Won => {
                session.retry()?;
                session.start(rng)?;
            }
            _ => {}
        }
    }
}

fn describe_misplaced(session: &Session, pos: usize) -> String {
    match session.board() {
        Some(board) => format!("Tile {} is out of place", board.tiles()[pos] + 1),
        None => String::new(),
    }
}

fn describe_hint(session: &Session, pos: usize) -> String {
    let Some(board) = session.board() else {
        return String::new();
    };
    let tile = board.tiles()[pos] + 1;
    match Direction::toward_blank(board.blank_position(), pos, board.side()) {
        Some(direction) => format!("Try sliding {} {}", tile, direction),
        None => format!("Try sliding {}", tile),
    }
}

/// Play the solver's moves back one at a time; any key cancels.
fn auto_solve(session: &mut Session, delay: Duration) -> Result<String> {
    match session.begin_auto_solve() {
        Ok(AutoSolve::AlreadySolved) => return Ok("Already solved".to_string()),
        Ok(AutoSolve::Unsolvable) => return Ok("No solution found".to_string()),
        Ok(AutoSolve::Started { .. }) => {}
        Err(
            err @ (SessionError::SolverUnavailable { .. } | SessionError::WrongPhase { .. }),
        ) => return Ok(err.to_string()),
        Err(err) => return Err(err.into()),
    }

    loop {
        render(session, "Solving... any key cancels")?;
        if event::poll(delay)? {
            let _ = event::read()?;
            session.cancel_playback()?;
            return Ok("Auto-solve cancelled".to_string());
        }

        match session.step_playback()? {
            PlaybackStep::Moved { .. } => {}
            PlaybackStep::Won(stats) => {
                return Ok(format!(
                    "Solved in {} moves! n: new game, q: quit",
                    stats.moves
                ))
            }
            PlaybackStep::RolledBack => return Ok("Solve failed, board restored".to_string()),
        }
    }
}

fn render(session: &Session, message: &str) -> Result<()> {
    let mut out = io::stdout();
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    let misplaced = session.board().map_or(0, |board| board.wrong_tiles().len());
    if let Some(board) = session.board() {
        write!(out, "{}", board.to_string().replace('\n', "\r\n"))?;
    }
    write!(
        out,
        "\r\nMoves: {}  Time: {}  Misplaced: {}\r\n",
        session.move_count(),
        format_time(session.elapsed().as_secs()),
        misplaced
    )?;
    if let Some(availability) = session.availability() {
        write!(
            out,
            "[h] Hint  [m] {}  [s] {}  [q] Quit\r\n",
            availability.next_move_label(),
            availability.auto_solve_label()
        )?;
    }
    write!(out, "{}\r\n", message)?;
    out.flush()?;
    Ok(())
}
