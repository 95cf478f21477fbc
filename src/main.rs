use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flappy::build_info;
use flappy::core::game_loop::LoopDriver;
use flappy::game::GameEngine;
use flappy::input::InputHandler;
use flappy::utils::{logging, JsonFileStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

fn print_help() {
    println!("Flappy - Flappy Bird in the terminal\n");
    println!("Usage: flappy [option]\n");
    println!("Options:");
    println!("  --version  Show version information");
    println!("  --help     Show this help message\n");
    println!("Controls:");
    println!("  Space, Up, mouse click   Start / flap / restart");
    println!("  Esc, q, Ctrl+C           Quit");
}

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'flappy --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    match logging::init() {
        Ok(path) => log::info!("{} logging to {}", build_info::version_line(), path.display()),
        Err(e) => eprintln!("Warning: file logging disabled: {}", e),
    }

    let store = JsonFileStore::open_default();
    let engine = GameEngine::new(store);
    log::info!("stored best score {}", engine.high_score);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    stdout.execute(Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let running = Arc::new(AtomicBool::new(true));
    let input_stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    let input = InputHandler::spawn(tx, input_stop);

    let mut driver = LoopDriver::new(engine, rx, running, rand::thread_rng());
    let result = driver.run(&mut terminal);

    // Cleanup terminal, even if the loop failed
    input.shutdown();
    let backend = terminal.backend_mut();
    backend.execute(Show)?;
    backend.execute(DisableMouseCapture)?;
    backend.execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;

    if let Err(e) = &result {
        log::error!("terminal error: {}", e);
    }
    result?;

    let best = driver.engine().high_score;
    if best > 0 {
        println!("Best score: {}", best);
    }
    log::info!("shutdown");

    Ok(())
}
