mod cli;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use common::{create_rng, ConfigLoader};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use mcts::MCTSOptions;
use model::{ModelFactory, TabularModelFactory};
use play::{BoardOptions, Game, PlayOptions, TrainOptions};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Train(train_args) => {
            let config_path = relative_to_cwd(&train_args.config)?;
            let config = ConfigLoader::new(config_path, "train".to_string())?;

            let train_options: TrainOptions = config.load()?;
            let save_path = config
                .get_relative_path("save_path")
                .unwrap_or_else(|| PathBuf::from("model.json.gz"));

            let mut game = create_game(&config, train_options.self_learn.model_path.as_deref())?;

            train(&mut game, &train_options)?;

            game.save_model(&save_path)?;
        }
        Commands::Play(play_args) => {
            let config_path = relative_to_cwd(&play_args.config)?;
            let config = ConfigLoader::new(config_path, "play".to_string())?;

            let model_path = config.get_relative_path("model_path");
            let mut game = create_game(&config, model_path.as_deref())?;

            if play_args.train {
                let train_options: TrainOptions = config.load()?;
                train(&mut game, &train_options)?;
            }

            play_interactive(&mut game)?;
        }
    }

    Ok(())
}

/// Resolves `path` against the working directory. Absolute paths are returned unchanged.
fn relative_to_cwd(path: &str) -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(path))
}

fn create_game(
    config: &ConfigLoader,
    model_path: Option<&Path>,
) -> Result<Game<'static, TabularModelFactory>> {
    let board_options: BoardOptions = config.load()?;
    let mcts_options: MCTSOptions = config.load()?;
    let play_options: PlayOptions = config.load()?;
    let seed = config.get("seed").and_then(|v| v.as_u64());

    let start = board_options.start()?;
    let model_factory = TabularModelFactory::new(board_options.size);

    let model = match model_path {
        Some(path) => model_factory
            .load(path)
            .with_context(|| format!("Failed to load model at {:?}", path))?,
        None => model_factory.create(),
    };

    info!(
        "Board size {} with {} shapes, {} simulations per move",
        board_options.size, board_options.shapes, mcts_options.simulations
    );

    Ok(Game::new(
        model_factory,
        model,
        start,
        mcts_options,
        play_options,
        create_rng(seed),
    ))
}

fn train(game: &mut Game<'static, TabularModelFactory>, options: &TrainOptions) -> Result<()> {
    let reports = game.train(options)?;

    for report in reports {
        info!(
            "Iteration {}: challenger {:.3} ({}), vs untrained {:.3}, pool {}",
            report.iteration,
            report.challenger_score,
            if report.accepted { "accepted" } else { "rejected" },
            report.untrained_score,
            report.pool_size
        );
    }

    info!("Model knows {} positions", game.model().num_positions());

    Ok(())
}

fn play_interactive(game: &mut Game<'static, TabularModelFactory>) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        while !game.is_over() {
            if game.current_player() == 1 {
                let index = game.predict()?;
                game.take_action(index);
            } else {
                print!("Move: ");
                io::stdout().flush()?;

                let line = match lines.next() {
                    Some(line) => line?,
                    None => return Ok(()),
                };

                match line.trim().parse::<usize>() {
                    Ok(index) => {
                        if !game.take_action(index) {
                            println!("Cell {} is not available", index);
                        }
                    }
                    Err(_) => println!("Enter the index of an empty cell"),
                }
            }

            println!("{}", game);
        }

        println!("Result: {}", describe_result(game.result()));
        game.reset();
    }
}

fn describe_result(result: Option<f32>) -> &'static str {
    match result {
        Some(r) if r > 0.0 => "engine wins",
        Some(r) if r < 0.0 => "you win",
        Some(_) => "draw",
        None => "unfinished",
    }
}
