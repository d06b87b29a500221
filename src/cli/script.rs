//! Script command implementation - headless runs of a button script.

use super::{CliError, OutputFormat};
use fauna::{Game, GameConfig, parse_script};
use log::info;
use std::fs;
use std::path::Path;

/// Execute the script command.
///
/// # Errors
///
/// Returns an error if the script can't be read or parsed, or the save file
/// can't be written.
pub(crate) fn execute(
    config: GameConfig,
    input: &str,
    inline: bool,
    format: OutputFormat,
    save: Option<&Path>,
) -> Result<(), CliError> {
    let text = if inline {
        input.to_string()
    } else {
        fs::read_to_string(input).map_err(|e| CliError::new(format!("Failed to read {input}: {e}")))?
    };
    let frames = parse_script(&text)?;
    info!("running {} frames with seed {}", frames.len(), config.seed);

    let mut game = Game::with_config(config);
    let mut frame = game.render();
    for input in frames {
        frame = game.tick(input);
    }

    match format {
        OutputFormat::Text => print!("{frame}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&frame)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    if let Some(path) = save {
        fs::write(path, game.save_slot())
            .map_err(|e| CliError::new(format!("Failed to write {}: {e}", path.display())))?;
    }

    Ok(())
}
