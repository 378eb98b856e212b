//! CLI configuration commands

use crate::config::Config;
use crate::output;
use crate::ConfigCommands;
use anyhow::Result;

pub fn handle_config_command(command: ConfigCommands, config: &mut Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("CLI Configuration:");
            println!("  Server: {}", config.default_server);
            println!("  Output: {}", config.default_output);
        }

        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            let path = config.save()?;
            output::print_success(&format!("Set {} = {} ({})", key, value, path.display()));
        }
    }

    Ok(())
}
