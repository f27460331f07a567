use std::process::exit;

use records_api::config;

use crate::cli::ConfigCommand;

fn list_and_exit() {
    println!(
        "Configuration file {}:\n",
        config::configuration_file().to_string_lossy()
    );

    match config::load().and_then(|cfg| config::to_toml_string(&cfg)) {
        Ok(toml_as_string) => println!("{toml_as_string}"),
        Err(_) => {
            println!("Config file does not exist or is empty. Use 'config update --url' to create it");
        }
    }
    exit(0);
}

pub fn execute(cmd: ConfigCommand) {
    match cmd {
        ConfigCommand::List => list_and_exit(),
        ConfigCommand::Update(update) => {
            let mut client_config = match config::load_or_default() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!(
                        "ERROR: Unable to load configuration file {}, reason:{}",
                        config::configuration_file().to_string_lossy(),
                        e
                    );
                    exit(4);
                }
            };
            client_config.server.url = update.url;
            if let Err(e) = config::save(&client_config) {
                eprintln!("ERROR: Unable to save the configuration: {e}");
                exit(4);
            }
            println!(
                "Configuration saved to {}",
                config::configuration_file().to_string_lossy()
            );
        }
        ConfigCommand::Remove => match config::remove() {
            Ok(()) => {
                println!(
                    "Configuration file {} removed",
                    config::configuration_file().to_string_lossy()
                );
            }
            Err(e) => {
                println!(
                    "ERROR:Unable to remove configuration file {} : {}",
                    config::configuration_file().to_string_lossy(),
                    e
                );
            }
        },
    }
}
