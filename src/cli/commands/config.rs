use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::Result;

pub fn execute(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let config_path = Config::create_sample()?;
            println!("Created sample config file at: {}", config_path.display());
            println!("\nPlease edit the file and set your backend details:");
            println!("  url = \"https://your-project.supabase.co\"");
            println!("  anon_key = \"...\"");
        }
        ConfigCommand::Path => {
            let config_path = Config::config_file_path()?;
            println!("Config file path: {}", config_path.display());

            if config_path.exists() {
                println!("Status: File exists");

                match Config::load() {
                    Ok(config) => {
                        println!("Valid: Yes");
                        match config.backend_config() {
                            Ok((url, _)) => {
                                println!("Complete: Yes");
                                println!("\nBackend:");
                                println!("  URL: {}", url);
                            }
                            Err(_) => println!("Complete: No (missing url or anon_key)"),
                        }
                        if let Some(path) = &config.store.profiles_file {
                            println!("Profiles file: {}", path.display());
                        }
                    }
                    Err(e) => {
                        println!("Valid: No");
                        println!("Error: {}", e);
                    }
                }
            } else {
                println!("Status: File does not exist");
                println!("\nTo create a sample config file, run:");
                println!("  agentdesk config init");
            }
        }
    }

    Ok(())
}
