use clap::{Arg, Command};
use shrmpl_conf::{Config, ConfigError, VarType};
use tracing::{debug, error};

// Operator tool: prints the whole table, or one key through the typed accessor
// a daemon would use, so a config can be checked before restarting the service.
#[tokio::main]
async fn main() {
    let matches = Command::new("shrmpl-conf-get")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .help("Path to config file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("key")
                .help("Key to look up; prints every entry when omitted")
                .index(2),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .short('t')
                .help("Accessor to read the key with")
                .value_parser(["bool", "string", "array", "integer"])
                .default_value("string"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("DEBUG, INFO, WARN or ERROR")
                .default_value("WARN"),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map(|s| s.to_uppercase())
        .unwrap_or_default();
    tracing_subscriber::fmt()
        .with_max_level(match log_level.as_str() {
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        })
        .with_writer(std::io::stderr)
        .init();

    // Both arguments are required or defaulted, so clap always provides them.
    let config_path = matches.get_one::<String>("config").unwrap();
    let var_type = match matches.get_one::<String>("type").map(String::as_str) {
        Some("bool") => VarType::Bool,
        Some("array") => VarType::Array,
        Some("integer") => VarType::Integer,
        _ => VarType::String,
    };

    let config = match Config::load_async(config_path).await {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load {}: {}", config_path, e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    debug!("Loaded {} entries from {}", config.len(), config_path);

    match matches.get_one::<String>("key") {
        Some(key) => {
            if let Err(e) = print_value(&config, key, var_type) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        None => {
            for line in dump(&config) {
                println!("{}", line);
            }
        }
    }
}

fn print_value(config: &Config, key: &str, var_type: VarType) -> Result<(), ConfigError> {
    match var_type {
        VarType::Bool => println!("{}", config.get_bool(key)?),
        VarType::String => println!("{}", config.get_string(key)?),
        VarType::Integer => println!("{}", config.get_integer(key)?),
        VarType::Array => {
            for item in config.get_array(key)? {
                println!("{}", item);
            }
        }
    }
    Ok(())
}

fn dump(config: &Config) -> Vec<String> {
    let mut entries: Vec<_> = config.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .map(|(key, value)| format!("{}\t{}\t{}", key, value.var_type(), value))
        .collect()
}
