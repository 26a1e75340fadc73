//! Command-line shell: `food-rescue <command> [json-payload]`.
//!
//! Prints the command's JSON result on stdout, or the error DTO on stderr.

use food_rescue::commands::{dispatch, COMMANDS};
use food_rescue::{init_db, AppConfig, AppError};
use serde_json::Value;
use std::process::ExitCode;

fn run(command: &str, payload: Option<&str>) -> Result<Value, AppError> {
    let payload = match payload {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("payload is not JSON: {}", e)))?,
        None => Value::Null,
    };
    let config = AppConfig::from_env()?;
    let pool = init_db(&config)?;
    dispatch(&pool, command, payload)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("usage: food-rescue <command> [json-payload]");
        eprintln!("commands: {}", COMMANDS.join(", "));
        return ExitCode::from(2);
    };

    match run(command, args.get(1).map(String::as_str)) {
        Ok(value) => {
            match serde_json::to_string_pretty(&value) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    log::error!("cannot render result: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{} failed: {}", command, e);
            match serde_json::to_string(&e) {
                Ok(s) => eprintln!("{}", s),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}
