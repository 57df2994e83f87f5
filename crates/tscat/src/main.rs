#![forbid(unsafe_code)]

use clap::Parser;

fn main() {
    let cli = tscat::cli::Cli::parse();
    let json = cli.json;
    if let Err(error) = tscat::cli::run(cli) {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("tscat: {error}");
        }
        std::process::exit(error.exit_code());
    }
}
