use std::process::ExitCode;

use spendbook::{
    cli::{run_cli, run_once},
    init,
};

fn main() -> ExitCode {
    init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = if args.is_empty() {
        run_cli().map(|()| true)
    } else {
        run_once(&args)
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
