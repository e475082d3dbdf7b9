use std::process::ExitCode;

fn main() -> ExitCode {
    finance_core::init();

    match finance_core::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
