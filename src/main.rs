use std::process::ExitCode;

fn main() -> ExitCode {
    match feedreader_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("feedreader: {error}");
            ExitCode::FAILURE
        }
    }
}
