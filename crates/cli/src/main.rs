use std::process::ExitCode;

fn main() -> ExitCode {
    karat_cli::run()
}
