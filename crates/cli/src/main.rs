use std::process::ExitCode;

fn main() -> ExitCode {
    snapactivate_cli::run()
}
