use std::process::ExitCode;

fn main() -> ExitCode {
    foldbench::run()
}
