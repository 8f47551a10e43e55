use crate::sizes::macos_iconset;
use std::process::ExitCode;

pub fn run() -> ExitCode {
    println!("{:>6}  {}", "PIXELS", "FILENAME");
    for size in macos_iconset() {
        println!("{:>6}  {}", size.pixels, size.filename);
    }
    ExitCode::SUCCESS
}
