//! audithub CLI binary
//!
//! Minimal entrypoint; all logic is in the library and `cli::run()`.

fn main() {
    // cli::run() handles ALL output including errors
    if let Err(code) = audithub::cli::run() {
        std::process::exit(code.as_i32());
    }
}
