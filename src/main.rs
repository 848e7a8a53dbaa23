//! estimator CLI binary
//!
//! All logic is in the library; main.rs loads `.env` and invokes cli::run().

fn main() {
    // Missing .env is the normal case.
    let _ = dotenvy::dotenv();

    // cli::run() handles ALL output including errors
    if let Err(code) = estimator::cli::run() {
        std::process::exit(code.as_i32());
    }
}
