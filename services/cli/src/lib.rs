mod cli;
mod commands;
mod infra;

use listing_desk::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
