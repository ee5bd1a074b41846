mod cli;
mod handlers;

use anyhow::Result;

use handlers::Completion;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "bedmaker";
}

fn main() -> Result<()> {
    let app = cli::build_parser();
    let matches = app.get_matches();

    handlers::init_logging(&matches);

    match handlers::run_bedmaker(&matches)? {
        Completion::Completed => Ok(()),
        Completion::Aborted => {
            println!("Pipeline aborted.");
            std::process::exit(1);
        }
    }
}
