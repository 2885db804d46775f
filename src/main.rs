#![deny(rust_2018_idioms, unused, unused_import_braces, unused_qualifications, warnings)]

use {
    std::{
        io,
        path::PathBuf,
        process
    },
    clap::Parser,
    log::error,
    crackathon::{
        scryfall::{self, Scryfall},
        session,
        ArchiveStore,
        Error
    }
};

/// Add cards to your Magic collection by collector number.
#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// Set code of the cards you are about to enter, e.g. DSK
    set_code: String,
    /// Archive file to add cards to [default: ~/grimoire/mtg-archive.json]
    #[clap(long, env = "CRACKATHON_ARCHIVE")]
    archive: Option<PathBuf>,
    /// Root URL of the Scryfall API
    #[clap(long, env = "CRACKATHON_API_ROOT", default_value = scryfall::API_ROOT)]
    api_root: String
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let set_code = args.set_code.to_uppercase();
    let store = match args.archive {
        Some(path) => ArchiveStore::new(path),
        None => ArchiveStore::open_default()?
    };
    let scryfall = Scryfall::new(&args.api_root)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    session::run(&set_code, stdin.lock(), stdout.lock(), &scryfall, &store)?;
    Ok(())
}
