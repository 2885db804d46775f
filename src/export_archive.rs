//! Writes the collection archive as a deck list or Moxfield CSV.

#![deny(rust_2018_idioms, unused, unused_import_braces, unused_qualifications, warnings)]

use {
    std::{
        fs,
        path::PathBuf,
        process
    },
    clap::Parser,
    log::{error, info},
    crackathon::{
        export::{self, Format},
        ArchiveStore,
        Error,
        IoResultExt as _
    }
};

#[derive(Parser)]
#[clap(version, about = "Export the collection archive for use in other tools.")]
struct Args {
    /// Archive file to read [default: ~/grimoire/mtg-archive.json]
    #[clap(long, env = "CRACKATHON_ARCHIVE")]
    archive: Option<PathBuf>,
    /// Export format: deck or csv
    #[clap(short, long, default_value = "deck")]
    format: Format,
    /// File to write to instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Only print the path of the archive and exit
    #[clap(long)]
    print_path: bool
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
    let store = match args.archive {
        Some(path) => ArchiveStore::new(path),
        None => ArchiveStore::open_default()?
    };
    if args.print_path {
        println!("{}", store.path().display());
        return Ok(())
    }
    let output = export::export(&store.load()?, args.format);
    match args.output {
        Some(path) => {
            fs::write(&path, output).at(&path)?;
            info!("wrote export to {}", path.display());
        }
        None => print!("{}", output)
    }
    Ok(())
}
