//! Interactive Magic: The Gathering collection tracker.
//!
//! Card numbers are resolved against Scryfall and merged into a JSON archive keyed by set code.

#![deny(rust_2018_idioms, unused, unused_import_braces, unused_qualifications, warnings)]

use {
    std::{
        fmt,
        io,
        path::PathBuf
    },
    derive_more::From
};

pub mod archive;
pub mod card;
pub mod export;
pub mod scryfall;
pub mod session;

pub use crate::{
    archive::{Archive, ArchiveStore, Merged},
    card::{Card, Prices},
    scryfall::{CardSource, Scryfall}
};

#[derive(Debug, From)]
pub enum Error {
    /// The lookup service answered with a non-success status.
    #[from(ignore)]
    Api {
        status: u16,
        details: String
    },
    /// The archive file exists but is not a valid archive.
    #[from(ignore)]
    ArchiveParse(serde_json::Error, PathBuf),
    /// A lookup response body that is not a card.
    #[from(ignore)]
    Decode(serde_json::Error),
    #[from(ignore)]
    Io(io::Error, Option<PathBuf>),
    Json(serde_json::Error),
    #[from(ignore)]
    MissingHomeDir,
    /// The lookup request could not be completed.
    Transport(reqwest::Error),
    UrlParse(url::ParseError)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api { status, details } => write!(f, "Scryfall returned status {}: {}", status, details),
            Error::ArchiveParse(e, path) => write!(f, "archive at {} is not valid JSON: {}", path.display(), e),
            Error::Decode(e) => write!(f, "can't deserialize card from Scryfall response: {}", e),
            Error::Io(e, Some(path)) => write!(f, "I/O error at {}: {}", path.display(), e),
            Error::Io(e, None) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "can't serialize archive: {}", e),
            Error::MissingHomeDir => write!(f, "can't determine the user's home directory"),
            Error::Transport(e) => write!(f, "can't retrieve card from Scryfall: {}", e),
            Error::UrlParse(e) => write!(f, "invalid URL: {}", e)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ArchiveParse(e, _) | Error::Decode(e) | Error::Json(e) => Some(e),
            Error::Io(e, _) => Some(e),
            Error::Transport(e) => Some(e),
            Error::UrlParse(e) => Some(e),
            Error::Api { .. } | Error::MissingHomeDir => None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        e.at_unknown()
    }
}

pub trait IoResultExt {
    type T;

    fn at(self, path: impl AsRef<std::path::Path>) -> Self::T;
    fn at_unknown(self) -> Self::T;
}

impl IoResultExt for io::Error {
    type T = Error;

    fn at(self, path: impl AsRef<std::path::Path>) -> Error {
        Error::Io(self, Some(path.as_ref().to_owned()))
    }

    fn at_unknown(self) -> Error {
        Error::Io(self, None)
    }
}

impl<T, E: IoResultExt> IoResultExt for Result<T, E> {
    type T = Result<T, E::T>;

    fn at(self, path: impl AsRef<std::path::Path>) -> Result<T, E::T> {
        self.map_err(|e| e.at(path))
    }

    fn at_unknown(self) -> Result<T, E::T> {
        self.map_err(|e| e.at_unknown())
    }
}
