//! The on-disk collection: a JSON object mapping set codes to the cards owned from that set.

use {
    std::{
        collections::BTreeMap,
        fs,
        io::{self, Write},
        path::{Path, PathBuf}
    },
    log::debug,
    serde::{Deserialize, Serialize},
    serde_json::ser::Formatter,
    crate::{
        Card,
        Error,
        IoResultExt as _
    }
};

const ARCHIVE_DIR: &str = "grimoire";
const ARCHIVE_FILE: &str = "mtg-archive.json";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Archive(pub BTreeMap<String, Vec<Card>>);

/// What happened to the archive when a card was merged into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merged {
    /// Copies of this card now in the archive.
    pub copies: u32,
    /// Whether the card got its own new entry, as opposed to bumping an existing one.
    pub new_entry: bool
}

impl Archive {
    /// Adds a card under its own set code.
    ///
    /// Cards are identified by exact name within a set: if the set already lists a card with this name,
    /// that entry's count grows by the incoming card's count and its position is kept. Otherwise the card
    /// is appended, creating the set's list if needed. Other sets are never touched.
    pub fn merge(&mut self, card: Card) -> Merged {
        let cards = self.0.entry(card.set.clone()).or_default();
        match cards.iter_mut().find(|owned| owned.name == card.name) {
            Some(owned) => {
                owned.count = owned.count.saturating_add(card.count);
                Merged { copies: owned.count, new_entry: false }
            }
            None => {
                let copies = card.count;
                cards.push(card);
                Merged { copies, new_entry: true }
            }
        }
    }

    pub fn cards(&self, set_code: &str) -> &[Card] {
        match self.0.get(set_code) {
            Some(cards) => cards,
            None => &[]
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.0.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Serializes the archive with one card object per line, so diffs of the file stay readable.
    pub fn render(&self) -> Result<Vec<u8>, Error> {
        let mut rendered = Vec::new();
        self.serialize(&mut serde_json::Serializer::with_formatter(&mut rendered, ArchiveFormatter::default()))?;
        rendered.push(b'\n');
        Ok(rendered)
    }
}

/// Lays out the top-level object one set per line and each set's array one card per line.
/// Anything nested deeper (the cards themselves) is written compactly.
#[derive(Default)]
struct ArchiveFormatter {
    /// One entry per open object or array: whether it has had any members yet.
    open: Vec<bool>
}

impl ArchiveFormatter {
    /// Marks the innermost container as non-empty and returns its depth, 1 being the archive object.
    fn member(&mut self) -> usize {
        if let Some(has_members) = self.open.last_mut() {
            *has_members = true;
        }
        self.open.len()
    }

    /// Closes the innermost container, returning its depth and whether it had members.
    fn close(&mut self) -> (usize, bool) {
        let depth = self.open.len();
        (depth, self.open.pop().unwrap_or(false))
    }
}

impl Formatter for ArchiveFormatter {
    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open.push(false);
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        match self.close() {
            (1, true) => writer.write_all(b"\n}"),
            _ => writer.write_all(b"}")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        match (self.member(), first) {
            (1, true) => writer.write_all(b"\n  "),
            (1, false) => writer.write_all(b",\n  "),
            (_, true) => Ok(()),
            (_, false) => writer.write_all(b",")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        match self.open.len() {
            1 => writer.write_all(b": "),
            _ => writer.write_all(b":")
        }
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open.push(false);
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        match self.close() {
            (2, true) => writer.write_all(b"\n  ]"),
            _ => writer.write_all(b"]")
        }
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        match (self.member(), first) {
            (2, true) => writer.write_all(b"\n    "),
            (2, false) => writer.write_all(b",\n    "),
            (_, true) => Ok(()),
            (_, false) => writer.write_all(b",")
        }
    }
}

/// `~/grimoire/mtg-archive.json`
pub fn default_path() -> Result<PathBuf, Error> {
    let home = dirs::home_dir().ok_or(Error::MissingHomeDir)?;
    Ok(home.join(ARCHIVE_DIR).join(ARCHIVE_FILE))
}

/// Owns every read-modify-write cycle on one archive file.
///
/// There is no locking: two processes merging into the same file race, and the last write wins.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    path: PathBuf
}

impl ArchiveStore {
    pub fn new(path: impl Into<PathBuf>) -> ArchiveStore {
        ArchiveStore { path: path.into() }
    }

    pub fn open_default() -> Result<ArchiveStore, Error> {
        Ok(ArchiveStore::new(default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole archive. A missing or blank file is an empty archive.
    pub fn load(&self) -> Result<Archive, Error> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no archive at {}, starting empty", self.path.display());
                return Ok(Archive::default())
            }
            Err(e) => return Err(e.at(&self.path))
        };
        if text.trim().is_empty() {
            return Ok(Archive::default())
        }
        serde_json::from_str(&text).map_err(|e| Error::ArchiveParse(e, self.path.clone()))
    }

    /// Replaces the archive file with `archive`.
    ///
    /// The new contents go to a temporary file next to the archive, which is then renamed over it. If the archive
    /// path is a symlink, the file it points to is replaced and the link is kept. The replaced file's permissions
    /// carry over to the new one.
    pub fn save(&self, archive: &Archive) -> Result<(), Error> {
        let rendered = archive.render()?;
        let target = match fs::canonicalize(&self.path) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.path.clone(),
            Err(e) => return Err(e.at(&self.path))
        };
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).at(parent)?;
            }
        }
        let temp_path = temp_path(&target);
        let replaced = fs::write(&temp_path, rendered).at(&temp_path)
            .and_then(|()| match fs::metadata(&target) {
                Ok(metadata) => fs::set_permissions(&temp_path, metadata.permissions()).at(&temp_path),
                Err(_) => Ok(())
            })
            .and_then(|()| fs::rename(&temp_path, &target).at(&target));
        if replaced.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        replaced?;
        debug!("wrote archive to {}", target.display());
        Ok(())
    }

    /// Loads the archive fresh from disk, merges `card` into it and writes it back in full.
    pub fn merge_and_persist(&self, card: Card) -> Result<Merged, Error> {
        let mut archive = self.load()?;
        let merged = archive.merge(card);
        self.save(&archive)?;
        Ok(merged)
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let mut file_name = target.file_name().map(ToOwned::to_owned).unwrap_or_else(|| ARCHIVE_FILE.into());
    file_name.push(".tmp");
    target.with_file_name(file_name)
}
