use {
    std::{
        cell::RefCell,
        collections::HashMap,
        fs,
        io::Cursor,
        num::NonZeroU32
    },
    crackathon::{
        scryfall::decode_card,
        session::{self, Summary},
        ArchiveStore,
        Card,
        CardSource,
        Error
    },
    tempfile::TempDir
};

/// Serves canned Scryfall bodies and records every number it was asked for.
struct FakeScryfall {
    bodies: HashMap<u32, &'static str>,
    requests: RefCell<Vec<(String, u32)>>
}

impl FakeScryfall {
    fn new(bodies: &[(u32, &'static str)]) -> FakeScryfall {
        FakeScryfall {
            bodies: bodies.iter().copied().collect(),
            requests: RefCell::default()
        }
    }

    fn requested(&self) -> Vec<u32> {
        self.requests.borrow().iter().map(|(_, number)| *number).collect()
    }
}

impl CardSource for FakeScryfall {
    fn lookup(&self, set_code: &str, number: NonZeroU32) -> Result<Card, Error> {
        self.requests.borrow_mut().push((set_code.to_owned(), number.get()));
        match self.bodies.get(&number.get()) {
            Some(body) => decode_card(body),
            None => Err(Error::Api { status: 404, details: "No card found".to_owned() })
        }
    }
}

const FOO: &str = r#"{"object":"card","name":"Foo","set":"SET1","rarity":"common","collector_number":"1"}"#;
const BAR: &str = r#"{"object":"card","name":"Bar","set":"SET1","collector_number":"2"}"#;
const PRICED: &str = r#"{"object":"card","name":"Qux","set":"SET1","prices":{"usd":"0.30","usd_foil":"1.10","eur":"0.25","eur_foil":null}}"#;
const BROKEN: &str = r#"{"object":"card","set":"SET1"}"#;

fn store(dir: &TempDir) -> ArchiveStore {
    ArchiveStore::new(dir.path().join("mtg-archive.json"))
}

fn run(input: &str, source: &FakeScryfall, store: &ArchiveStore) -> (Result<Summary, Error>, String) {
    let mut output = Vec::new();
    let result = session::run("SET1", Cursor::new(input.to_owned()), &mut output, source, store);
    (result, String::from_utf8(output).expect("utf-8 output"))
}

#[test]
fn adds_cards_until_blank_line() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let scryfall = FakeScryfall::new(&[(1, FOO), (2, BAR)]);

    let (result, output) = run("1\n2\n1\n\n2\n", &scryfall, &store);

    assert_eq!(result.unwrap(), Summary { added: 3, skipped: 0, failed: 0 });
    assert_eq!(scryfall.requested(), vec![1, 2, 1]);
    assert!(output.contains("Enter card number for set SET1: "));
    assert!(output.contains("Added Foo to collection!\n"));
    assert!(output.contains("Added Bar to collection!\n"));
    assert!(output.contains("Added Foo to collection! (2 in this collection)\n"));

    let archive = store.load().unwrap();
    let cards = archive.cards("SET1");
    assert_eq!(cards.len(), 2);
    assert_eq!((cards[0].name.as_str(), cards[0].count), ("Foo", 2));
    assert_eq!((cards[1].name.as_str(), cards[1].count), ("Bar", 1));
}

#[test]
fn junk_lines_never_reach_lookup_or_archive() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let scryfall = FakeScryfall::new(&[(1, FOO)]);

    let (result, _) = run("abc\n0\n-1\n\n", &scryfall, &store);

    assert_eq!(result.unwrap(), Summary { added: 0, skipped: 3, failed: 0 });
    assert!(scryfall.requested().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn blank_line_ends_without_touching_archive() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let seeded = r#"{"SET1":[{"name":"Foo","set":"SET1","count":1}]}"#;
    fs::write(store.path(), seeded).unwrap();
    let scryfall = FakeScryfall::new(&[]);

    let (result, output) = run("  \n", &scryfall, &store);

    assert_eq!(result.unwrap(), Summary::default());
    assert!(scryfall.requested().is_empty());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), seeded);
    assert!(output.ends_with("Empty input received, exiting...\n"));
}

#[test]
fn end_of_input_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let scryfall = FakeScryfall::new(&[(1, FOO)]);

    let (result, _) = run("1", &scryfall, &store);

    assert_eq!(result.unwrap().added, 1);
    assert_eq!(store.load().unwrap().cards("SET1").len(), 1);
}

#[test]
fn failed_lookups_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let scryfall = FakeScryfall::new(&[(1, FOO), (3, BROKEN)]);

    let (result, output) = run("7\n3\n1\n\n", &scryfall, &store);

    assert_eq!(result.unwrap(), Summary { added: 1, skipped: 0, failed: 2 });
    assert_eq!(scryfall.requested(), vec![7, 3, 1]);
    assert!(!output.contains("Added Bar"));
    assert_eq!(store.load().unwrap().iter().count(), 1);
}

#[test]
fn corrupt_archive_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    fs::write(store.path(), "not json").unwrap();
    let scryfall = FakeScryfall::new(&[(1, FOO), (2, BAR)]);

    let (result, _) = run("1\n2\n\n", &scryfall, &store);

    assert!(matches!(result, Err(Error::ArchiveParse(..))));
    assert_eq!(scryfall.requested(), vec![1]);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "not json");
}

#[test]
fn cards_go_under_their_own_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    fs::write(store.path(), r#"{"SET1":[{"name":"Foo","set":"SET1","count":1}]}"#).unwrap();
    let scryfall = FakeScryfall::new(&[(5, r#"{"name":"Baz","set":"SET2"}"#)]);

    let (result, _) = run("5\n\n", &scryfall, &store);

    result.unwrap();
    let archive = store.load().unwrap();
    assert_eq!(archive.cards("SET1").len(), 1);
    assert_eq!(archive.cards("SET1")[0].name, "Foo");
    assert_eq!(archive.cards("SET2").len(), 1);
    assert_eq!(archive.cards("SET2")[0].count, 1);
}

#[test]
fn added_message_shows_prices_without_storing_them() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let scryfall = FakeScryfall::new(&[(4, PRICED)]);

    let (result, output) = run("4\n4\n\n", &scryfall, &store);

    assert_eq!(result.unwrap().added, 2);
    assert!(output.contains("Added Qux to collection! (0.25€ / $0.30)\n"));
    assert!(output.contains("Added Qux to collection! (2 in this collection) (0.25€ / $0.30)\n"));
    assert!(!fs::read_to_string(store.path()).unwrap().contains("prices"));
}
