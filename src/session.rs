//! The prompt loop: read a card number, look it up, merge it into the archive, repeat.

use {
    std::{
        io::prelude::*,
        num::NonZeroU32
    },
    log::{info, warn},
    crate::{
        ArchiveStore,
        CardSource,
        Error
    }
};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Number(NonZeroU32),
    Invalid(String)
}

pub fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        Line::Blank
    } else if let Ok(number) = line.parse() {
        Line::Number(number)
    } else {
        Line::Invalid(line.to_owned())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub added: usize,
    /// Lines that were not card numbers.
    pub skipped: usize,
    /// Card numbers the lookup could not resolve.
    pub failed: usize
}

/// Runs the interactive loop until a blank line or end of input.
///
/// Unparseable lines and failed lookups are logged and skipped. Archive errors end the session and are
/// returned, since continuing could lose cards the user believes were recorded.
pub fn run<R: BufRead, W: Write>(set_code: &str, mut input: R, mut output: W, source: &impl CardSource, store: &ArchiveStore) -> Result<Summary, Error> {
    let mut summary = Summary::default();
    let mut buf = String::new();
    loop {
        write!(output, "Enter card number for set {}: ", set_code)?;
        output.flush()?;
        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            writeln!(output)?;
            break
        }
        let number = match parse_line(&buf) {
            Line::Blank => break,
            Line::Number(number) => number,
            Line::Invalid(line) => {
                warn!("could not parse {:?} into a card number, skipping", line);
                summary.skipped += 1;
                continue
            }
        };
        let card = match source.lookup(set_code, number) {
            Ok(card) => card,
            Err(e) => {
                warn!("could not obtain {} #{} from Scryfall, skipping: {}", set_code, number, e);
                summary.failed += 1;
                continue
            }
        };
        let mut message = format!("Added {} to collection!", card.name);
        let prices = card.prices.clone();
        let merged = store.merge_and_persist(card)?;
        summary.added += 1;
        if merged.copies > 1 {
            message.push_str(&format!(" ({} in this collection)", merged.copies));
        }
        if let Some(prices) = prices.filter(|prices| prices.eur.is_some() || prices.usd.is_some()) {
            message.push_str(&format!(" {}", prices));
        }
        writeln!(output, "{}", message)?;
    }
    writeln!(output, "Empty input received, exiting...")?;
    info!("added {} cards to {} ({} lines skipped, {} lookups failed)", summary.added, store.path().display(), summary.skipped, summary.failed);
    Ok(summary)
}
