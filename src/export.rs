//! Plain-text exports of an archive for other collection tools.

use {
    std::str::FromStr,
    itertools::Itertools as _,
    crate::{
        Archive,
        Card
    }
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `COUNT NAME (SET) NUMBER`, as accepted by Arena, Moxfield et al.
    Deck,
    /// Moxfield's collection import CSV.
    Csv
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Format, String> {
        match &*s.to_ascii_lowercase() {
            "deck" => Ok(Format::Deck),
            "csv" => Ok(Format::Csv),
            _ => Err(format!("unknown export format {:?}, expected \"deck\" or \"csv\"", s))
        }
    }
}

pub fn export(archive: &Archive, format: Format) -> String {
    match format {
        Format::Deck => deck_list(archive),
        Format::Csv => moxfield_csv(archive)
    }
}

fn deck_list(archive: &Archive) -> String {
    archive.iter()
        .map(|card| {
            let mut line = format!("{} {} ({})", card.count, card.name, card.set.to_ascii_uppercase());
            if let Some(ref number) = card.collector_number {
                line.push(' ');
                line.push_str(number);
            }
            line + "\n"
        })
        .join("")
}

// https://moxfield.com/help/importing-collection
fn moxfield_csv(archive: &Archive) -> String {
    let mut output = String::from("\"Count\",\"Name\",\"Edition\",\"Collector Number\"\n");
    for card in archive.iter() {
        output.push_str(&csv_row(card));
        output.push('\n');
    }
    output
}

fn csv_row(card: &Card) -> String {
    [
        card.count.to_string(),
        card.name.clone(),
        card.set.to_ascii_lowercase(),
        card.collector_number.clone().unwrap_or_default()
    ].iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .join(",")
}
