//! Deck list parsing.
//!
//! A deck list is plain text, one `<copies> <card name>` entry per line:
//!
//! ```text
//! 4 Forest\n
//! 2 Llanowar Elves\r\n   ← a CR before the newline ends the main deck
//! 1 Swamp\n              ← everything after it is sideboard
//! ```
//!
//! A line made of just `\r\n` (the blank separator some exporters write)
//! also ends the main deck. Every copy becomes its own [`Card`] with a
//! fresh id, so a `4 Forest` line produces four distinct cards.

use cardduel_protocol::Card;
use cardduel_session::CardIdAllocator;

use crate::DeckError;

/// Most copies a single line may ask for.
pub const MAX_COPIES: u32 = 1000;

/// Most cards a whole deck list may hold, main deck and sideboard together.
pub const MAX_DECK_CARDS: u32 = 1000;

/// A parsed deck list: main deck and sideboard, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub main: Vec<Card>,
    pub sideboard: Vec<Card>,
}

impl Deck {
    /// Total number of cards in both sections.
    pub fn len(&self) -> usize {
        self.main.len() + self.sideboard.len()
    }

    /// Returns `true` if the deck has no cards at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One parsed line, before any card exists.
struct Entry<'a> {
    copies: u32,
    name: &'a str,
    sideboard: bool,
}

/// Parses `text` into a [`Deck`], drawing card ids from `ids`.
///
/// Empty input is a valid, empty deck. The whole text is checked before
/// any card is built, so a rejected deck takes no ids from `ids`.
///
/// # Errors
/// - [`DeckError::InvalidCount`] if a line does not start with a number
///   no larger than [`MAX_COPIES`]
/// - [`DeckError::MissingName`] if nothing follows the number
/// - [`DeckError::TooManyCards`] if the deck adds up to more than
///   [`MAX_DECK_CARDS`]
/// - [`DeckError::OutOfCardIds`] if `ids` cannot cover every card
pub fn parse_deck(text: &str, ids: &mut CardIdAllocator) -> Result<Deck, DeckError> {
    let mut entries = Vec::new();
    let mut total: u32 = 0;
    let mut in_sideboard = false;

    for (index, raw) in text.split_inclusive('\n').enumerate() {
        let line_no = index + 1;
        let ends_with_crlf = raw.ends_with("\r\n");
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');

        // Bare "\r\n" separator line.
        if line.is_empty() && ends_with_crlf {
            in_sideboard = true;
            continue;
        }

        let (copies, name) = parse_line(line, line_no)?;
        total = total
            .checked_add(copies)
            .filter(|total| *total <= MAX_DECK_CARDS)
            .ok_or(DeckError::TooManyCards { max: MAX_DECK_CARDS })?;
        entries.push(Entry {
            copies,
            name,
            sideboard: in_sideboard,
        });

        if ends_with_crlf {
            in_sideboard = true;
        }
    }

    let mut fresh = ids.reserve(total).map_err(|_| DeckError::OutOfCardIds)?;
    let mut deck = Deck::default();
    for entry in entries {
        let section = if entry.sideboard {
            &mut deck.sideboard
        } else {
            &mut deck.main
        };
        section.extend(
            fresh
                .by_ref()
                .take(entry.copies as usize)
                .map(|id| Card::new(id, entry.name)),
        );
    }

    Ok(deck)
}

fn parse_line(line: &str, line_no: usize) -> Result<(u32, &str), DeckError> {
    let line = line.trim_start();
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    let copies = line[..digits]
        .parse::<u32>()
        .ok()
        .filter(|copies| *copies <= MAX_COPIES)
        .ok_or(DeckError::InvalidCount { line: line_no })?;

    let name = line[digits..].trim();
    if name.is_empty() {
        return Err(DeckError::MissingName { line: line_no });
    }
    Ok((copies, name))
}

/// Groups consecutive cards with the same title, for log summaries.
pub fn summarize(cards: &[Card]) -> Vec<(&str, usize)> {
    let mut summary: Vec<(&str, usize)> = Vec::new();
    for card in cards {
        match summary.last_mut() {
            Some((title, count)) if *title == card.title => *count += 1,
            _ => summary.push((card.title.as_str(), 1)),
        }
    }
    summary
}
