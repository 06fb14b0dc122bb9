//! Read-only opening book plus the hard-coded opening rules used before it.
//!
//! # File format
//!
//! Little-endian, 16-byte records:
//!
//! | bytes  | field                        |
//! |--------|------------------------------|
//! | 0..8   | fingerprint (`u64`)          |
//! | 8      | recommended column (`u8`)    |
//! | 9      | recorded outcome (`u8`)      |
//! | 10     | recorded search depth (`u8`) |
//! | 11     | reserved                     |
//! | 12..16 | padding                      |
//!
//! A file may start with a header occupying one record slot: the magic
//! `C4OB`, a `u32` version, a `u32` record count and four reserved bytes.
//! Headerless files are read as a flat record sequence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BookError;
use crate::game::{Board, Player, CENTER, COLS};

use super::state_encoding::fingerprint;

pub const RECORD_SIZE: usize = 16;
pub const BOOK_MAGIC: [u8; 4] = *b"C4OB";
pub const BOOK_VERSION: u32 = 1;

/// Opening rules only apply while fewer than this many pieces are down.
const OPENING_RULE_PLIES: usize = 4;

/// Opening book settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub path: Option<PathBuf>,
    /// Book lookups stop once the board holds more pieces than this.
    pub max_ply: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        BookConfig {
            path: None,
            max_ply: 24,
        }
    }
}

/// Game result recorded next to a book move, from the mover's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    Unknown = 0,
    Win = 1,
    Draw = 2,
    Loss = 3,
}

impl TryFrom<u8> for BookOutcome {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BookOutcome::Unknown),
            1 => Ok(BookOutcome::Win),
            2 => Ok(BookOutcome::Draw),
            3 => Ok(BookOutcome::Loss),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    pub fingerprint: u64,
    pub column: u8,
    pub outcome: BookOutcome,
    pub depth: u8,
}

impl BookEntry {
    fn decode(index: usize, record: &[u8]) -> Result<Self, BookError> {
        let mut key = [0u8; 8];
        key.copy_from_slice(&record[..8]);

        let column = record[8];
        if column as usize >= COLS {
            return Err(BookError::InvalidRecord {
                index,
                reason: format!("column {column} out of range"),
            });
        }
        let outcome = BookOutcome::try_from(record[9]).map_err(|raw| BookError::InvalidRecord {
            index,
            reason: format!("unknown outcome byte {raw}"),
        })?;

        Ok(BookEntry {
            fingerprint: u64::from_le_bytes(key),
            column,
            outcome,
            depth: record[10],
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.fingerprint.to_le_bytes());
        out.extend_from_slice(&[self.column, self.outcome as u8, self.depth, 0]);
        out.extend_from_slice(&[0; 4]);
    }
}

#[derive(Debug, Clone)]
pub struct OpeningBook {
    entries: Vec<BookEntry>,
    max_ply: u32,
}

impl OpeningBook {
    /// A book with no entries; lookups always miss.
    pub fn disabled() -> Self {
        OpeningBook {
            entries: Vec::new(),
            max_ply: BookConfig::default().max_ply,
        }
    }

    pub fn from_entries(entries: Vec<BookEntry>, max_ply: u32) -> Self {
        OpeningBook { entries, max_ply }
    }

    /// Parse a book image, rejecting anything that does not fit the format.
    pub fn from_bytes(bytes: &[u8], max_ply: u32) -> Result<Self, BookError> {
        if bytes.is_empty() {
            return Err(BookError::Empty);
        }
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(BookError::Misaligned {
                len: bytes.len(),
                record_size: RECORD_SIZE,
            });
        }

        let mut records = bytes.chunks_exact(RECORD_SIZE).peekable();
        if let Some(first) = records.peek() {
            if first[..4] == BOOK_MAGIC {
                let version = read_u32(&first[4..8]);
                if version != BOOK_VERSION {
                    return Err(BookError::UnsupportedVersion(version));
                }
                let declared = read_u32(&first[8..12]);
                let actual = bytes.len() / RECORD_SIZE - 1;
                if declared as usize != actual {
                    return Err(BookError::CountMismatch { declared, actual });
                }
                records.next();
            }
        }

        let entries = records
            .enumerate()
            .map(|(index, record)| BookEntry::decode(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OpeningBook { entries, max_ply })
    }

    pub fn load(path: &Path, max_ply: u32) -> Result<Self, BookError> {
        let bytes = fs::read(path).map_err(|e| BookError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(&bytes, max_ply)
    }

    /// Load the configured book, degrading to a disabled book on any failure.
    pub fn load_or_disabled(config: &BookConfig) -> Self {
        let Some(path) = &config.path else {
            return OpeningBook {
                max_ply: config.max_ply,
                ..Self::disabled()
            };
        };

        match Self::load(path, config.max_ply) {
            Ok(book) => {
                log::info!("loaded {} opening book entries from {}", book.len(), path.display());
                book
            }
            Err(e) => {
                log::warn!("opening book disabled: {e}");
                OpeningBook {
                    max_ply: config.max_ply,
                    ..Self::disabled()
                }
            }
        }
    }

    /// Serialize with a version header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.entries.len() + 1) * RECORD_SIZE);
        out.extend_from_slice(&BOOK_MAGIC);
        out.extend_from_slice(&BOOK_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        for entry in &self.entries {
            entry.encode(&mut out);
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<(), BookError> {
        fs::write(path, self.to_bytes()).map_err(|e| BookError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_ply(&self) -> u32 {
        self.max_ply
    }

    /// Book entry for `player` to move on `board`, if the position is early
    /// enough and recorded.
    pub fn lookup(&self, board: &Board, player: Player) -> Option<&BookEntry> {
        if self.entries.is_empty() || board.ply() > self.max_ply as usize {
            return None;
        }
        let key = fingerprint(board, player);
        self.entries.iter().find(|entry| entry.fingerprint == key)
    }

    /// Recommended column, provided it is legal on `board`.
    pub fn suggest(&self, board: &Board, player: Player) -> Option<usize> {
        self.lookup(board, player)
            .map(|entry| entry.column as usize)
            .filter(|&col| !board.is_column_full(col))
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Hand-coded opening preferences for the first few plies.
///
/// Take the center while it is empty, answer a center move in the center, and
/// otherwise mirror the opponent's last column.
pub fn opening_rule(board: &Board) -> Option<usize> {
    if board.ply() >= OPENING_RULE_PLIES {
        return None;
    }
    if board.height(CENTER) == 0 {
        return Some(CENTER);
    }

    let last = board.last_move()?;
    let reply = if last == CENTER { CENTER } else { COLS - 1 - last };
    (!board.is_column_full(reply)).then_some(reply)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn sample_board() -> Board {
        let mut board = Board::new();
        board.drop_piece(3, Cell::Red).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Red).unwrap();
        board
    }

    fn sample_book(max_ply: u32) -> OpeningBook {
        let board = sample_board();
        OpeningBook::from_entries(
            vec![
                BookEntry {
                    fingerprint: 0xDEAD_BEEF,
                    column: 0,
                    outcome: BookOutcome::Unknown,
                    depth: 3,
                },
                BookEntry {
                    fingerprint: fingerprint(&board, Player::Yellow),
                    column: 4,
                    outcome: BookOutcome::Draw,
                    depth: 12,
                },
            ],
            max_ply,
        )
    }

    #[test]
    fn test_lookup_finds_recorded_position() {
        let book = sample_book(24);
        let board = sample_board();
        let entry = book.lookup(&board, Player::Yellow).unwrap();
        assert_eq!(entry.column, 4);
        assert_eq!(entry.outcome, BookOutcome::Draw);
        assert_eq!(book.suggest(&board, Player::Yellow), Some(4));
        // Same board, other side to move: different key.
        assert!(book.lookup(&board, Player::Red).is_none());
    }

    #[test]
    fn test_lookup_respects_ply_cutoff() {
        let book = sample_book(2);
        assert!(book.lookup(&sample_board(), Player::Yellow).is_none());
    }

    #[test]
    fn test_suggest_skips_full_column() {
        let mut board = Board::new();
        for _ in 0..6 {
            board.drop_piece(4, Cell::Red).unwrap();
        }
        let book = OpeningBook::from_entries(
            vec![BookEntry {
                fingerprint: fingerprint(&board, Player::Yellow),
                column: 4,
                outcome: BookOutcome::Unknown,
                depth: 1,
            }],
            24,
        );
        assert!(book.lookup(&board, Player::Yellow).is_some());
        assert_eq!(book.suggest(&board, Player::Yellow), None);
    }

    #[test]
    fn test_file_roundtrip_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.bin");
        let book = sample_book(24);
        book.write_to(&path).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len() as usize, 3 * RECORD_SIZE);
        let loaded = OpeningBook::load(&path, 24).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.suggest(&sample_board(), Player::Yellow), Some(4));
    }

    #[test]
    fn test_headerless_records_are_accepted() {
        let book = sample_book(24);
        let bytes = book.to_bytes();
        let loaded = OpeningBook::from_bytes(&bytes[RECORD_SIZE..], 24).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_rejects_bad_images() {
        assert!(matches!(OpeningBook::from_bytes(&[], 24), Err(BookError::Empty)));
        assert!(matches!(
            OpeningBook::from_bytes(&[0u8; 20], 24),
            Err(BookError::Misaligned { len: 20, .. })
        ));

        let mut bytes = sample_book(24).to_bytes();
        bytes[4] = 9;
        assert!(matches!(
            OpeningBook::from_bytes(&bytes, 24),
            Err(BookError::UnsupportedVersion(9))
        ));

        let mut bytes = sample_book(24).to_bytes();
        bytes[8] = 5;
        assert!(matches!(
            OpeningBook::from_bytes(&bytes, 24),
            Err(BookError::CountMismatch { declared: 5, actual: 2 })
        ));

        let mut bytes = sample_book(24).to_bytes();
        bytes[RECORD_SIZE + 8] = 7;
        assert!(matches!(
            OpeningBook::from_bytes(&bytes, 24),
            Err(BookError::InvalidRecord { index: 0, .. })
        ));

        let mut bytes = sample_book(24).to_bytes();
        bytes[2 * RECORD_SIZE + 9] = 200;
        assert!(matches!(
            OpeningBook::from_bytes(&bytes, 24),
            Err(BookError::InvalidRecord { index: 1, .. })
        ));
    }

    #[test]
    fn test_load_failures_degrade_to_disabled() {
        let dir = tempfile::tempdir().unwrap();

        let missing = BookConfig {
            path: Some(dir.path().join("missing.bin")),
            max_ply: 10,
        };
        let book = OpeningBook::load_or_disabled(&missing);
        assert!(book.is_empty());
        assert_eq!(book.max_ply(), 10);

        let odd = dir.path().join("odd.bin");
        fs::write(&odd, [1u8; 33]).unwrap();
        let book = OpeningBook::load_or_disabled(&BookConfig {
            path: Some(odd),
            max_ply: 24,
        });
        assert!(book.is_empty());

        assert!(OpeningBook::load_or_disabled(&BookConfig::default()).is_empty());
    }

    #[test]
    fn test_opening_rules() {
        let mut board = Board::new();
        assert_eq!(opening_rule(&board), Some(CENTER));

        // Opponent opened off-center: center is still free.
        board.drop_piece(1, Cell::Red).unwrap();
        assert_eq!(opening_rule(&board), Some(CENTER));

        // Center taken, opponent's last move was column 1: mirror to 5.
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(1, Cell::Red).unwrap();
        assert_eq!(opening_rule(&board), Some(5));

        // Opponent answers in the center: stack on it.
        let mut board = Board::new();
        board.drop_piece(3, Cell::Red).unwrap();
        assert_eq!(opening_rule(&board), Some(CENTER));

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Red).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        assert_eq!(opening_rule(&board), None);
    }
}
