use crate::game::{Board, Cell, Player, COLS, ROWS};

const OWN_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;
const MASK_MULTIPLIER: u64 = 0xC2B2_AE3D_27D4_EB4F;
const FOLD_MULTIPLIER: u64 = 0xFF51_AFD7_ED55_8CCD;

/// Player-relative bit encoding of a position.
///
/// Bit `col * ROWS + row` is set for each occupied square, so every word uses
/// the low 42 bits. `own` holds the pieces of the player the encoding was built
/// for (normally the side to move), `opponent` the other colour and `mask` the
/// union of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedPosition {
    pub own: u64,
    pub opponent: u64,
    pub mask: u64,
}

impl EncodedPosition {
    pub fn new(board: &Board, player: Player) -> Self {
        let own_cell = player.to_cell();
        let mut own = 0u64;
        let mut opponent = 0u64;

        for col in 0..COLS {
            for row in 0..board.height(col) {
                let bit = 1u64 << square_index(row, col);
                match board.get(row, col) {
                    c if c == own_cell => own |= bit,
                    Cell::Empty => {}
                    _ => opponent |= bit,
                }
            }
        }

        EncodedPosition {
            own,
            opponent,
            mask: own | opponent,
        }
    }

    /// 64-bit key shared by the transposition cache and the opening book.
    pub fn fingerprint(&self) -> u64 {
        let mut h = self.own.wrapping_mul(OWN_MULTIPLIER) ^ self.mask.wrapping_mul(MASK_MULTIPLIER);
        h ^= h >> 33;
        h = h.wrapping_mul(FOLD_MULTIPLIER);
        h ^= h >> 33;
        h
    }
}

/// Fingerprint of `board` from `player`'s point of view.
pub fn fingerprint(board: &Board, player: Player) -> u64 {
    EncodedPosition::new(board, player).fingerprint()
}

fn square_index(row: usize, col: usize) -> usize {
    col * ROWS + row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_encoding() {
        let enc = EncodedPosition::new(&Board::new(), Player::Red);
        assert_eq!(enc, EncodedPosition { own: 0, opponent: 0, mask: 0 });
    }

    #[test]
    fn test_encoding_is_player_relative() {
        let mut board = Board::new();
        board.drop_piece(3, Cell::Red).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();

        let red = EncodedPosition::new(&board, Player::Red);
        let yellow = EncodedPosition::new(&board, Player::Yellow);
        assert_eq!(red.own, 1 << square_index(0, 3));
        assert_eq!(red.opponent, 1 << square_index(1, 3));
        assert_eq!(red.own, yellow.opponent);
        assert_eq!(red.mask, yellow.mask);
        assert_ne!(red.fingerprint(), yellow.fingerprint());
    }

    #[test]
    fn test_encoding_fits_in_42_bits() {
        let mut board = Board::new();
        for col in 0..COLS {
            for row in 0..ROWS {
                let cell = if (row + col) % 2 == 0 { Cell::Red } else { Cell::Yellow };
                board.drop_piece(col, cell).unwrap();
            }
        }
        let enc = EncodedPosition::new(&board, Player::Yellow);
        assert_eq!(enc.mask, (1u64 << 42) - 1);
        assert_eq!(enc.own & enc.opponent, 0);
    }

    #[test]
    fn test_transpositions_share_a_fingerprint() {
        let mut a = Board::new();
        a.drop_piece(2, Cell::Red).unwrap();
        a.drop_piece(4, Cell::Yellow).unwrap();
        a.drop_piece(3, Cell::Red).unwrap();

        let mut b = Board::new();
        b.drop_piece(3, Cell::Red).unwrap();
        b.drop_piece(4, Cell::Yellow).unwrap();
        b.drop_piece(2, Cell::Red).unwrap();

        assert_eq!(fingerprint(&a, Player::Yellow), fingerprint(&b, Player::Yellow));
    }

    #[test]
    fn test_different_positions_differ() {
        let mut a = Board::new();
        a.drop_piece(0, Cell::Red).unwrap();
        let mut b = Board::new();
        b.drop_piece(6, Cell::Red).unwrap();
        assert_ne!(fingerprint(&a, Player::Yellow), fingerprint(&b, Player::Yellow));
    }
}
