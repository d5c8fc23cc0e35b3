//! Puzzle board: tile generation, shuffling, swapping, and the solved check.
//!
//! A board is the ordered sequence of tiles cut from one source image. The
//! positional index into the sequence is the tile's *current* slot; each
//! tile remembers the *home* slot it was cut from. Swaps permute slots and
//! never create, destroy, or duplicate tiles.

use image::imageops;
use image::RgbaImage;
use rand::seq::SliceRandom;
use rand::Rng;

/// One rectangular sub-image cut from the source on the fixed grid.
///
/// The pixel data is an independent snapshot taken at generation time, so a
/// tile stays valid after the source image is dropped.
pub struct Tile {
    original_index: usize,
    image: RgbaImage,
}

impl Tile {
    /// The home slot this tile occupies when the puzzle is solved. Assigned
    /// at generation time and immutable afterwards.
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// The full ordered sequence of tiles representing current puzzle state.
pub struct Board {
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// Slices `source` into a `cols` x `rows` grid of tiles in original
    /// order. Tile dimensions are `width / cols` x `height / rows`; a
    /// remainder that does not divide evenly is cropped off the right and
    /// bottom edges.
    ///
    /// Home slots are numbered column-major: the tile cut from grid cell
    /// `(col, row)` gets `original_index = col * rows + row`.
    pub fn from_image(source: &RgbaImage, cols: usize, rows: usize) -> Result<Self, String> {
        if cols == 0 || rows == 0 {
            return Err(format!("Grid shape {cols}x{rows} has no cells"));
        }

        let tile_width = source.width() / cols as u32;
        let tile_height = source.height() / rows as u32;
        if tile_width == 0 || tile_height == 0 {
            return Err(format!(
                "{}x{} image is too small for a {cols}x{rows} grid",
                source.width(),
                source.height()
            ));
        }

        let mut tiles = Vec::with_capacity(cols * rows);
        for col in 0..cols {
            for row in 0..rows {
                let region = imageops::crop_imm(
                    source,
                    col as u32 * tile_width,
                    row as u32 * tile_height,
                    tile_width,
                    tile_height,
                );
                tiles.push(Tile {
                    original_index: col * rows + row,
                    image: region.to_image(),
                });
            }
        }

        Ok(Self { cols, rows, tiles })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The tile currently occupying `slot`, or `None` if out of range.
    pub fn tile(&self, slot: usize) -> Option<&Tile> {
        self.tiles.get(slot)
    }

    /// Pixel dimensions shared by every tile on this board.
    pub fn tile_size(&self) -> (u32, u32) {
        let image = self.tiles[0].image();
        (image.width(), image.height())
    }

    /// Uniformly permutes the tile order (Fisher-Yates via `SliceRandom`).
    /// The RNG is injected so callers can seed it.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles.shuffle(rng);
    }

    /// Swaps the tiles in slots `a` and `b`. Returns whether the board
    /// changed; `a == b` and out-of-range slots are no-ops.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.tiles.len() || b >= self.tiles.len() {
            return false;
        }
        self.tiles.swap(a, b);
        true
    }

    /// True iff every slot holds its home tile. Derived from the current
    /// ordering, never cached.
    pub fn is_solved(&self) -> bool {
        self.tiles
            .iter()
            .enumerate()
            .all(|(slot, tile)| tile.original_index == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GRID_COLS, GRID_ROWS, TILE_COUNT};
    use image::{Rgba, RgbaImage};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Builds a source image where every grid cell is filled with a color
    /// encoding its column-major cell index in the red channel.
    fn cell_coded_image(cols: usize, rows: usize, tile_w: u32, tile_h: u32) -> RgbaImage {
        let mut image = RgbaImage::new(cols as u32 * tile_w, rows as u32 * tile_h);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let col = (x / tile_w) as usize;
            let row = (y / tile_h) as usize;
            let index = (col * rows + row) as u8;
            *pixel = Rgba([index, 0, 0, 255]);
        }
        image
    }

    fn test_board() -> Board {
        let source = cell_coded_image(GRID_COLS, GRID_ROWS, 8, 6);
        Board::from_image(&source, GRID_COLS, GRID_ROWS).unwrap()
    }

    fn home_indices(board: &Board) -> Vec<usize> {
        board.tiles().iter().map(|t| t.original_index()).collect()
    }

    #[test]
    fn generates_one_tile_per_home_slot() {
        let board = test_board();
        assert_eq!(board.len(), TILE_COUNT);
        assert_eq!(home_indices(&board), (0..TILE_COUNT).collect::<Vec<_>>());
        assert_eq!(board.tile_size(), (8, 6));
    }

    #[test]
    fn tiles_snapshot_their_home_region() {
        let board = test_board();
        for tile in board.tiles() {
            let expected = tile.original_index() as u8;
            assert!(
                tile.image().pixels().all(|p| p.0 == [expected, 0, 0, 255]),
                "tile {} does not match its home cell",
                tile.original_index()
            );
        }
    }

    #[test]
    fn tiles_reassemble_into_the_source() {
        let source = cell_coded_image(GRID_COLS, GRID_ROWS, 8, 6);
        let board = Board::from_image(&source, GRID_COLS, GRID_ROWS).unwrap();
        let (tile_w, tile_h) = board.tile_size();

        let mut recomposed = RgbaImage::new(source.width(), source.height());
        for tile in board.tiles() {
            let col = (tile.original_index() / GRID_ROWS) as u32;
            let row = (tile.original_index() % GRID_ROWS) as u32;
            imageops::replace(
                &mut recomposed,
                tile.image(),
                (col * tile_w) as i64,
                (row * tile_h) as i64,
            );
        }
        assert_eq!(recomposed.as_raw(), source.as_raw());
    }

    #[test]
    fn non_divisible_dimensions_are_cropped() {
        // 9x7 over a 4x3 grid: 2x2 tiles, one pixel column and row dropped.
        let source = RgbaImage::from_pixel(9, 7, Rgba([1, 2, 3, 255]));
        let board = Board::from_image(&source, GRID_COLS, GRID_ROWS).unwrap();
        assert_eq!(board.len(), TILE_COUNT);
        assert_eq!(board.tile_size(), (2, 2));
    }

    #[test]
    fn rejects_images_smaller_than_the_grid() {
        let source = RgbaImage::new(3, 2);
        assert!(Board::from_image(&source, GRID_COLS, GRID_ROWS).is_err());
    }

    #[test]
    fn rejects_empty_grid_shapes() {
        let source = RgbaImage::new(8, 8);
        assert!(Board::from_image(&source, 0, 3).is_err());
        assert!(Board::from_image(&source, 4, 0).is_err());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut board = test_board();
        let mut rng = Pcg32::seed_from_u64(7);
        board.shuffle(&mut rng);

        let mut indices = home_indices(&board);
        indices.sort_unstable();
        assert_eq!(indices, (0..TILE_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn swap_then_swap_back_solves() {
        let mut board = test_board();
        assert!(board.is_solved());

        assert!(board.swap(0, 1));
        assert_eq!(board.tile(0).unwrap().original_index(), 1);
        assert_eq!(board.tile(1).unwrap().original_index(), 0);
        assert!(!board.is_solved());

        assert!(board.swap(0, 1));
        assert!(board.is_solved());
    }

    #[test]
    fn swap_with_same_slot_is_a_noop() {
        let mut board = test_board();
        assert!(!board.swap(5, 5));
        assert_eq!(home_indices(&board), (0..TILE_COUNT).collect::<Vec<_>>());
        assert!(board.is_solved());
    }

    #[test]
    fn swap_out_of_range_is_a_noop() {
        let mut board = test_board();
        assert!(!board.swap(0, TILE_COUNT));
        assert!(!board.swap(TILE_COUNT, 0));
        assert!(board.is_solved());
    }

    #[test]
    fn one_misplaced_pair_is_unsolved() {
        let mut board = test_board();
        board.swap(3, 9);
        assert!(!board.is_solved());
    }

    #[test]
    fn fully_reversed_board_is_unsolved() {
        let mut board = test_board();
        for i in 0..TILE_COUNT / 2 {
            board.swap(i, TILE_COUNT - 1 - i);
        }
        assert!(!board.is_solved());
        assert_eq!(board.tile(0).unwrap().original_index(), TILE_COUNT - 1);
    }

    proptest! {
        #[test]
        fn swaps_never_lose_or_duplicate_tiles(
            swaps in prop::collection::vec((0..TILE_COUNT, 0..TILE_COUNT), 0..64)
        ) {
            let mut board = test_board();
            for (a, b) in swaps {
                board.swap(a, b);
            }
            let mut indices = home_indices(&board);
            indices.sort_unstable();
            prop_assert_eq!(indices, (0..TILE_COUNT).collect::<Vec<_>>());
        }

        #[test]
        fn shuffle_never_loses_or_duplicates_tiles(seed in any::<u64>()) {
            let mut board = test_board();
            let mut rng = Pcg32::seed_from_u64(seed);
            board.shuffle(&mut rng);
            let mut indices = home_indices(&board);
            indices.sort_unstable();
            prop_assert_eq!(indices, (0..TILE_COUNT).collect::<Vec<_>>());
        }

        #[test]
        fn solved_iff_every_slot_is_home(seed in any::<u64>()) {
            let mut board = test_board();
            let mut rng = Pcg32::seed_from_u64(seed);
            board.shuffle(&mut rng);
            let all_home = board
                .tiles()
                .iter()
                .enumerate()
                .all(|(slot, tile)| tile.original_index() == slot);
            prop_assert_eq!(board.is_solved(), all_home);
        }
    }
}
