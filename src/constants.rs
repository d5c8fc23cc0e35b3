//! Centralized constants for the puzzle grid, UI sizing, and colors.

use eframe::egui::Color32;

// =============================================================================
// GRID SHAPE
// =============================================================================

/// Number of tile columns the source image is sliced into.
pub const GRID_COLS: usize = 4;

/// Number of tile rows the source image is sliced into.
pub const GRID_ROWS: usize = 3;

/// Total number of tiles on the board.
pub const TILE_COUNT: usize = GRID_COLS * GRID_ROWS;

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

/// Initial window width when the application starts.
pub const INITIAL_WINDOW_WIDTH: f32 = 900.0;

/// Initial window height when the application starts.
pub const INITIAL_WINDOW_HEIGHT: f32 = 700.0;

// =============================================================================
// BOARD LAYOUT CONSTANTS
// =============================================================================

/// Spacing between the panel edges and the board.
pub const BOARD_PADDING: f32 = 24.0;

/// Gap between adjacent tiles.
pub const TILE_GAP: f32 = 6.0;

/// Corner radius for tile rectangles.
pub const TILE_CORNER_RADIUS: f32 = 4.0;

/// Vertical space reserved under the board for the status banner.
pub const BANNER_HEIGHT: f32 = 48.0;

/// Minimum on-screen tile edge so the board stays interactable in tiny windows.
pub const MIN_TILE_EDGE: f32 = 16.0;

/// Stroke width for the drop-target highlight.
pub const DROP_TARGET_STROKE_WIDTH: f32 = 2.0;

// =============================================================================
// TOOLBAR CONSTANTS
// =============================================================================

/// Spacing at the start of the toolbar.
pub const TOOLBAR_START_SPACING: f32 = 8.0;

/// Size of toolbar button icons.
pub const TOOLBAR_ICON_SIZE: f32 = 24.0;

/// Minimum size for toolbar buttons.
pub const TOOLBAR_BUTTON_SIZE: f32 = 32.0;

// =============================================================================
// COLORS
// =============================================================================

/// Background color for the toolbar.
pub const COLOR_TOOLBAR_BG: Color32 = Color32::from_rgb(30, 30, 30);

/// Fill for the slot a tile is being dragged away from.
pub const COLOR_EMPTY_SLOT: Color32 = Color32::from_rgb(50, 50, 50);

/// Highlight stroke for the slot a dragged tile would swap into.
pub const COLOR_DROP_TARGET: Color32 = Color32::from_rgb(110, 170, 255);

/// Color of the solved banner text.
pub const COLOR_SOLVED_TEXT: Color32 = Color32::from_rgb(90, 200, 90);

/// Color for load-failure messages.
pub const COLOR_ERROR_TEXT: Color32 = Color32::from_rgb(230, 90, 90);
