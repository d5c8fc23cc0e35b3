mod board;
mod constants;
mod image_loader;

use board::Board;
use constants::{
    BANNER_HEIGHT, BOARD_PADDING, COLOR_DROP_TARGET, COLOR_EMPTY_SLOT, COLOR_ERROR_TEXT,
    COLOR_SOLVED_TEXT, COLOR_TOOLBAR_BG, DROP_TARGET_STROKE_WIDTH, GRID_COLS, GRID_ROWS,
    INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH, MIN_TILE_EDGE, TILE_CORNER_RADIUS, TILE_GAP,
    TOOLBAR_BUTTON_SIZE, TOOLBAR_ICON_SIZE, TOOLBAR_START_SPACING,
};
use eframe::egui::{
    self, Color32, PointerButton, Pos2, Rect, RichText, Rounding, Sense, Stroke, Vec2,
};
use egui::{pos2, vec2};
use image::RgbaImage;
use image_loader::{spawn_load, ImageLoadResponse};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Tile Scramble",
        options,
        Box::new(|_cc| Ok(Box::new(PuzzleApp::new()))),
    )
}

/// An in-progress tile drag: which slot was picked up and where inside the
/// tile the pointer grabbed it.
struct DragState {
    slot: usize,
    offset: Vec2,
}

/// A loaded puzzle: the board plus everything needed to draw and mutate it.
struct ReadyPuzzle {
    board: Board,
    /// Tile textures keyed by `original_index`; they follow the tile, not
    /// the slot, across swaps.
    textures: Vec<egui::TextureHandle>,
    solved: bool,
    source_path: PathBuf,
    drag: Option<DragState>,
}

enum Puzzle {
    /// No image supplied yet. Nothing to generate, nothing to show.
    Idle,
    Loading { path: PathBuf },
    Failed { message: String },
    Ready(ReadyPuzzle),
}

struct PuzzleApp {
    puzzle: Puzzle,
    /// Monotonic id of the latest load request; results tagged with an
    /// older generation are discarded.
    load_generation: u64,
    pending_load: Option<Receiver<ImageLoadResponse>>,
    texture_epoch: usize,
}

/// On-screen geometry of the board for one frame.
struct BoardLayout {
    origin: Pos2,
    tile_size: Vec2,
    cols: usize,
    rows: usize,
}

impl BoardLayout {
    /// Fits the board into `avail`, preserving tile aspect ratio and
    /// leaving room for the status banner below.
    fn fit(board: &Board, avail: Rect) -> Self {
        let cols = board.cols();
        let rows = board.rows();
        let (px_w, px_h) = board.tile_size();
        let tile_aspect = px_w as f32 / px_h as f32;

        let gaps_x = TILE_GAP * (cols as f32 - 1.0);
        let gaps_y = TILE_GAP * (rows as f32 - 1.0);
        let max_w =
            (avail.width() - BOARD_PADDING * 2.0 - gaps_x).max(MIN_TILE_EDGE * cols as f32);
        let max_h = (avail.height() - BOARD_PADDING * 2.0 - BANNER_HEIGHT - gaps_y)
            .max(MIN_TILE_EDGE * rows as f32);

        let tile_w = (max_w / cols as f32).min(max_h / rows as f32 * tile_aspect);
        let tile_size = vec2(tile_w, tile_w / tile_aspect);

        let board_width = tile_size.x * cols as f32 + gaps_x;
        let origin = pos2(
            avail.center().x - board_width * 0.5,
            avail.min.y + BOARD_PADDING,
        );

        Self {
            origin,
            tile_size,
            cols,
            rows,
        }
    }

    fn board_size(&self) -> Vec2 {
        vec2(
            self.tile_size.x * self.cols as f32 + TILE_GAP * (self.cols as f32 - 1.0),
            self.tile_size.y * self.rows as f32 + TILE_GAP * (self.rows as f32 - 1.0),
        )
    }

    /// Screen rect for a slot. Slots are numbered column-major to match the
    /// tiles' home numbering.
    fn slot_rect(&self, slot: usize) -> Rect {
        let col = (slot / self.rows) as f32;
        let row = (slot % self.rows) as f32;
        Rect::from_min_size(
            self.origin
                + vec2(
                    col * (self.tile_size.x + TILE_GAP),
                    row * (self.tile_size.y + TILE_GAP),
                ),
            self.tile_size,
        )
    }

    fn hit_slot(&self, pos: Pos2) -> Option<usize> {
        (0..self.cols * self.rows).find(|&slot| self.slot_rect(slot).contains(pos))
    }
}

impl PuzzleApp {
    fn new() -> Self {
        Self {
            puzzle: Puzzle::Idle,
            load_generation: 0,
            pending_load: None,
            texture_epoch: 0,
        }
    }

    fn open_image_dialog(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
            .pick_file()
        {
            self.request_load(ctx, path);
        }
    }

    fn request_load(&mut self, ctx: &egui::Context, path: PathBuf) {
        self.load_generation += 1;
        log::info!(
            "Loading {} (generation {})",
            path.display(),
            self.load_generation
        );
        self.pending_load = Some(spawn_load(path.clone(), self.load_generation, ctx.clone()));
        self.puzzle = Puzzle::Loading { path };
    }

    fn poll_pending_load(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.pending_load else {
            return;
        };
        match receiver.try_recv() {
            Ok(response) => {
                self.pending_load = None;
                if response.generation != self.load_generation {
                    log::debug!(
                        "Ignoring superseded load result (generation {})",
                        response.generation
                    );
                    return;
                }
                match response.result {
                    Ok((path, image)) => self.install_board(ctx, path, image),
                    Err(message) => {
                        log::error!("{message}");
                        self.puzzle = Puzzle::Failed { message };
                    }
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_load = None;
                self.puzzle = Puzzle::Failed {
                    message: "Image load worker exited unexpectedly".to_owned(),
                };
            }
        }
    }

    fn install_board(&mut self, ctx: &egui::Context, path: PathBuf, source: RgbaImage) {
        let mut board = match Board::from_image(&source, GRID_COLS, GRID_ROWS) {
            Ok(board) => board,
            Err(message) => {
                log::error!("{message}");
                self.puzzle = Puzzle::Failed { message };
                return;
            }
        };
        board.shuffle(&mut rand::thread_rng());

        let epoch = self.texture_epoch;
        self.texture_epoch += 1;
        let mut textures: Vec<Option<egui::TextureHandle>> =
            (0..board.len()).map(|_| None).collect();
        for tile in board.tiles() {
            let image = tile.image();
            let size = [image.width() as usize, image.height() as usize];
            let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            let handle = ctx.load_texture(
                format!("tile-{epoch}-{}", tile.original_index()),
                pixels,
                egui::TextureOptions::LINEAR,
            );
            textures[tile.original_index()] = Some(handle);
        }
        let textures: Vec<_> = textures.into_iter().flatten().collect();

        log::info!("Board ready: {} tiles from {}", board.len(), path.display());
        // Always start unsolved; an accidental identity shuffle is not
        // re-shuffled and only swaps re-evaluate the solved state.
        self.puzzle = Puzzle::Ready(ReadyPuzzle {
            board,
            textures,
            solved: false,
            source_path: path,
            drag: None,
        });
    }
}

impl ReadyPuzzle {
    fn ui(&mut self, ui: &mut egui::Ui) {
        let layout = BoardLayout::fit(&self.board, ui.available_rect_before_wrap());
        self.handle_input(ui, &layout);
        self.paint(ui, &layout);

        ui.allocate_rect(
            Rect::from_min_size(layout.origin, layout.board_size()),
            Sense::hover(),
        );
        ui.add_space(8.0);
        if self.solved {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("Puzzle solved!")
                        .size(22.0)
                        .strong()
                        .color(COLOR_SOLVED_TEXT),
                );
            });
        }
    }

    fn handle_input(&mut self, ui: &mut egui::Ui, layout: &BoardLayout) {
        let pointer_pos = ui.input(|i| i.pointer.interact_pos());
        let mut finished_drag: Option<(usize, Option<usize>)> = None;

        for slot in 0..self.board.len() {
            let rect = layout.slot_rect(slot);
            let response = ui.interact(rect, ui.id().with(("puzzle-slot", slot)), Sense::drag());

            if response.drag_started_by(PointerButton::Primary) {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.drag = Some(DragState {
                        slot,
                        offset: pointer - rect.min,
                    });
                }
            }

            if self.drag.as_ref().is_some_and(|d| d.slot == slot) && response.drag_stopped() {
                let target = pointer_pos.and_then(|pos| layout.hit_slot(pos));
                finished_drag = Some((slot, target));
            }
        }

        if let Some((source, target)) = finished_drag {
            self.drag = None;
            // Releasing outside the board, or back on the picked slot,
            // leaves the board untouched.
            if let Some(target) = target {
                if self.board.swap(source, target) {
                    self.solved = self.board.is_solved();
                    if self.solved {
                        log::info!("Puzzle solved");
                    }
                }
            }
        }

        // Drag state can outlive its widget (e.g. pointer released outside
        // the window); a pick with no buttons down is stale.
        if self.drag.is_some() && !ui.input(|i| i.pointer.any_down()) {
            self.drag = None;
        }
    }

    fn paint(&self, ui: &egui::Ui, layout: &BoardLayout) {
        let painter = ui.painter();
        let rounding = Rounding::same(TILE_CORNER_RADIUS);
        let pointer_pos = ui.input(|i| i.pointer.interact_pos());

        let drag_slot = self.drag.as_ref().map(|d| d.slot);
        let drop_target = match (drag_slot, pointer_pos) {
            (Some(source), Some(pos)) => layout.hit_slot(pos).filter(|&slot| slot != source),
            _ => None,
        };

        for slot in 0..self.board.len() {
            let rect = layout.slot_rect(slot);
            if Some(slot) == drag_slot {
                painter.rect_filled(rect, rounding, COLOR_EMPTY_SLOT);
            } else if let Some(tile) = self.board.tile(slot) {
                self.paint_tile(ui, tile.original_index(), rect, rounding);
            }
            if Some(slot) == drop_target {
                painter.rect_stroke(
                    rect,
                    rounding,
                    Stroke::new(DROP_TARGET_STROKE_WIDTH, COLOR_DROP_TARGET),
                );
            }
        }

        // Drag preview: the picked tile floats under the pointer, above the
        // grid.
        if let (Some(drag), Some(pointer)) = (&self.drag, pointer_pos) {
            if let Some(tile) = self.board.tile(drag.slot) {
                let rect = Rect::from_min_size(pointer - drag.offset, layout.tile_size);
                self.paint_tile(ui, tile.original_index(), rect, rounding);
            }
        }
    }

    fn paint_tile(&self, ui: &egui::Ui, original_index: usize, rect: Rect, rounding: Rounding) {
        let mut shape = egui::epaint::RectShape::filled(rect, rounding, Color32::WHITE);
        shape.fill_texture_id = self.textures[original_index].id();
        shape.uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        ui.painter().add(shape);
    }
}

impl eframe::App for PuzzleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending_load(ctx);

        // OS drag-and-drop of an image file onto the window.
        if let Some(path) = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()))
        {
            self.request_load(ctx, path);
        }

        let mut open_requested = false;
        let mut reload_requested = false;
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(COLOR_TOOLBAR_BG)
                    .inner_margin(0.0)
                    .outer_margin(0.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(TOOLBAR_START_SPACING);
                    if ui
                        .add(
                            egui::Button::new(RichText::new("🖼").size(TOOLBAR_ICON_SIZE))
                                .min_size(Vec2::splat(TOOLBAR_BUTTON_SIZE))
                                .frame(false),
                        )
                        .on_hover_text("Open Image")
                        .clicked()
                    {
                        open_requested = true;
                    }
                    let can_reload = matches!(self.puzzle, Puzzle::Ready(_));
                    if ui
                        .add_enabled(
                            can_reload,
                            egui::Button::new(RichText::new("🔄").size(TOOLBAR_ICON_SIZE))
                                .min_size(Vec2::splat(TOOLBAR_BUTTON_SIZE))
                                .frame(false),
                        )
                        .on_hover_text("Reshuffle")
                        .clicked()
                    {
                        reload_requested = true;
                    }
                });
            });

        if open_requested {
            self.open_image_dialog(ctx);
        }
        if reload_requested {
            if let Puzzle::Ready(puzzle) = &self.puzzle {
                let path = puzzle.source_path.clone();
                self.request_load(ctx, path);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.puzzle {
            Puzzle::Idle => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.4);
                    ui.label(
                        RichText::new("Drop an image here or open one to start a puzzle").weak(),
                    );
                });
            }
            Puzzle::Loading { path } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.4);
                    ui.spinner();
                    ui.label(RichText::new(format!("Loading {}…", path.display())).weak());
                });
            }
            Puzzle::Failed { message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.4);
                    ui.label(RichText::new(message.as_str()).color(COLOR_ERROR_TEXT));
                    ui.label(RichText::new("Open another image to try again").weak());
                });
            }
            Puzzle::Ready(puzzle) => puzzle.ui(ui),
        });
    }
}
