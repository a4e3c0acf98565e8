use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use naipes::PAIR_COUNT;
use naipes::game::TileStatus;

use super::app::handle_tile_click;
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 8;
pub const GRID_COLS: i32 = 4;
pub const GRID_ROWS: i32 = (PAIR_COUNT as i32 * 2) / GRID_COLS;

// Poker card proportions.
const CARD_RATIO: f32 = 226.0 / 314.0;

fn build_card_back() -> gtk::DrawingArea {
    let drawing_area = gtk::DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .build();
    drawing_area.add_css_class("naipes-card-back");

    drawing_area.set_draw_func(move |area, cr, width, height| {
        let min_dim = width.min(height) as f64;

        cr.set_antialias(cairo::Antialias::Best);

        let layout = pangocairo::functions::create_layout(cr);
        let mut font_desc = pango::FontDescription::new();
        font_desc.set_family("Noto Sans Symbols 2, DejaVu Sans, sans");
        font_desc.set_weight(pango::Weight::Bold);
        font_desc.set_size((min_dim * 0.42 * pango::SCALE as f64) as i32);
        layout.set_font_description(Some(&font_desc));
        layout.set_text("♠");

        let fg = area.style_context().color();
        cr.set_source_rgba(
            fg.red() as f64,
            fg.green() as f64,
            fg.blue() as f64,
            fg.alpha() as f64,
        );

        let (text_width, text_height) = layout.pixel_size();
        cr.move_to(
            (width as f64 - text_width as f64) / 2.0,
            (height as f64 - text_height as f64) / 2.0,
        );

        pangocairo::functions::show_layout(cr, &layout);
    });

    drawing_area
}

/// The fixed 16-slot board. Slots are bound to cards later, per game.
pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("naipes-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);
    grid.set_can_target(false);

    let mut buttons = Vec::new();
    let mut stacks = Vec::new();
    let mut faces = Vec::new();

    for i in 0..(GRID_ROWS * GRID_COLS) {
        let index = i as usize;
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(CARD_RATIO)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["naipes-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let face = gtk::Picture::new();
        face.set_can_shrink(true);
        face.add_css_class("naipes-card-front");

        let stack = gtk::Stack::new();
        stack.set_transition_type(gtk::StackTransitionType::None);
        stack.add_named(&build_card_back(), Some("back"));
        stack.add_named(&face, Some("front"));
        stack.set_visible_child_name("back");
        button.set_child(Some(&stack));

        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            handle_tile_click(&state_clone, index);
        });

        aspect_frame.set_child(Some(&button));

        let x = i % GRID_COLS;
        let y = i / GRID_COLS;
        grid.attach(&aspect_frame, x, y, 1, 1);
        buttons.push(button);
        stacks.push(stack);
        faces.push(face);
    }

    {
        let mut st = state.borrow_mut();
        st.grid_buttons = buttons;
        st.card_stacks = stacks;
        st.card_faces = faces;
        st.board_grid = Some(grid.clone());
    }

    grid
}

pub(super) fn clear_flip_classes(button: &gtk::Button) {
    button.remove_css_class("flip-show-a");
    button.remove_css_class("flip-show-b");
}

/// Flip a slot to `front` or `back`, replaying the flip animation.
pub(super) fn play_flip(st: &mut AppState, index: usize, side: &str) {
    let (Some(button), Some(stack)) = (
        st.grid_buttons.get(index).cloned(),
        st.card_stacks.get(index).cloned(),
    ) else {
        return;
    };
    clear_flip_classes(&button);
    // Alternating between two identical classes restarts the CSS animation.
    st.flip_anim_phase = !st.flip_anim_phase;
    if st.flip_anim_phase {
        button.add_css_class("flip-show-a");
    } else {
        button.add_css_class("flip-show-b");
    }
    stack.set_visible_child_name(side);
    if side == "front" {
        button.add_css_class("flipped");
    } else {
        button.remove_css_class("flipped");
    }
}

/// Clicks reach the board only while the current game accepts a reveal.
pub(super) fn sync_board_input(st: &AppState) {
    let enabled = st
        .session
        .as_ref()
        .is_some_and(|session| !session.input_blocked());
    if let Some(grid) = &st.board_grid {
        grid.set_can_target(enabled);
    }
    if let Some(container) = &st.board_container {
        if enabled {
            container.remove_css_class("pointer-events-blocked");
        } else {
            container.add_css_class("pointer-events-blocked");
        }
    }
}

/// Bind the current session's cards to the slots, all face-down.
pub(super) fn bind_session_to_board(st: &AppState) {
    let Some(session) = &st.session else {
        return;
    };
    for (index, tile) in session.tiles().iter().enumerate() {
        let (Some(button), Some(stack), Some(face)) = (
            st.grid_buttons.get(index),
            st.card_stacks.get(index),
            st.card_faces.get(index),
        ) else {
            continue;
        };
        face.set_paintable(st.face_textures.get(&tile.card));
        clear_flip_classes(button);
        button.remove_css_class("matched");
        button.remove_css_class("flipped");
        let side = if tile.status == TileStatus::Hidden {
            "back"
        } else {
            "front"
        };
        stack.set_visible_child_name(side);
    }
}
