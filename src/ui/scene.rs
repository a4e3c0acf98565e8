use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;

use super::board::sync_board_input;
use super::hud::{set_header_game, set_header_plain, stop_timer};
use super::state::AppState;

fn switch_to(st: &AppState, name: &str, transition: gtk::StackTransitionType) {
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(transition);
        stack.set_visible_child_name(name);
    }
}

pub(super) fn show_loading(state: &Rc<RefCell<AppState>>) {
    set_header_plain(state);
    let st = state.borrow();
    switch_to(&st, "loading", gtk::StackTransitionType::Crossfade);
}

/// The single failure page: the deck could not be loaded.
pub(super) fn show_error(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        st.session = None;
    }
    set_header_plain(state);
    let st = state.borrow();
    switch_to(&st, "error", gtk::StackTransitionType::Crossfade);
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    set_header_game(state);
    let st = state.borrow();
    switch_to(&st, "game", gtk::StackTransitionType::SlideLeft);
}

/// Replace the board with the summary of the finished game.
pub(super) fn show_result(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        sync_board_input(&st);
        let Some(summary) = st.session.as_ref().and_then(|session| session.summary()) else {
            return;
        };
        if let Some(label) = &st.result_title_label {
            label.set_text(summary.outcome.message());
        }
        for (label, (_, value)) in st.result_value_labels.iter().zip(summary.rows()) {
            label.set_text(&value);
        }
        if let Some(label) = &st.result_sub_label {
            label.set_text(summary.outcome.sub_message());
        }
    }
    set_header_plain(state);
    let st = state.borrow();
    switch_to(&st, "result", gtk::StackTransitionType::SlideLeft);
}
