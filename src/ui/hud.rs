use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;

use naipes::game::{Session, Tick};

use super::scene::show_result;
use super::state::AppState;

pub(super) fn set_header_game(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_hud(&st);
        header.set_title_widget(Some(title_box));
    }
}

pub(super) fn set_header_plain(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_plain) {
        header.set_title_widget(Some(title));
    }
}

pub(super) fn update_hud(st: &AppState) {
    let Some(session) = &st.session else {
        return;
    };
    if let Some(label) = &st.time_label {
        label.set_text(&format!("Tiempo: {}", session.seconds_remaining()));
    }
    if let Some(label) = &st.attempts_label {
        label.set_text(&format!("Intentos: {}", session.attempts()));
    }
}

pub(super) fn stop_timer(st: &mut AppState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

/// One-second countdown for the current game. Ends the game at zero.
pub(super) fn start_timer(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_timer(&mut st);
    let game_id = st.game_id;

    let state_clone = state.clone();
    let handle = glib::timeout_add_local(std::time::Duration::from_secs(1), move || {
        let mut st = state_clone.borrow_mut();
        if st.game_id != game_id {
            return glib::ControlFlow::Break;
        }
        let tick = st.session.as_mut().and_then(Session::tick);
        update_hud(&st);
        match tick {
            Some(Tick::Running(_)) => glib::ControlFlow::Continue,
            Some(Tick::Expired) => {
                // Returning Break removes the source; forget the handle.
                st.timer_handle = None;
                drop(st);
                show_result(&state_clone);
                glib::ControlFlow::Break
            }
            None => {
                st.timer_handle = None;
                glib::ControlFlow::Break
            }
        }
    });
    st.timer_handle = Some(handle);
}
