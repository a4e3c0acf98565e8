use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Once;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::gdk_pixbuf;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;
use tracing::{debug, error, info};

use naipes::deck::{DeckLoader, HttpDeckSource, LoadedDeck, SessionCache};
use naipes::game::{RevealOutcome, Session};
use naipes::{CardCode, Settings};

use super::board::{
    CONTENT_MARGIN,
    GRID_COLS,
    GRID_ROWS,
    bind_session_to_board,
    build_board_grid,
    play_flip,
    sync_board_input,
};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{set_header_plain, start_timer, stop_timer, update_hud};
use super::scene::{show_error, show_game, show_loading, show_result};
use super::state::AppState;

const APP_ID: &str = "io.naipes.Naipes";
const RESOURCE_PREFIX: &str = "/io/naipes/Naipes";

pub fn handle_tile_click(state: &Rc<RefCell<AppState>>, index: usize) {
    let mut st = state.borrow_mut();
    let outcome = match st.session.as_mut() {
        Some(session) => session.click(index),
        None => return,
    };

    match outcome {
        RevealOutcome::Ignored => {}
        RevealOutcome::First(idx) => play_flip(&mut st, idx, "front"),
        RevealOutcome::Second(idx) => {
            play_flip(&mut st, idx, "front");
            sync_board_input(&st);
            let game_id = st.game_id;
            let flip_ms = u64::from(st.settings.flip_duration_ms);
            drop(st);

            // The pair is judged only once the second card is fully turned.
            let state_after_flip = state.clone();
            glib::timeout_add_local(std::time::Duration::from_millis(flip_ms), move || {
                resolve_pair(&state_after_flip, game_id);
                glib::ControlFlow::Break
            });
        }
    }
}

fn resolve_pair(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let mut st = state.borrow_mut();
    if st.game_id != game_id {
        return;
    }
    let Some(resolution) = st.session.as_mut().and_then(Session::resolve_pending) else {
        return;
    };

    for idx in [resolution.first, resolution.second] {
        if resolution.matched {
            if let Some(button) = st.grid_buttons.get(idx) {
                button.add_css_class("matched");
            }
        } else {
            play_flip(&mut st, idx, "back");
        }
    }
    update_hud(&st);

    if resolution.won {
        stop_timer(&mut st);
        drop(st);
        show_result(state);
    } else {
        sync_board_input(&st);
    }
}

fn texture_from_png(bytes: &[u8]) -> Result<gdk::Texture, glib::Error> {
    let loader = gdk_pixbuf::PixbufLoader::new();
    loader.write(bytes)?;
    loader.close()?;
    let pixbuf = loader.pixbuf().ok_or_else(|| {
        glib::Error::new(gdk_pixbuf::PixbufError::CorruptImage, "image decoded to nothing")
    })?;
    Ok(gdk::Texture::for_pixbuf(&pixbuf))
}

fn decode_faces(loaded: &LoadedDeck) -> Result<HashMap<CardCode, gdk::Texture>, glib::Error> {
    loaded
        .faces
        .iter()
        .map(|(code, bytes)| Ok((code.clone(), texture_from_png(bytes)?)))
        .collect()
}

fn load_deck_blocking(settings: &Settings) -> naipes::error::Result<LoadedDeck> {
    let source = HttpDeckSource::new(settings.request_timeout())?;
    DeckLoader::new(source, SessionCache::in_runtime_dir(), settings.deck_url.clone()).load()
}

/// Fetch or restore the deck off the main loop, then start a game.
fn load_and_start(state: &Rc<RefCell<AppState>>) {
    let settings = {
        let mut st = state.borrow_mut();
        if st.loading {
            return;
        }
        st.loading = true;
        stop_timer(&mut st);
        st.session = None;
        st.settings.clone()
    };
    show_loading(state);

    let state = state.clone();
    glib::spawn_future_local(async move {
        let result = gio::spawn_blocking(move || load_deck_blocking(&settings)).await;
        state.borrow_mut().loading = false;

        let loaded = match result {
            Ok(Ok(loaded)) => loaded,
            Ok(Err(err)) => {
                error!(%err, "deck failed to load");
                show_error(&state);
                return;
            }
            Err(_) => {
                error!("deck loader thread panicked");
                show_error(&state);
                return;
            }
        };

        let textures = match decode_faces(&loaded) {
            Ok(textures) => textures,
            Err(err) => {
                error!(%err, "card face could not be decoded");
                show_error(&state);
                return;
            }
        };

        info!(from_cache = loaded.from_cache, "deck ready");
        {
            let mut st = state.borrow_mut();
            st.deck = Some(loaded.deck);
            st.face_textures = textures;
        }
        start_new_game(&state);
    });
}

/// Deal the loaded deck again and restart the clock.
fn start_new_game(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        let Some(deck) = st.deck.clone() else {
            return;
        };
        st.game_id = st.game_id.wrapping_add(1);
        let session = Session::new(&deck, st.settings.time_limit_secs, &mut rand::rng());
        debug!(game_id = st.game_id, "dealt a new board");
        st.session = Some(session);
        bind_session_to_board(&st);
        sync_board_input(&st);
        update_hud(&st);
    }
    show_game(state);
    start_timer(state);
}

/// Equivalent of refreshing the page: reuse the session deck if there is
/// one, otherwise go back to the loader.
fn reload(state: &Rc<RefCell<AppState>>) {
    let has_deck = state.borrow().deck.is_some();
    if has_deck {
        start_new_game(state);
    } else {
        load_and_start(state);
    }
}

pub fn run(settings: Settings) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css(&settings);

        let state = Rc::new(RefCell::new(AppState::new(settings.clone())));

        let reload_action = SimpleAction::new("reload", None);
        reload_action.connect_activate({
            let state = state.clone();
            move |_, _| reload(&state)
        });
        app.add_action(&reload_action);
        app.set_accels_for_action("app.reload", &["F5", "<Control>r"]);

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let title_plain = gtk::Label::new(None);
        title_plain.set_markup("<b>Naipes</b>");
        title_plain.set_halign(gtk::Align::Center);

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);
        title_game_box.set_hexpand(true);

        let title_game_main = gtk::Label::builder()
            .label("Naipes")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let hud_box = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        hud_box.set_halign(gtk::Align::Center);
        let time_label = gtk::Label::builder()
            .css_classes(vec!["game-title-subtitle", "caption", "numeric"])
            .build();
        let attempts_label = gtk::Label::builder()
            .css_classes(vec!["game-title-subtitle", "caption", "numeric"])
            .build();
        hud_box.append(&time_label);
        hud_box.append(&attempts_label);

        title_game_box.append(&title_game_main);
        title_game_box.append(&hud_box);

        let header = adw::HeaderBar::builder()
            .title_widget(&title_plain)
            .build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let menu_model = gio::Menu::new();
        menu_model.append(Some("Nueva partida"), Some("app.reload"));
        menu_model.append(Some("Cómo jugar"), Some("app.instructions"));
        menu_model.append(Some("Acerca de Naipes"), Some("app.about"));
        menu_model.append(Some("Salir"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .action_name("app.reload")
            .build();
        restart_button.set_tooltip_text(Some("Nueva partida"));
        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_interpolate_size(false);
        view_stack.set_transition_duration(300);

        view_stack.add_named(&build_loading_view(), Some("loading"));
        view_stack.add_named(&build_error_view(), Some("error"));
        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some("game"));
        let result_view = build_result_view(&state);
        view_stack.add_named(&result_view, Some("result"));
        view_stack.set_visible_child_name("loading");

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&view_stack));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Naipes")
            .icon_name(APP_ID)
            .default_width(720)
            .default_height(860)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 520);
        win.add_css_class("app-window");

        {
            let mut st = state.borrow_mut();
            st.view_stack = Some(view_stack.clone());
            st.header = Some(header.clone());
            st.title_plain = Some(title_plain.upcast::<gtk::Widget>());
            st.title_game = Some(title_game_box.upcast::<gtk::Widget>());
            st.time_label = Some(time_label);
            st.attempts_label = Some(attempts_label);
        }

        set_header_plain(&state);
        win.present();
        load_and_start(&state);
    });

    app.run()
}

fn load_css(settings: &Settings) {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        if let Err(err) = gio::resources_register_include!("naipes.gresource") {
            error!(%err, "failed to register embedded resources");
        }
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource(&format!("{RESOURCE_PREFIX}/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    // The flip animation must last exactly as long as the resolve delay.
    let dynamic_css_provider = gtk::CssProvider::new();
    dynamic_css_provider.load_from_data(&format!(
        ".naipes-card.flip-show-a, .naipes-card.flip-show-b {{ animation-duration: {}ms; }}",
        settings.flip_duration_ms
    ));
    gtk::style_context_add_provider_for_display(
        &display,
        &dynamic_css_provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION + 1,
    );
}

fn build_loading_view() -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_halign(gtk::Align::Center);
    root.set_valign(gtk::Align::Center);
    root.add_css_class("loading-root");

    let spinner = adw::Spinner::new();
    spinner.set_size_request(48, 48);
    let label = gtk::Label::new(Some("Barajando cartas…"));
    label.add_css_class("dim-label");

    root.append(&spinner);
    root.append(&label);
    root
}

fn build_error_view() -> adw::StatusPage {
    let retry = gtk::Button::builder()
        .label("Recargar")
        .action_name("app.reload")
        .halign(gtk::Align::Center)
        .css_classes(vec!["pill", "suggested-action"])
        .build();

    adw::StatusPage::builder()
        .icon_name("dialog-error-symbolic")
        .title("Ha ocurrido un error al cargar el juego")
        .description("Recarga la página por favor")
        .child(&retry)
        .css_classes(vec!["error-msg"])
        .build()
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_grid = build_board_grid(state);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("naipes-card-container");
    board_card.add_css_class("pointer-events-blocked");

    let grid_ratio = GRID_COLS as f32 / GRID_ROWS as f32;
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&board_grid));
    board_card.append(&grid_frame);

    content.append(&board_card);
    root.append(&content);

    state.borrow_mut().board_container = Some(board_card);

    root
}

fn build_result_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("final-result-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 14);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("final-result");

    let title = gtk::Label::new(None);
    title.add_css_class("title-1");
    title.set_halign(gtk::Align::Center);

    let stats = gtk::Grid::new();
    stats.set_row_spacing(6);
    stats.set_column_spacing(24);
    stats.set_halign(gtk::Align::Center);
    stats.add_css_class("game-info");

    let mut value_labels = Vec::new();
    for (row, caption) in ["Aciertos", "Intentos", "Segundos restantes"].into_iter().enumerate() {
        let name = gtk::Label::new(Some(caption));
        name.add_css_class("game-info-title");
        name.set_xalign(0.0);
        let value = gtk::Label::new(None);
        value.add_css_class("game-info-data");
        value.add_css_class("numeric");
        value.set_xalign(1.0);
        stats.attach(&name, 0, row as i32, 1, 1);
        stats.attach(&value, 1, row as i32, 1, 1);
        value_labels.push(value);
    }

    let sub_message = gtk::Label::new(None);
    sub_message.add_css_class("dim-label");
    sub_message.set_wrap(true);
    sub_message.set_justify(gtk::Justification::Center);

    let again_btn = gtk::Button::builder()
        .label("Jugar de nuevo")
        .action_name("app.reload")
        .halign(gtk::Align::Center)
        .css_classes(vec!["pill", "suggested-action"])
        .build();

    content.append(&title);
    content.append(&stats);
    content.append(&sub_message);
    content.append(&again_btn);
    center.set_center_widget(Some(&content));
    root.append(&center);

    {
        let mut st = state.borrow_mut();
        st.result_title_label = Some(title);
        st.result_value_labels = value_labels;
        st.result_sub_label = Some(sub_message);
    }

    root
}
