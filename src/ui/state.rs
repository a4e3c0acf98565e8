use std::collections::HashMap;

use gtk4 as gtk;
use gtk4::gdk;
use libadwaita as adw;

use naipes::{CardCode, Deck, Session, Settings};

pub struct AppState {
    pub settings: Settings,

    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub title_game: Option<gtk::Widget>,
    pub title_plain: Option<gtk::Widget>,
    pub time_label: Option<gtk::Label>,
    pub attempts_label: Option<gtk::Label>,
    pub board_container: Option<gtk::Box>,
    pub board_grid: Option<gtk::Grid>,
    pub result_title_label: Option<gtk::Label>,
    pub result_value_labels: Vec<gtk::Label>,
    pub result_sub_label: Option<gtk::Label>,

    // One entry per board slot.
    pub grid_buttons: Vec<gtk::Button>,
    pub card_stacks: Vec<gtk::Stack>,
    pub card_faces: Vec<gtk::Picture>,

    // Game state
    pub deck: Option<Deck>,
    pub face_textures: HashMap<CardCode, gdk::Texture>,
    pub session: Option<Session>,
    pub game_id: u64,
    pub flip_anim_phase: bool,
    pub loading: bool,
    pub timer_handle: Option<glib::SourceId>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        AppState {
            settings,
            view_stack: None,
            header: None,
            title_game: None,
            title_plain: None,
            time_label: None,
            attempts_label: None,
            board_container: None,
            board_grid: None,
            result_title_label: None,
            result_value_labels: Vec::new(),
            result_sub_label: None,
            grid_buttons: Vec::new(),
            card_stacks: Vec::new(),
            card_faces: Vec::new(),
            deck: None,
            face_textures: HashMap::new(),
            session: None,
            game_id: 0,
            flip_anim_phase: false,
            loading: false,
            timer_handle: None,
        }
    }
}
