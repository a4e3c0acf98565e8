use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Cómo jugar"),
        Some(
            "Da la vuelta a dos cartas por turno y encuentra las 8 parejas.\n\
Si no coinciden, vuelven a quedar boca abajo.\n\
Termina antes de que el tiempo llegue a cero.",
        ),
    );
    dialog.add_response("ok", "Entendido");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Naipes")
        .application_icon("io.naipes.Naipes")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("Un juego de memoria con cartas de póker.")
        .website("https://deckofcardsapi.com")
        .build();
    dialog.add_credit_section(Some("Cartas"), &["Deck of Cards API https://deckofcardsapi.com"]);
    dialog.add_legal_section("Naipes", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
