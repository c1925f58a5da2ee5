use relm4::prelude::*;
use rondel::config;
use rondel::gui::app::AppModel;
use rondel::gui::wheel::State;
use rondel::sys::runtime;
use spindle::roster::Roster;

fn main() {
    env_logger::init();

    let config = config::load_or_default();
    let state = State::new(Roster::load_or_seed());

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.rondel.rondel");

    app.run::<AppModel>((state, config, rx));
}
