use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::wheel::{self, Point, State, WheelHit};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use spindle::roster::{ItemLabel, Roster};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub config: Rc<RefCell<Config>>,
    pub visible: bool,
    pub result_text: String,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    pub result_label: gtk::Label,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Spin,
    Add(ItemLabel),
    Remove(usize),
    Clear,
    Click { button: u32, at: Point },
    Frame(u64),
    Resize(f64, f64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Spin => AppMsg::Spin,
            AppEvent::Add(label) => AppMsg::Add(label),
            AppEvent::Remove(index) => AppMsg::Remove(index),
            AppEvent::Clear => AppMsg::Clear,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Milliseconds on the same monotonic scale the frame clock reports.
fn now_ms() -> u64 {
    (glib::monotonic_time() / 1_000) as u64
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Rondel"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "rondel-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "rondel-drawing-area",

                    connect_resize[sender] => move |_, width, height| {
                        sender.input(AppMsg::Resize(f64::from(width), f64::from(height)));
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 0, // Listen to all buttons
                        connect_released[sender] => move |gesture, _, x, y| {
                            sender.input(AppMsg::Click {
                                button: gesture.current_button(),
                                at: Point::new(x, y),
                            });
                        }
                    }
                },

                #[name = "result_label"]
                add_overlay = &gtk::Label {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 96,
                    add_css_class: "rondel-result",
                    #[watch]
                    set_label: &model.result_text,
                },

                add_overlay = &gtk::Entry {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 64,
                    set_width_chars: 28,
                    set_placeholder_text: Some("Add a movie, press Enter"),
                    add_css_class: "rondel-entry",

                    connect_activate[sender] => move |entry| {
                        if let Some(label) = ItemLabel::normalized(entry.text().as_str()) {
                            sender.input(AppMsg::Add(label));
                        }
                        entry.set_text("");
                    }
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let state = Rc::new(RefCell::new(state));
        let config = Rc::new(RefCell::new(config));

        let model = AppModel {
            state: state.clone(),
            config: config.clone(),
            visible: false,
            result_text: String::new(),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            result_label: gtk::Label::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.result_label = widgets.result_label.clone();

        let state_draw = state.clone();
        let config_draw = config.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = wheel::draw(cr, &state_draw.borrow(), &colors, &config_draw.borrow())
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        // The animation driver: one callback per display refresh, forever.
        // It never starts or stops with a spin; the scheduler decides each
        // frame whether anything moved.
        let frame_sender = sender.clone();
        widgets.drawing_area.add_tick_callback(move |_, clock| {
            frame_sender.input(AppMsg::Frame((clock.frame_time() / 1_000) as u64));
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.visible = false;
            }
            AppMsg::Spin => {
                // Spinning while hidden would waste the show; reveal first
                self.visible = true;
                if self.state.borrow_mut().begin_spin(now_ms()) {
                    self.result_text.clear();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Frame(now) => {
                let action = self.state.borrow_mut().frame(now);

                if action.chime
                    && self.config.borrow().detent_clicks
                    && let Some(display) = gtk::gdk::Display::default()
                {
                    display.beep();
                }
                if let Some(winner) = action.winner {
                    self.result_text = format!("🎃 {} 🎃", winner);
                    self.celebrate();
                }
                if action.should_redraw {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Click { button, at } => {
                if !self.visible {
                    return;
                }
                let pointer = self.config.borrow().pointer;
                let hit = self.state.borrow().hit(at, pointer.angle());

                match (button, hit) {
                    (1, WheelHit::Hub) => sender.input(AppMsg::Spin),
                    (3, WheelHit::Wedge(index)) => sender.input(AppMsg::Remove(index)),
                    (1, WheelHit::Outside) => {
                        if !self.state.borrow().engine.is_spinning() {
                            self.visible = false;
                        }
                    }
                    _ => {}
                }
            }
            AppMsg::Add(label) => {
                self.edit_roster(|roster| roster.add(label));
            }
            AppMsg::Remove(index) => {
                self.edit_roster(|roster| {
                    if roster.remove(index).is_none() {
                        log::debug!("No item at position {}", index);
                    }
                });
            }
            AppMsg::Clear => {
                if self.edit_roster(Roster::clear) {
                    self.result_text.clear();
                }
            }
            AppMsg::Resize(width, height) => {
                self.state
                    .borrow_mut()
                    .refresh(Point::new(width / 2.0, height / 2.0), height);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    *self.config.borrow_mut() = new_config;
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    /// Applies a roster edit unless a spin is in flight; the pending winner
    /// index must keep pointing at the slice it was drawn for. Reports
    /// whether the edit went through.
    fn edit_roster(&mut self, edit: impl FnOnce(&mut Roster)) -> bool {
        let mut state = self.state.borrow_mut();
        if state.engine.is_spinning() {
            log::debug!("Ignoring roster edit during a spin");
            return false;
        }

        edit(&mut state.roster);
        if let Err(e) = state.roster.save() {
            log::error!("Failed to save the roster: {}", e);
        }
        drop(state);
        self.drawing_area.queue_draw();
        true
    }

    /// Restarts the result label's pulse animation.
    fn celebrate(&self) {
        let label = self.result_label.clone();
        label.remove_css_class("rondel-celebrate");
        glib::timeout_add_local_once(Duration::from_millis(10), move || {
            label.add_css_class("rondel-celebrate");
        });
    }
}
