use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Wheel palette. The face keeps its fixed ember colors; only the hub picks
/// up the GTK theme, with dark fallbacks.
pub struct ThemeColors {
    pub wedges: [Srgba<f64>; 3],
    pub rim: Srgba<f64>,
    pub rim_accent: Srgba<f64>,
    pub dot: Srgba<f64>,
    pub pointer: Srgba<f64>,
    pub hub: Srgba<f64>,
    pub hub_label: Srgba<f64>,
    pub label: Srgba<f64>,
    pub placeholder: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let ember = Srgba::new(0.769, 0.282, 0.0, 1.0);
        let amber = Srgba::new(0.886, 0.549, 0.078, 1.0);
        let pumpkin = Srgba::new(0.894, 0.447, 0.039, 1.0);

        Self {
            wedges: [ember, amber, pumpkin],
            rim: Srgba::new(0.0, 0.0, 0.0, 1.0),
            rim_accent: amber,
            dot: ember,
            pointer: pumpkin,
            hub: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.0, 0.0, 0.0, 1.0),
                Some(1.0),
            ),
            hub_label: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                Some(1.0),
            ),
            label: Srgba::new(0.0, 0.0, 0.0, 1.0),
            placeholder: ember,
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.rondel-window, .rondel-drawing-area {
    background: none;
    background-color: transparent;
}
.rondel-result {
    font-size: 32px;
    font-weight: bold;
    color: #e4720a;
    text-shadow: 0 2px 6px rgba(0, 0, 0, 0.8);
}
@keyframes rondel-pulse {
    0%, 100% { opacity: 1; }
    50% { opacity: 0.35; }
}
.rondel-celebrate {
    animation: rondel-pulse 500ms ease-in-out 3;
}
.rondel-entry {
    background-color: rgba(0, 0, 0, 0.75);
    color: #e28c14;
    border: 1px solid #c44800;
    border-radius: 8px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
