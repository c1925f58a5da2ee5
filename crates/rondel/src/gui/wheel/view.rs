use super::model::{State, WheelGeometry};
use super::{
    DOT_RADIUS, HUB_LABEL_SIZE, LABEL_MAX_SIZE, LABEL_RADIUS_FACTOR, OUTER_RING_WIDTH,
    PLACEHOLDER_SIZE, POINTER_HALF_WIDTH, POINTER_LENGTH, POINTER_TIP_GAP, TRAIL_COPIES,
    TRAIL_SPACING, WEDGE_STROKE_WIDTH,
};
use crate::config::Config;
use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use spindle::engine::DETENT_COUNT;
use spindle::roster::ItemLabel;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct WedgeRenderer<'a> {
    label: &'a ItemLabel,
    geometry: &'a WheelGeometry,
    start: f64,
    sweep: f64,
    fill: Srgba<f64>,
}

impl WedgeRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_wedge(cr, colors)?;
        self.draw_label(cr, colors)
    }

    fn draw_wedge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.geometry.center;
        set_color(cr, self.fill);
        cr.move_to(center.x, center.y);
        cr.arc(
            center.x,
            center.y,
            self.geometry.radius,
            self.start,
            self.start + self.sweep,
        );
        cr.close_path();
        cr.fill_preserve()?;

        set_color(cr, colors.rim);
        cr.set_line_width(WEDGE_STROKE_WIDTH * self.geometry.scale);
        cr.stroke()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.geometry.center;

        cr.save()?;
        cr.translate(center.x, center.y);
        cr.rotate(self.start + self.sweep / 2.0);

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        // Long titles shrink so they stay inside their wedge
        let chars = self.label.chars().count().max(1) as f64;
        let size = (self.geometry.radius / (chars * 0.6)).min(LABEL_MAX_SIZE * self.geometry.scale);
        cr.set_font_size(size);

        set_color(cr, colors.label);
        if let Ok(ext) = cr.text_extents(self.label.as_ref()) {
            cr.move_to(
                self.geometry.radius * LABEL_RADIUS_FACTOR - ext.width() / 2.0,
                ext.height() / 2.0,
            );
            cr.show_text(self.label.as_ref())?;
        }
        cr.restore()
    }
}

pub fn draw(
    cr: &Context,
    state: &State,
    colors: &ThemeColors,
    config: &Config,
) -> Result<(), cairo::Error> {
    if state.roster.is_empty() {
        return draw_placeholder(cr, state, colors);
    }

    let geometry = &state.geometry;
    let rotation = state.engine.rotation();
    let offset = config.pointer.angle();
    let sweep = 2.0 * PI / state.roster.len() as f64;

    for (i, label) in state.roster.iter().enumerate() {
        WedgeRenderer {
            label,
            geometry,
            start: rotation + i as f64 * sweep + offset,
            sweep,
            fill: colors.wedges[i % colors.wedges.len()],
        }
        .draw(cr, colors)?;
    }

    draw_rim(cr, geometry, colors)?;
    draw_dots(cr, state, colors, config.motion_blur)?;
    draw_hub(cr, geometry, colors)?;
    draw_pointer(cr, geometry, colors, offset)
}

fn draw_rim(
    cr: &Context,
    geometry: &WheelGeometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = geometry.center;

    // Thick carrier ring
    set_color(cr, colors.rim);
    cr.set_line_width(geometry.rim_width);
    cr.arc(
        center.x,
        center.y,
        geometry.radius + geometry.rim_width / 2.0,
        0.0,
        2.0 * PI,
    );
    cr.stroke()?;

    // Thin accent ring on the outside
    set_color(cr, colors.rim_accent);
    cr.set_line_width(OUTER_RING_WIDTH * geometry.scale);
    cr.arc(
        center.x,
        center.y,
        geometry.radius + geometry.rim_width,
        0.0,
        2.0 * PI,
    );
    cr.stroke()
}

/// The rim dots double as the detent marks. While a spin is running and
/// motion blur is on, each dot drags a tail of fading copies positioned
/// from the per-tick rotation delta.
fn draw_dots(
    cr: &Context,
    state: &State,
    colors: &ThemeColors,
    motion_blur: bool,
) -> Result<(), cairo::Error> {
    let geometry = &state.geometry;
    let center = geometry.center;
    let ring_radius = geometry.radius + geometry.rim_width / 2.0;
    let rotation = state.engine.rotation();
    let velocity = state.engine.rotation_velocity();

    let trails = if state.engine.is_spinning() && motion_blur {
        TRAIL_COPIES
    } else {
        0
    };

    for i in 0..DETENT_COUNT {
        let base = f64::from(i) / f64::from(DETENT_COUNT) * 2.0 * PI;

        for t in (1..=trails).rev() {
            let trail_rotation = rotation - velocity * f64::from(t) * TRAIL_SPACING;
            let angle = base + trail_rotation;

            let mut faded = colors.dot;
            faded.alpha = 1.0 - f64::from(t) / f64::from(TRAIL_COPIES);
            set_color(cr, faded);
            cr.arc(
                center.x + ring_radius * angle.cos(),
                center.y + ring_radius * angle.sin(),
                DOT_RADIUS * geometry.scale,
                0.0,
                2.0 * PI,
            );
            cr.fill()?;
        }

        let angle = base + rotation;
        set_color(cr, colors.dot);
        cr.arc(
            center.x + ring_radius * angle.cos(),
            center.y + ring_radius * angle.sin(),
            DOT_RADIUS * geometry.scale,
            0.0,
            2.0 * PI,
        );
        cr.fill()?;
    }
    Ok(())
}

fn draw_hub(
    cr: &Context,
    geometry: &WheelGeometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = geometry.center;

    set_color(cr, colors.hub);
    cr.arc(center.x, center.y, geometry.hub_radius, 0.0, 2.0 * PI);
    cr.fill()?;

    set_color(cr, colors.hub_label);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(HUB_LABEL_SIZE * geometry.scale);
    if let Ok(ext) = cr.text_extents("SPIN") {
        cr.move_to(center.x - ext.width() / 2.0, center.y + ext.height() / 2.0);
        cr.show_text("SPIN")?;
    }
    Ok(())
}

fn draw_pointer(
    cr: &Context,
    geometry: &WheelGeometry,
    colors: &ThemeColors,
    offset: f64,
) -> Result<(), cairo::Error> {
    let tip = geometry.radius + POINTER_TIP_GAP * geometry.scale;
    let back = tip + POINTER_LENGTH * geometry.scale;

    cr.save()?;
    cr.translate(geometry.center.x, geometry.center.y);
    // The triangle is authored pointing inward from the top edge; rotate it
    // to whichever edge the config picked
    cr.rotate(offset + PI / 2.0);

    cr.move_to(0.0, -tip);
    cr.line_to(-POINTER_HALF_WIDTH * geometry.scale, -back);
    cr.line_to(POINTER_HALF_WIDTH * geometry.scale, -back);
    cr.close_path();

    set_color(cr, colors.pointer);
    cr.fill_preserve()?;
    set_color(cr, colors.rim);
    cr.set_line_width(2.0 * geometry.scale);
    cr.stroke()?;
    cr.restore()
}

fn draw_placeholder(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let geometry = &state.geometry;

    cr.save()?;
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(PLACEHOLDER_SIZE * geometry.scale);
    set_color(cr, colors.placeholder);
    if let Ok(ext) = cr.text_extents("Add movies to spin!") {
        cr.move_to(
            geometry.center.x - ext.width() / 2.0,
            geometry.center.y + ext.height() / 2.0,
        );
        cr.show_text("Add movies to spin!")?;
    }
    cr.restore()
}
