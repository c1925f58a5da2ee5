use crate::gui::wheel::{HUB_RADIUS, REFERENCE_HEIGHT, RIM_WIDTH, WHEEL_RADIUS};
use spindle::engine::{DetentChime, SpinEngine};
use spindle::roster::{ItemLabel, Roster};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct WheelGeometry {
    pub center: Point,
    pub radius: f64,
    pub rim_width: f64,
    pub hub_radius: f64,
    pub scale: f64,
}

impl WheelGeometry {
    pub fn calculate(center: Point, scale_factor: f64) -> Self {
        Self {
            center,
            radius: WHEEL_RADIUS * scale_factor,
            rim_width: RIM_WIDTH * scale_factor,
            hub_radius: HUB_RADIUS * scale_factor,
            scale: scale_factor,
        }
    }
}

/// What a click on the drawing area actually touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelHit {
    Hub,
    Wedge(usize),
    Outside,
}

/// What one frame of the driver asks of the component.
#[derive(Debug, Clone, Default)]
pub struct FrameAction {
    pub should_redraw: bool,
    pub chime: bool,
    /// The winning label, handed over exactly once per spin.
    pub winner: Option<ItemLabel>,
}

pub struct State {
    pub roster: Roster,
    pub engine: SpinEngine,
    pub chime: DetentChime,
    pub geometry: WheelGeometry,
}

impl State {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            engine: SpinEngine::new(),
            chime: DetentChime::new(),
            geometry: WheelGeometry::calculate(Point::default(), 1.0),
        }
    }

    /// Recomputes the wheel footprint for the current viewport; the wheel
    /// sits wherever the compositor put the surface, scaled relative to a
    /// 1440p reference.
    pub fn refresh(&mut self, center: Point, viewport_height: f64) {
        let scale_factor = viewport_height / REFERENCE_HEIGHT;
        self.geometry = WheelGeometry::calculate(center, scale_factor);
    }

    /// Kicks off a spin over the current roster. No-op (false) while one is
    /// already running or when the roster is empty.
    pub fn begin_spin(&mut self, now_ms: u64) -> bool {
        self.engine.spin(self.roster.len(), now_ms)
    }

    /// Advances the animation by one frame of the perpetual driver.
    pub fn frame(&mut self, now_ms: u64) -> FrameAction {
        let tick = self.engine.tick(now_ms);
        let chime = tick.should_redraw && self.chime.observe(self.engine.rotation(), now_ms);
        let winner = tick
            .winner
            .and_then(|index| self.roster.get(index).cloned());

        FrameAction {
            should_redraw: tick.should_redraw,
            chime,
            winner,
        }
    }

    /// Resolves a cursor position against the wheel, taking the current
    /// rotation and the configured pointer edge into account.
    pub fn hit(&self, cursor: Point, pointer_offset: f64) -> WheelHit {
        let (dx, dy) = (
            cursor.x - self.geometry.center.x,
            cursor.y - self.geometry.center.y,
        );
        let distance = dx.hypot(dy);

        if distance <= self.geometry.hub_radius {
            return WheelHit::Hub;
        }
        if distance > self.geometry.radius || self.roster.is_empty() {
            return WheelHit::Outside;
        }

        let sweep = 2.0 * PI / self.roster.len() as f64;
        let angle = dy.atan2(dx) - self.engine.rotation() - pointer_offset;
        let index = (angle.rem_euclid(2.0 * PI) / sweep) as usize;
        WheelHit::Wedge(index.min(self.roster.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle::engine::SPIN_DURATION_MS;
    use std::f64::consts::PI;

    const NORTH: f64 = -PI / 2.0;

    fn eight_slice_state() -> State {
        let mut state = State::new(Roster::seed());
        state.refresh(Point::new(720.0, 720.0), 1440.0);
        state
    }

    #[test]
    fn hub_and_outside_resolve_by_distance() {
        let state = eight_slice_state();
        assert_eq!(state.hit(Point::new(720.0, 720.0), NORTH), WheelHit::Hub);
        assert_eq!(
            state.hit(Point::new(720.0, 700.0), NORTH),
            WheelHit::Hub,
            "inside the hub circle"
        );
        assert_eq!(state.hit(Point::new(10.0, 10.0), NORTH), WheelHit::Outside);
    }

    #[test]
    fn wedges_resolve_under_the_pointer_offset() {
        let state = eight_slice_state();

        // Straight up from the center: the leading edge of slice 0
        let above = Point::new(720.0, 720.0 - 200.0);
        assert_eq!(state.hit(above, NORTH), WheelHit::Wedge(0));

        // With the pointer on the east edge instead, straight up is six
        // slices (three quarter-turns) further along the wheel
        assert_eq!(state.hit(above, 0.0), WheelHit::Wedge(6));

        // Straight right from the center: two slices past north
        let right = Point::new(720.0 + 200.0, 720.0);
        assert_eq!(state.hit(right, NORTH), WheelHit::Wedge(2));
    }

    #[test]
    fn empty_roster_only_has_a_hub() {
        let mut state = State::new(Roster::new());
        state.refresh(Point::new(720.0, 720.0), 1440.0);

        assert!(!state.begin_spin(0));
        assert_eq!(
            state.hit(Point::new(720.0, 600.0), NORTH),
            WheelHit::Outside
        );
    }

    #[test]
    fn frame_reports_the_winning_label_once() {
        let mut state = eight_slice_state();
        assert!(state.begin_spin(0));
        assert!(!state.begin_spin(100), "one session at a time");

        let action = state.frame(SPIN_DURATION_MS);
        assert!(action.should_redraw);
        let winner = action.winner.expect("spin completes at full duration");
        assert!(state.roster.iter().any(|item| *item == winner));

        let after = state.frame(SPIN_DURATION_MS + 16);
        assert!(!after.should_redraw);
        assert_eq!(after.winner, None);
    }
}
