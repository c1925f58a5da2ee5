pub mod model;
pub mod view;

pub use model::{FrameAction, Point, State, WheelGeometry, WheelHit};
pub use view::draw;

pub const REFERENCE_HEIGHT: f64 = 1440.0;
pub const WHEEL_RADIUS: f64 = 420.0;
pub const RIM_WIDTH: f64 = 25.0; // thick outer ring carrying the dots
pub const HUB_RADIUS: f64 = 48.0; // center circle, doubles as the spin button
pub const DOT_RADIUS: f64 = 4.0;
pub const TRAIL_COPIES: u32 = 8; // blur trail copies per dot while spinning
pub const TRAIL_SPACING: f64 = 0.15; // trail lag in velocity-ticks
pub const OUTER_RING_WIDTH: f64 = 3.0;
pub const WEDGE_STROKE_WIDTH: f64 = 1.5;
pub const LABEL_RADIUS_FACTOR: f64 = 0.65; // label anchor along the wedge axis
pub const LABEL_MAX_SIZE: f64 = 20.0;
pub const HUB_LABEL_SIZE: f64 = 16.0;
pub const PLACEHOLDER_SIZE: f64 = 24.0;
pub const POINTER_TIP_GAP: f64 = 10.0; // pointer tip clearance over the rim
pub const POINTER_LENGTH: f64 = 30.0;
pub const POINTER_HALF_WIDTH: f64 = 20.0;
