mod bakery;
pub use bakery::{PointOfInterest, BAKERIES};

mod boundary;
pub use boundary::{parse_hex_color, BoundaryFade, BoundaryGeometry, BoundaryStyle};

mod camera;
pub use camera::{ease_out, CameraState, TransitionOptions};

mod progress;
pub use progress::ProgressIndicator;
