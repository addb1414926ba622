/// Fraction of the remaining distance `current` closes toward `target` each frame.
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.05;

/// Smallest smoothing factor accepted; anything lower would never converge in practice.
pub const MIN_SMOOTHING_FACTOR: f32 = 0.001;

/// Catmull-Rom tension (0.5 is the centripetal-free "classic" spline).
pub const DEFAULT_TENSION: f32 = 0.5;

/// Parametric distance between the camera and the point it looks at.
pub const DEFAULT_LOOK_AHEAD_DELTA: f32 = 0.03;

/// Progress at which an open path hands over to the exit flight.
pub const DEFAULT_CAMERA_THRESHOLD: f32 = 1.0;

/// Progress is capped here before the camera is evaluated.
pub const DEFAULT_OVERSHOOT_CAP: f32 = 1.3;

/// World units travelled past the tunnel mouth per unit of progress.
pub const DEFAULT_EXIT_SPEED: f32 = 150.0;

/// Parametric span used to measure the direction of the curve's final segment.
pub const END_DIRECTION_DELTA: f32 = 0.01;

/// Number of chords used to approximate arc length along a path.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// Divisor applied to the pointer look offset each frame.
pub const LOOK_OFFSET_DIVISOR: f32 = 15.0;

/// Yaw reached at the left and right edges of the viewport (radians).
pub const LOOK_YAW_RANGE: [f32; 2] = [0.1, -0.1];

/// Pitch reached at the top and bottom edges of the viewport (radians).
pub const LOOK_PITCH_RANGE: [f32; 2] = [-0.1, 0.1];

/// Starfield opacity gained per frame while flying out of the tunnel.
pub const STARFIELD_FADE_STEP: f32 = 0.1;
