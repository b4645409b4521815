pub const GRID_WIDTH: usize = 64;
pub const GRID_HEIGHT: usize = 64;
pub const CELL_SIZE: f32 = 16.0;

/// Radius of the circular downtown exclusion zone around the map center.
/// Inside it only the downtown placement path may stamp buildings.
pub const DOWNTOWN_RADIUS: f32 = 12.0;

/// Number of points approximating the ring road circle.
pub const RING_ROAD_POINTS: usize = 32;

/// Hard cap on road-growth queue iterations. The only bounded-termination
/// guarantee in the generator; adversarial density fields must not loop.
pub const MAX_GROWTH_ITERATIONS: usize = 200;

/// Length in cells of a branch road spawned by the growth rules.
pub const BRANCH_LENGTH: i32 = 10;

/// Population density below which a placed segment never branches.
pub const BRANCH_DENSITY_THRESHOLD: f32 = 0.3;

/// Blocks smaller than this are too small to subdivide usefully.
pub const MIN_BLOCK_CELLS: usize = 20;

/// Lots smaller than this cannot hold any building footprint.
pub const MIN_LOT_CELLS: usize = 8;

/// Downtown micro-lots are carved on this stride.
pub const DOWNTOWN_LOT_SIZE: usize = 4;

/// Parks placed during the decorative pass, and attempts per park.
pub const PARK_COUNT: usize = 2;
pub const PARK_SITE_ATTEMPTS: usize = 50;
pub const PARK_SIZE: usize = 10;
pub const POND_SIZE: usize = 3;

/// Manhattan distance within which the player can interact with the
/// current objective's target.
pub const INTERACT_RANGE: i32 = 3;

/// Seconds the "new objective" toast stays up.
pub const OBJECTIVE_NOTIFICATION_SECS: f32 = 3.0;
