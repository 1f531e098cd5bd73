pub mod error;
pub mod geometry;
pub mod models;
pub mod orders;
pub mod planner;

pub use error::{PlannerError, PlannerResult};
pub use geometry::{
    distance, is_close, is_in_region, project, Heading, CLOSE_THRESHOLD, HEADING_COUNT,
    HOVER_SENTINEL, MOVE_DISTANCE,
};
pub use models::{
    CreditCardInformation, DayOfWeek, Order, OrderStatus, OrderValidationCode, Pizza, Position,
    Region, Restaurant, POSITION_EPSILON,
};
pub use orders::{OrderValidator, Validation, MAX_PIZZAS_PER_ORDER, ORDER_CHARGE_IN_PENCE};
pub use planner::{plan, DroneMove, PlannedRoute, RoutePlanner, RoutePlannerConfig};
