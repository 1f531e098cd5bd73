//! Core data models for delivery planning.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::geometry::segments_intersect;

/// Per-axis tolerance (degrees) under which two positions are the same point.
pub const POSITION_EPSILON: f64 = 1e-9;

// ========== GEOMETRY MODELS ==========

/// A longitude/latitude pair in decimal degrees.
///
/// Equality is tolerant: positions reached along different paths may differ
/// by floating-point noise and still compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        (self.lng - other.lng).abs() <= POSITION_EPSILON
            && (self.lat - other.lat).abs() <= POSITION_EPSILON
    }
}

/// A named simple polygon (central area or no-fly zone).
///
/// Edges are consecutive vertex pairs plus the implicit closing edge. A ring
/// that repeats its first vertex at the end is accepted; the duplicate is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub vertices: Vec<Position>,
}

impl Region {
    pub fn new(name: impl Into<String>, vertices: Vec<Position>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }

    /// Vertices without the closing duplicate, if any.
    pub fn ring(&self) -> &[Position] {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) if self.vertices.len() > 1 && first == last => {
                &self.vertices[..self.vertices.len() - 1]
            }
            _ => &self.vertices,
        }
    }

    /// Boundary edges, including the closing edge from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        let ring = self.ring();
        let n = ring.len();
        (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
    }

    /// Check the polygon is usable for containment tests.
    ///
    /// Rejects rings with fewer than 3 vertices, non-finite coordinates,
    /// repeated consecutive vertices and crossing edges.
    pub fn validate(&self) -> PlannerResult<()> {
        let ring = self.ring();
        if ring.len() < 3 {
            return Err(self.invalid(format!(
                "polygon must have at least 3 vertices, got {}",
                ring.len()
            )));
        }
        if let Some(bad) = ring.iter().position(|vertex| !vertex.is_finite()) {
            return Err(self.invalid(format!("vertex {bad} is not a finite coordinate")));
        }

        let edges: Vec<(Position, Position)> = self.edges().collect();
        if let Some(idx) = edges.iter().position(|(a, b)| a == b) {
            return Err(self.invalid(format!("vertex {idx} is repeated")));
        }

        let n = edges.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    continue;
                }
                let (a1, a2) = edges[i];
                let (b1, b2) = edges[j];
                if segments_intersect(a1, a2, b1, b2) {
                    return Err(self.invalid(format!("edges {i} and {j} intersect")));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> PlannerError {
        PlannerError::InvalidRegion {
            name: self.name.clone(),
            reason,
        }
    }
}

// ========== RESTAURANT MODELS ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    pub name: String,
    pub price_in_pence: u32,
}

/// Day of the week as the REST service spells it (`"MONDAY"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// A participating restaurant and its menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: String,
    pub location: Position,
    pub opening_days: Vec<DayOfWeek>,
    pub menu: Vec<Pizza>,
}

impl Restaurant {
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        self.opening_days.contains(&DayOfWeek::from(date.weekday()))
    }

    pub fn serves(&self, pizza: &Pizza) -> bool {
        self.menu.contains(pizza)
    }
}

// ========== ORDER MODELS ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardInformation {
    pub credit_card_number: String,
    /// `MM/YY`
    pub credit_card_expiry: String,
    pub cvv: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Undefined,
    /// Failed validation; never flown
    Invalid,
    /// Passed validation, no route flown yet
    ValidButNotDelivered,
    Delivered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderValidationCode {
    #[default]
    Undefined,
    NoError,
    EmptyOrder,
    CardNumberInvalid,
    ExpiryDateInvalid,
    CvvInvalid,
    TotalIncorrect,
    PizzaNotDefined,
    MaxPizzaCountExceeded,
    PizzaFromMultipleRestaurants,
    RestaurantClosed,
}

/// A customer order as served by the REST service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_no: String,
    pub order_date: NaiveDate,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub order_validation_code: OrderValidationCode,
    pub price_total_in_pence: u32,
    pub pizzas_in_order: Vec<Pizza>,
    pub credit_card_information: CreditCardInformation,
}
