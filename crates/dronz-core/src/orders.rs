//! Order validation rules.

use chrono::{Datelike, NaiveDate};

use crate::models::{Order, OrderStatus, OrderValidationCode, Restaurant};

/// Flat delivery charge added to every order total.
pub const ORDER_CHARGE_IN_PENCE: u32 = 100;
/// Most pizzas a drone can carry in one order.
pub const MAX_PIZZAS_PER_ORDER: usize = 4;

/// Result of validating one order.
#[derive(Debug, Clone, Copy)]
pub struct Validation<'r> {
    pub code: OrderValidationCode,
    /// The single restaurant the order is from, set only for valid orders.
    pub restaurant: Option<&'r Restaurant>,
}

impl Validation<'_> {
    pub fn is_valid(&self) -> bool {
        self.code == OrderValidationCode::NoError
    }

    pub fn status(&self) -> OrderStatus {
        if self.is_valid() {
            OrderStatus::ValidButNotDelivered
        } else {
            OrderStatus::Invalid
        }
    }
}

/// Checks orders against the day's restaurants.
///
/// Rules run in a fixed order and the first failure decides the code.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderValidator;

impl OrderValidator {
    pub fn validate<'r>(&self, order: &Order, restaurants: &'r [Restaurant]) -> Validation<'r> {
        let invalid = |code| Validation {
            code,
            restaurant: None,
        };
        let card = &order.credit_card_information;
        let pizzas = &order.pizzas_in_order;

        if pizzas.is_empty() {
            return invalid(OrderValidationCode::EmptyOrder);
        }
        if !is_digits(&card.credit_card_number, 16) {
            return invalid(OrderValidationCode::CardNumberInvalid);
        }
        if !card_expiry_valid(&card.credit_card_expiry, order.order_date) {
            return invalid(OrderValidationCode::ExpiryDateInvalid);
        }
        if !is_digits(&card.cvv, 3) {
            return invalid(OrderValidationCode::CvvInvalid);
        }
        if pizzas.len() > MAX_PIZZAS_PER_ORDER {
            return invalid(OrderValidationCode::MaxPizzaCountExceeded);
        }
        if !pizzas
            .iter()
            .all(|pizza| restaurants.iter().any(|r| r.serves(pizza)))
        {
            return invalid(OrderValidationCode::PizzaNotDefined);
        }

        let suppliers: Vec<&Restaurant> = restaurants
            .iter()
            .filter(|r| pizzas.iter().any(|pizza| r.serves(pizza)))
            .collect();
        let &[restaurant] = suppliers.as_slice() else {
            return invalid(OrderValidationCode::PizzaFromMultipleRestaurants);
        };
        if !restaurant.is_open_on(order.order_date) {
            return invalid(OrderValidationCode::RestaurantClosed);
        }

        let pizza_total: u32 = pizzas.iter().map(|pizza| pizza.price_in_pence).sum();
        if pizza_total + ORDER_CHARGE_IN_PENCE != order.price_total_in_pence {
            return invalid(OrderValidationCode::TotalIncorrect);
        }

        Validation {
            code: OrderValidationCode::NoError,
            restaurant: Some(restaurant),
        }
    }

    /// Validate and record the outcome on the order itself.
    pub fn apply<'r>(&self, order: &mut Order, restaurants: &'r [Restaurant]) -> Validation<'r> {
        let validation = self.validate(order, restaurants);
        order.order_validation_code = validation.code;
        order.order_status = validation.status();
        validation
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// `MM/YY`; the card is good through the last day of that month.
fn card_expiry_valid(expiry: &str, order_date: NaiveDate) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    if !is_digits(month, 2) || !is_digits(year, 2) {
        return false;
    }
    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }
    (order_date.year(), order_date.month()) <= (2000 + year, month)
}
