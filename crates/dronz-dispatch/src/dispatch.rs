//! One day of deliveries: validate, route, record.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use thiserror::Error;

use dronz_core::models::{Order, OrderStatus, Position, Region, Restaurant};
use dronz_core::orders::OrderValidator;
use dronz_core::planner::{DroneMove, PlannedRoute, RoutePlanner};
use dronz_core::PlannerError;
use dronz_rest::DronzClient;

use crate::backoff::{retry, Backoff};
use crate::cache::RouteCache;
use crate::config::Config;
use crate::output;

/// Appleton Tower, where every flight starts and ends.
pub const APPLETON_TOWER: Position = Position::new(-3.186874, 55.944494);

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("flight regions rejected: {0}")]
    Regions(#[from] PlannerError),

    #[error("no route from restaurant '{restaurant}': {source}")]
    Route {
        restaurant: String,
        #[source]
        source: PlannerError,
    },

    #[error("planning task for restaurant '{restaurant}' did not finish: {source}")]
    Task {
        restaurant: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// The moves flown for one order: out to the restaurant, then back to base.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFlight {
    pub order_no: String,
    pub moves: Vec<DroneMove>,
}

impl OrderFlight {
    /// Fly `return_leg` backwards to the restaurant, hover for pickup, then
    /// fly it forwards to the drop-off hover.
    pub fn round_trip(order_no: impl Into<String>, return_leg: &PlannedRoute) -> Self {
        let mut moves = return_leg.reversed().moves;
        moves.extend(return_leg.moves.iter().copied());
        Self {
            order_no: order_no.into(),
            moves,
        }
    }
}

/// Everything the day's output files are written from.
#[derive(Debug, Clone)]
pub struct DeliveryDay {
    pub date: NaiveDate,
    pub orders: Vec<Order>,
    pub flights: Vec<OrderFlight>,
}

impl DeliveryDay {
    pub fn delivered(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| o.order_status == OrderStatus::Delivered)
            .count()
    }
}

/// Inputs fetched from the REST service for one date.
#[derive(Debug, Clone)]
pub struct DayInputs {
    pub restaurants: Vec<Restaurant>,
    pub orders: Vec<Order>,
    pub central_area: Region,
    pub no_fly_zones: Vec<Region>,
}

pub fn build_planner(
    inputs: &DayInputs,
    config: &Config,
) -> std::result::Result<RoutePlanner, DispatchError> {
    let planner = RoutePlanner::new(
        Some(inputs.central_area.clone()),
        inputs.no_fly_zones.clone(),
    )?;
    Ok(planner.with_config(config.planner_config()))
}

/// Validate every order and fly the valid ones from `base`.
///
/// Routes are planned restaurant to base, so the central area rule holds on
/// the loaded leg: once the drone is in, it stays in until drop-off. Each
/// distinct restaurant is planned once, all in parallel on the blocking pool.
/// Orders whose route fails stay `VALID_BUT_NOT_DELIVERED`.
pub async fn dispatch_orders(
    date: NaiveDate,
    mut orders: Vec<Order>,
    restaurants: &[Restaurant],
    cache: Arc<RouteCache>,
    base: Position,
) -> DeliveryDay {
    let validator = OrderValidator;
    let mut targets: Vec<(usize, String)> = Vec::new();
    let mut pickups: BTreeMap<String, Position> = BTreeMap::new();

    for (idx, order) in orders.iter_mut().enumerate() {
        let validation = validator.apply(order, restaurants);
        match validation.restaurant {
            Some(restaurant) => {
                pickups
                    .entry(restaurant.name.clone())
                    .or_insert(restaurant.location);
                targets.push((idx, restaurant.name.clone()));
            }
            None => tracing::debug!(
                "Order {} rejected: {:?}",
                order.order_no,
                validation.code
            ),
        }
    }

    tracing::info!(
        "{} of {} orders valid, {} restaurants to route",
        targets.len(),
        orders.len(),
        pickups.len()
    );

    let routes = plan_routes(&cache, base, pickups).await;

    let mut flights = Vec::with_capacity(targets.len());
    for (idx, restaurant) in targets {
        let order = &mut orders[idx];
        match routes.get(&restaurant) {
            Some(Ok(route)) => {
                flights.push(OrderFlight::round_trip(order.order_no.clone(), route));
                order.order_status = OrderStatus::Delivered;
            }
            Some(Err(err)) => {
                tracing::warn!("Order {} not delivered: {}", order.order_no, err);
            }
            None => {
                tracing::warn!("Order {} not delivered: no route planned", order.order_no);
            }
        }
    }

    DeliveryDay {
        date,
        orders,
        flights,
    }
}

async fn plan_routes(
    cache: &Arc<RouteCache>,
    base: Position,
    pickups: BTreeMap<String, Position>,
) -> HashMap<String, std::result::Result<Arc<PlannedRoute>, DispatchError>> {
    let tasks = pickups.into_iter().map(|(restaurant, location)| {
        let cache = Arc::clone(cache);
        let handle = tokio::task::spawn_blocking(move || cache.get_or_plan(location, base));
        async move {
            let result = match handle.await {
                Ok(Ok(route)) => {
                    tracing::info!(
                        "Route from {} planned: {} moves, {} nodes expanded",
                        restaurant,
                        route.step_count(),
                        route.nodes_expanded
                    );
                    Ok(route)
                }
                Ok(Err(source)) => Err(DispatchError::Route {
                    restaurant: restaurant.clone(),
                    source,
                }),
                Err(source) => Err(DispatchError::Task {
                    restaurant: restaurant.clone(),
                    source,
                }),
            };
            (restaurant, result)
        }
    });

    join_all(tasks).await.into_iter().collect()
}

/// Fetch the day's inputs, retrying each request with backoff.
pub async fn fetch_inputs(client: &DronzClient, date: NaiveDate, retries: u32) -> Result<DayInputs> {
    let alive = retry("isAlive", retries, Backoff::default(), || async {
        if client.is_alive().await {
            Ok(())
        } else {
            Err(anyhow::anyhow!("service at {} is not alive", client.base_url()))
        }
    });
    alive.await?;

    let restaurants = retry("restaurants", retries, Backoff::default(), || client.restaurants());
    let orders = retry("orders", retries, Backoff::default(), || client.orders_for_date(date));
    let central_area = retry("centralArea", retries, Backoff::default(), || client.central_area());
    let no_fly_zones = retry("noFlyZones", retries, Backoff::default(), || client.no_fly_zones());

    let (restaurants, orders, central_area, no_fly_zones) =
        tokio::try_join!(restaurants, orders, central_area, no_fly_zones)?;

    Ok(DayInputs {
        restaurants,
        orders,
        central_area,
        no_fly_zones,
    })
}

/// Fetch, plan and write the three result files for `date`.
pub async fn run(config: &Config, date: NaiveDate) -> Result<DeliveryDay> {
    let client = DronzClient::new(config.rest_url.clone())?;
    let inputs = fetch_inputs(&client, date, config.fetch_retries).await?;
    tracing::info!(
        "Fetched {} orders, {} restaurants, {} no-fly zones for {}",
        inputs.orders.len(),
        inputs.restaurants.len(),
        inputs.no_fly_zones.len(),
        date
    );

    let planner = build_planner(&inputs, config).context("Failed to build route planner")?;
    let cache = Arc::new(RouteCache::new(planner));

    let day = dispatch_orders(
        date,
        inputs.orders,
        &inputs.restaurants,
        cache,
        APPLETON_TOWER,
    )
    .await;

    output::write_all(&config.output_dir, &day)?;
    tracing::info!(
        "{}: {} of {} orders delivered",
        date,
        day.delivered(),
        day.orders.len()
    );
    Ok(day)
}
