//! Result file writers.
//!
//! Three files per day, all pretty-printed JSON:
//! `deliveries-<date>.json`, `flightpath-<date>.json`, `drone-<date>.geojson`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use dronz_core::models::{Order, OrderStatus, OrderValidationCode};

use crate::dispatch::{DeliveryDay, OrderFlight};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord<'a> {
    pub order_no: &'a str,
    pub order_status: OrderStatus,
    pub order_validation_code: OrderValidationCode,
    pub cost_in_pence: u32,
}

impl<'a> From<&'a Order> for DeliveryRecord<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            order_no: &order.order_no,
            order_status: order.order_status,
            order_validation_code: order.order_validation_code,
            cost_in_pence: order.price_total_in_pence,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightpathRecord<'a> {
    pub order_no: &'a str,
    pub from_longitude: f64,
    pub from_latitude: f64,
    /// Compass degrees, or 999 for a hover.
    pub angle: f64,
    pub to_longitude: f64,
    pub to_latitude: f64,
}

pub fn deliveries(orders: &[Order]) -> Vec<DeliveryRecord<'_>> {
    orders.iter().map(DeliveryRecord::from).collect()
}

pub fn flightpath(flights: &[OrderFlight]) -> Vec<FlightpathRecord<'_>> {
    flights
        .iter()
        .flat_map(|flight| {
            flight.moves.iter().map(|m| FlightpathRecord {
                order_no: &flight.order_no,
                from_longitude: m.previous.lng,
                from_latitude: m.previous.lat,
                angle: m.heading.degrees(),
                to_longitude: m.current.lng,
                to_latitude: m.current.lat,
            })
        })
        .collect()
}

/// The whole day's flying as one LineString, starting at the first origin.
pub fn drone_geojson(flights: &[OrderFlight]) -> Value {
    let origin = flights
        .iter()
        .find_map(|flight| flight.moves.first())
        .map(|m| m.previous);
    let coordinates: Vec<[f64; 2]> = origin
        .into_iter()
        .chain(
            flights
                .iter()
                .flat_map(|flight| flight.moves.iter().map(|m| m.current)),
        )
        .map(|p| [p.lng, p.lat])
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
            "properties": {},
        }],
    })
}

fn file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}-{}.{}", prefix, date.format("%Y-%m-%d"), extension)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Write all three files into `dir`, creating it if needed.
pub fn write_all(dir: &Path, day: &DeliveryDay) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let deliveries_path = dir.join(file_name("deliveries", day.date, "json"));
    write_json(&deliveries_path, &deliveries(&day.orders))?;

    let flightpath_path = dir.join(file_name("flightpath", day.date, "json"));
    write_json(&flightpath_path, &flightpath(&day.flights))?;

    let geojson_path = dir.join(file_name("drone", day.date, "geojson"));
    write_json(&geojson_path, &drone_geojson(&day.flights))?;

    Ok(vec![deliveries_path, flightpath_path, geojson_path])
}
