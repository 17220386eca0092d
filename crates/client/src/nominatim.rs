//! Nominatim place search.

use std::future::Future;
use std::pin::Pin;

use roadwatch_disruptions::geo::Point;
use roadwatch_disruptions::models::geometry::validate_point;
use roadwatch_disruptions::{DataFetcher, DisruptionError, Place, PlaceSearch, Result};
use serde::Deserialize;

use crate::http::parse_url;

const RESULT_LIMIT: &str = "5";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    // Nominatim returns coordinates as strings
    lat: String,
    lon: String,
}

pub struct NominatimSearch<F> {
    fetcher: F,
    base_url: String,
    country_codes: String,
    suffix: String,
}

impl<F: DataFetcher> NominatimSearch<F> {
    pub fn new(
        fetcher: F,
        base_url: impl Into<String>,
        country_codes: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            country_codes: country_codes.into(),
            suffix: suffix.into(),
        }
    }

    /// Request URL for `query`, with the configured suffix appended
    pub fn search_url(&self, query: &str) -> Result<String> {
        let mut url = parse_url(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", RESULT_LIMIT)
            .append_pair("countrycodes", &self.country_codes)
            .append_pair("q", &format!("{}{}", query.trim(), self.suffix));
        Ok(url.into())
    }
}

impl<F: DataFetcher> PlaceSearch for NominatimSearch<F> {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Place>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.search_url(query)?;
            let bytes = self.fetcher.fetch(&url).await?;
            parse_nominatim_places(&bytes)
        })
    }
}

/// Parse a Nominatim `format=json` response. Entries with unparseable
/// coordinates are skipped.
pub fn parse_nominatim_places(bytes: &[u8]) -> Result<Vec<Place>> {
    let places: Vec<NominatimPlace> = serde_json::from_slice(bytes)?;

    Ok(places
        .into_iter()
        .filter_map(|place| match place_location(&place) {
            Ok(location) => Some(Place::new(place.display_name, location)),
            Err(err) => {
                tracing::debug!(name = %place.display_name, error = %err, "Skipping place");
                None
            }
        })
        .collect())
}

fn place_location(place: &NominatimPlace) -> Result<Point> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|err| DisruptionError::Parse(format!("bad coordinate {:?}: {}", raw, err)))
    };
    let point = Point::new(parse(&place.lon)?, parse(&place.lat)?);
    Ok(validate_point(point)?)
}
