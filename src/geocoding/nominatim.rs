use crate::{
    core::geo::{LatLng, LatLngBounds},
    traits::{PlaceGeometry, PlaceSearch, ReverseGeocoder},
    MapError, Result,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Reverse geocoding and place search against a Nominatim server
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    /// `[south, north, west, east]` as strings
    boundingbox: Option<Vec<String>>,
}

impl NominatimClient {
    /// Nominatim's usage policy requires an identifying user agent
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn parse_coordinate(value: &str, what: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MapError::Geocoding(format!("invalid {} in response: {:?}", what, value)))
}

fn parse_reverse(body: &str) -> Result<String> {
    let response: ReverseResponse = serde_json::from_str(body)?;
    match (response.display_name, response.error) {
        (Some(name), _) if !name.is_empty() => Ok(name),
        (_, Some(error)) => Err(MapError::Geocoding(error)),
        _ => Err(MapError::Geocoding("empty reverse geocoding result".to_string())),
    }
}

fn parse_search(body: &str) -> Result<Option<PlaceGeometry>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let location = LatLng::new(
        parse_coordinate(&hit.lat, "lat")?,
        parse_coordinate(&hit.lon, "lon")?,
    );
    let viewport = match hit.boundingbox.as_deref() {
        Some([south, north, west, east]) => Some(LatLngBounds::from_coords(
            parse_coordinate(south, "south")?,
            parse_coordinate(west, "west")?,
            parse_coordinate(north, "north")?,
            parse_coordinate(east, "east")?,
        )),
        _ => None,
    };

    Ok(Some(PlaceGeometry { location, viewport }))
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, position: LatLng) -> Result<String> {
        log::debug!("nominatim reverse lookup for {}", position);
        let body = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", position.lat.to_string()),
                ("lon", position.lng.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_reverse(&body)
    }
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    async fn search(&self, query: &str) -> Result<Option<PlaceGeometry>> {
        log::debug!("nominatim search for {:?}", query);
        let body = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "jsonv2"), ("limit", "1"), ("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_search(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reverse() {
        let body = r#"{"place_id":1,"display_name":"Rynek Główny, Kraków, Polska"}"#;
        assert_eq!(parse_reverse(body).unwrap(), "Rynek Główny, Kraków, Polska");

        let body = r#"{"error":"Unable to geocode"}"#;
        match parse_reverse(body) {
            Err(MapError::Geocoding(message)) => assert_eq!(message, "Unable to geocode"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_with_bounding_box() {
        let body = r#"[{"lat":"50.0619","lon":"19.9368",
            "boundingbox":["49.9","50.1","19.7","20.2"]}]"#;
        let place = parse_search(body).unwrap().unwrap();

        assert_eq!(place.location, LatLng::new(50.0619, 19.9368));
        assert_eq!(
            place.viewport,
            Some(LatLngBounds::from_coords(49.9, 19.7, 50.1, 20.2))
        );
    }

    #[test]
    fn test_parse_search_without_hits_or_box() {
        assert_eq!(parse_search("[]").unwrap(), None);

        let place = parse_search(r#"[{"lat":"1.5","lon":"2.5"}]"#).unwrap().unwrap();
        assert_eq!(place.viewport, None);

        assert!(parse_search(r#"[{"lat":"north","lon":"2.5"}]"#).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = NominatimClient::new("pinroute-tests")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
