//! HTTP adapters for the public geo-IP and country-list services.
//!
//! Each adapter splits into a transport call and a pure `parse_*` function
//! so the payload handling can be tested without a network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use sf_api_types::{Country, GeoLocation};
use sf_geo_client::{CountryListSource, GeoProvider};
use std::rc::Rc;
use tracing::debug;

pub const IPWHO_URL: &str = "https://ipwho.is/";
pub const IPAPI_URL: &str = "https://ipapi.co/json/";
pub const FREEIPAPI_URL: &str = "https://freeipapi.com/api/json";
pub const GEONAMES_URL: &str = "https://secure.geonames.org/countryInfoJSON?username=demo";
pub const RESTCOUNTRIES_URL: &str = "https://restcountries.com/v2/all?fields=name,alpha2Code";

async fn get_text(http: &reqwest::Client, url: &str) -> Result<String> {
    let response = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url} transport"))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!("GET {url} HTTP {status}: {text}");
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("GET {url} body"))?;
    debug!(url, bytes = text.len(), "fetched");
    Ok(text)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── geo-IP providers ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct IpWhoResponse {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    postal: Option<String>,
}

pub fn parse_ipwho(body: &str) -> Result<GeoLocation> {
    let r: IpWhoResponse = serde_json::from_str(body).context("ipwho.is parse")?;
    Ok(GeoLocation {
        country_code: non_blank(r.country_code),
        country_name: non_blank(r.country),
        city: non_blank(r.city),
        region: non_blank(r.region),
        postal: non_blank(r.postal),
    })
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    postal: Option<String>,
}

pub fn parse_ipapi(body: &str) -> Result<GeoLocation> {
    let r: IpApiResponse = serde_json::from_str(body).context("ipapi.co parse")?;
    Ok(GeoLocation {
        country_code: non_blank(r.country_code),
        country_name: non_blank(r.country_name),
        city: non_blank(r.city),
        region: non_blank(r.region),
        postal: non_blank(r.postal),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreeIpApiResponse {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    city_name: Option<String>,
    #[serde(default)]
    region_name: Option<String>,
    #[serde(default)]
    zip_code: Option<String>,
}

pub fn parse_freeipapi(body: &str) -> Result<GeoLocation> {
    let r: FreeIpApiResponse = serde_json::from_str(body).context("freeipapi.com parse")?;
    Ok(GeoLocation {
        country_code: non_blank(r.country_code),
        country_name: non_blank(r.country_name),
        city: non_blank(r.city_name),
        region: non_blank(r.region_name),
        postal: non_blank(r.zip_code).filter(|z| z != "-"),
    })
}

/// One geo-IP endpoint and the parser for its payload.
pub struct HttpGeoProvider {
    name: &'static str,
    url: String,
    parse: fn(&str) -> Result<GeoLocation>,
    http: reqwest::Client,
}

impl HttpGeoProvider {
    pub fn ipwho(http: reqwest::Client) -> Self {
        Self::new("ipwho.is", IPWHO_URL, parse_ipwho, http)
    }

    pub fn ipapi(http: reqwest::Client) -> Self {
        Self::new("ipapi.co", IPAPI_URL, parse_ipapi, http)
    }

    pub fn freeipapi(http: reqwest::Client) -> Self {
        Self::new("freeipapi.com", FREEIPAPI_URL, parse_freeipapi, http)
    }

    pub fn new(
        name: &'static str,
        url: &str,
        parse: fn(&str) -> Result<GeoLocation>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            name,
            url: url.to_owned(),
            parse,
            http,
        }
    }
}

#[async_trait(?Send)]
impl GeoProvider for HttpGeoProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn locate(&self) -> Result<GeoLocation> {
        let body = get_text(&self.http, &self.url).await?;
        (self.parse)(&body)
    }
}

/// The three providers in fallback order.
pub fn default_providers(http: &reqwest::Client) -> Vec<Rc<dyn GeoProvider>> {
    vec![
        Rc::new(HttpGeoProvider::ipwho(http.clone())),
        Rc::new(HttpGeoProvider::ipapi(http.clone())),
        Rc::new(HttpGeoProvider::freeipapi(http.clone())),
    ]
}

// ── country lists ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeoNamesResponse {
    geonames: Vec<GeoNamesCountry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeoNamesCountry {
    country_code: String,
    country_name: String,
}

pub fn parse_geonames(body: &str) -> Result<Vec<Country>> {
    let r: GeoNamesResponse = serde_json::from_str(body).context("geonames parse")?;
    Ok(r.geonames
        .into_iter()
        .map(|c| Country {
            code: c.country_code,
            name: c.country_name,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestCountry {
    name: String,
    alpha2_code: String,
}

pub fn parse_restcountries(body: &str) -> Result<Vec<Country>> {
    let r: Vec<RestCountry> = serde_json::from_str(body).context("restcountries parse")?;
    Ok(r.into_iter()
        .map(|c| Country {
            code: c.alpha2_code,
            name: c.name,
        })
        .collect())
}

pub struct HttpCountrySource {
    name: &'static str,
    url: String,
    parse: fn(&str) -> Result<Vec<Country>>,
    http: reqwest::Client,
}

impl HttpCountrySource {
    pub fn geonames(http: reqwest::Client) -> Self {
        Self {
            name: "geonames",
            url: GEONAMES_URL.to_owned(),
            parse: parse_geonames,
            http,
        }
    }

    pub fn restcountries(http: reqwest::Client) -> Self {
        Self {
            name: "restcountries",
            url: RESTCOUNTRIES_URL.to_owned(),
            parse: parse_restcountries,
            http,
        }
    }
}

#[async_trait(?Send)]
impl CountryListSource for HttpCountrySource {
    fn name(&self) -> &str {
        self.name
    }

    async fn countries(&self) -> Result<Vec<Country>> {
        let body = get_text(&self.http, &self.url).await?;
        (self.parse)(&body)
    }
}

pub fn default_country_sources(http: &reqwest::Client) -> Vec<Rc<dyn CountryListSource>> {
    vec![
        Rc::new(HttpCountrySource::geonames(http.clone())),
        Rc::new(HttpCountrySource::restcountries(http.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipwho_maps_all_address_parts() -> anyhow::Result<()> {
        let loc = parse_ipwho(
            r#"{"ip":"1.2.3.4","success":true,"country":"Japan","country_code":"JP",
                "region":"Tokyo","city":"Shibuya","postal":"150-0002"}"#,
        )?;
        assert_eq!(loc.country().map(|c| c.to_string()), Some("JP".to_owned()));
        assert_eq!(loc.country_name.as_deref(), Some("Japan"));
        assert_eq!(loc.city.as_deref(), Some("Shibuya"));
        assert_eq!(loc.region.as_deref(), Some("Tokyo"));
        assert_eq!(loc.postal.as_deref(), Some("150-0002"));
        Ok(())
    }

    #[test]
    fn ipwho_failure_payload_has_no_country() -> anyhow::Result<()> {
        let loc = parse_ipwho(r#"{"success":false,"message":"Reserved range","country_code":""}"#)?;
        assert!(loc.country().is_none());
        Ok(())
    }

    #[test]
    fn ipapi_and_freeipapi_use_their_own_keys() -> anyhow::Result<()> {
        let a = parse_ipapi(r#"{"country_code":"gb","country_name":"United Kingdom","city":"London"}"#)?;
        assert_eq!(a.country().map(|c| c.to_string()), Some("GB".to_owned()));
        assert_eq!(a.country_name.as_deref(), Some("United Kingdom"));

        let f = parse_freeipapi(
            r#"{"countryCode":"NG","countryName":"Nigeria","cityName":"Lagos","regionName":"Lagos","zipCode":"-"}"#,
        )?;
        assert_eq!(f.country_code.as_deref(), Some("NG"));
        assert_eq!(f.city.as_deref(), Some("Lagos"));
        assert_eq!(f.postal, None);
        Ok(())
    }

    #[test]
    fn country_lists_parse() -> anyhow::Result<()> {
        let g = parse_geonames(
            r#"{"geonames":[{"countryCode":"AD","countryName":"Andorra","population":"77006"}]}"#,
        )?;
        assert_eq!(g, vec![Country::new("AD", "Andorra")]);

        let r = parse_restcountries(r#"[{"name":"Kenya","alpha2Code":"KE","independent":true}]"#)?;
        assert_eq!(r, vec![Country::new("KE", "Kenya")]);
        Ok(())
    }

    #[test]
    fn malformed_country_payload_is_an_error() {
        assert!(parse_geonames(r#"{"status":{"message":"user account not enabled"}}"#).is_err());
        assert!(parse_restcountries(r#"{"status":404}"#).is_err());
    }
}
