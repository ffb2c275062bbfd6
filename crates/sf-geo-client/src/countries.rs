use anyhow::Result;
use async_trait::async_trait;
use sf_api_types::Country;
use std::rc::Rc;
use tracing::{info, warn};

#[async_trait(?Send)]
pub trait CountryListSource {
    fn name(&self) -> &str;
    async fn countries(&self) -> Result<Vec<Country>>;
}

/// Used when every source fails or returns nothing usable.
pub fn fallback_countries() -> Vec<Country> {
    [
        ("US", "United States"),
        ("GB", "United Kingdom"),
        ("JP", "Japan"),
        ("KR", "South Korea"),
        ("CN", "China"),
        ("FR", "France"),
        ("DE", "Germany"),
        ("IN", "India"),
        ("BR", "Brazil"),
        ("CA", "Canada"),
    ]
    .into_iter()
    .map(|(code, name)| Country::new(code, name))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryListing {
    /// Sorted by display name.
    pub countries: Vec<Country>,
    pub from_fallback: bool,
}

impl CountryListing {
    /// Case-insensitive code lookup, returning the listed code.
    pub fn find(&self, code: &str) -> Option<&Country> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

/// Try each source in order; the first non-empty list wins.
pub async fn load_countries(sources: &[Rc<dyn CountryListSource>]) -> CountryListing {
    for source in sources {
        match source.countries().await {
            Ok(list) => {
                let list: Vec<Country> = list
                    .into_iter()
                    .filter(|c| !c.code.trim().is_empty() && !c.name.trim().is_empty())
                    .collect();
                if list.is_empty() {
                    warn!(source = source.name(), "country source returned no usable entries");
                    continue;
                }
                info!(source = source.name(), count = list.len(), "country list loaded");
                return CountryListing {
                    countries: sorted(list),
                    from_fallback: false,
                };
            }
            Err(err) => warn!(source = source.name(), error = %format!("{err:#}"), "country source failed"),
        }
    }
    CountryListing {
        countries: sorted(fallback_countries()),
        from_fallback: true,
    }
}

fn sorted(mut countries: Vec<Country>) -> Vec<Country> {
    countries.sort_by_cached_key(|c| c.name.to_lowercase());
    countries
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Fixed(Vec<Country>);

    #[async_trait(?Send)]
    impl CountryListSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn countries(&self) -> Result<Vec<Country>> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    #[async_trait(?Send)]
    impl CountryListSource for Down {
        fn name(&self) -> &str {
            "down"
        }
        async fn countries(&self) -> Result<Vec<Country>> {
            bail!("HTTP 503")
        }
    }

    #[tokio::test]
    async fn falls_back_to_ten_sorted_countries() {
        let listing = load_countries(&[Rc::new(Down), Rc::new(Fixed(vec![]))]).await;
        assert!(listing.from_fallback);
        assert_eq!(listing.countries.len(), 10);
        let names: Vec<&str> = listing.countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Brazil"));
        assert_eq!(names.last(), Some(&"United States"));
        assert!(names.windows(2).all(|w| w[0].to_lowercase() <= w[1].to_lowercase()));
    }

    #[tokio::test]
    async fn second_source_used_when_first_fails() {
        let listing = load_countries(&[
            Rc::new(Down),
            Rc::new(Fixed(vec![
                Country::new("NG", "Nigeria"),
                Country::new("", "Nowhere"),
                Country::new("AU", "Australia"),
            ])),
        ])
        .await;
        assert!(!listing.from_fallback);
        assert_eq!(
            listing.countries,
            vec![Country::new("AU", "Australia"), Country::new("NG", "Nigeria")]
        );
        assert_eq!(listing.find("ng").map(|c| c.code.as_str()), Some("NG"));
        assert!(listing.find("US").is_none());
    }
}
