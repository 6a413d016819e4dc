use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

use super::cache::CacheManager;
use crate::parser::{parse_listing, RawRecipe};
use crate::ui::Ui;

pub const DEFAULT_API_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// The API partitions its catalogue by first letter
pub const LETTERS: std::ops::RangeInclusive<char> = 'a'..='z';

pub struct CocktailClient {
    client: Client,
    base_url: String,
}

impl CocktailClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cocktails-to-sqlite")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn letter_url(&self, letter: char) -> String {
        format!("{}/search.php?f={}", self.base_url, letter)
    }

    /// Fetch the raw listing body for one letter. `None` when the API answers
    /// with anything other than 200.
    pub fn fetch_letter(&self, letter: char) -> Result<Option<String>> {
        let url = self.letter_url(letter);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, %status, "Skipping letter");
            return Ok(None);
        }

        let body = response.text().context("Failed to read response")?;
        Ok(Some(body))
    }
}

/// Fetch every letter, reusing cached listings unless `force` is set.
/// Returns one recipe collection per letter that produced a listing.
pub fn fetch_all(
    client: &CocktailClient,
    cache: &CacheManager,
    force: bool,
    ui: &mut impl Ui,
) -> Result<Vec<Vec<RawRecipe>>> {
    let total = LETTERS.count() as u64;
    let mut partitions = Vec::new();

    for (idx, letter) in LETTERS.enumerate() {
        if ui.cancelled() {
            bail!("Cancelled while fetching letter {}", letter);
        }
        ui.set_progress(idx as u64, total, format!("letter {}", letter));

        let body = if !force && cache.is_cached(letter) {
            Some(cache.read_letter(letter)?)
        } else {
            let fetched = client.fetch_letter(letter)?;
            if let Some(body) = &fetched {
                cache.write_letter(letter, body)?;
            }
            fetched
        };

        let Some(body) = body else { continue };
        let recipes = parse_listing(&body)
            .with_context(|| format!("Failed to parse listing for letter {}", letter))?;

        if !recipes.is_empty() {
            ui.log(format!("{}: {} drinks", letter, recipes.len()));
            partitions.push(recipes);
        }
    }

    ui.set_progress(total, total, "done");
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_url() {
        let client = CocktailClient::new("https://example.test/api/").unwrap();
        assert_eq!(client.letter_url('m'), "https://example.test/api/search.php?f=m");

        let client = CocktailClient::new(DEFAULT_API_URL).unwrap();
        assert_eq!(
            client.letter_url('a'),
            "https://www.thecocktaildb.com/api/json/v1/1/search.php?f=a"
        );
    }

    #[test]
    fn test_letters() {
        assert_eq!(LETTERS.count(), 26);
    }
}
