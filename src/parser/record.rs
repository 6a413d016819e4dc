use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Number of positional ingredient/measure pairs in an API record
pub const MAX_INGREDIENTS: usize = 15;

/// One positional `strIngredientN` / `strMeasureN` pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientSlot {
    pub name: Option<String>,
    pub measure: Option<String>,
}

impl IngredientSlot {
    pub fn new(name: impl Into<String>, measure: Option<&str>) -> Self {
        Self {
            name: Some(name.into()),
            measure: measure.map(str::to_string),
        }
    }
}

/// A recipe exactly as TheCocktailDB returns it, with the positional
/// ingredient fields gathered into `ingredients`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecipe {
    pub id: i64,
    pub name: Option<String>,
    pub tags: Option<String>,
    pub video: Option<String>,
    pub category: Option<String>,
    pub iba: Option<String>,
    pub alcoholic: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    pub instructions_de: Option<String>,
    pub instructions_es: Option<String>,
    pub instructions_it: Option<String>,
    pub thumbnail: Option<String>,
    pub date_modified: Option<String>,
    pub ingredients: Vec<IngredientSlot>,
}

/// `idDrink` arrives as a string of digits; plain integers are accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DrinkId {
    Text(String),
    Number(i64),
}

impl DrinkId {
    fn value(self) -> Result<i64> {
        match self {
            DrinkId::Number(n) => Ok(n),
            DrinkId::Text(s) => s
                .trim()
                .parse()
                .with_context(|| format!("idDrink is not numeric: {:?}", s)),
        }
    }
}

/// Wire shape of one drink object
#[derive(Debug, Deserialize)]
struct ApiDrink {
    #[serde(rename = "idDrink")]
    id: DrinkId,
    #[serde(rename = "strDrink")]
    name: Option<String>,
    #[serde(rename = "strTags")]
    tags: Option<String>,
    #[serde(rename = "strVideo")]
    video: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strIBA")]
    iba: Option<String>,
    #[serde(rename = "strAlcoholic")]
    alcoholic: Option<String>,
    #[serde(rename = "strGlass")]
    glass: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strInstructionsDE")]
    instructions_de: Option<String>,
    #[serde(rename = "strInstructionsES")]
    instructions_es: Option<String>,
    #[serde(rename = "strInstructionsIT")]
    instructions_it: Option<String>,
    #[serde(rename = "strDrinkThumb")]
    thumbnail: Option<String>,
    #[serde(rename = "dateModified")]
    date_modified: Option<String>,
    /// `strIngredient1..15`, `strMeasure1..15` and anything else the API adds
    #[serde(flatten)]
    positional: HashMap<String, Value>,
}

impl ApiDrink {
    fn positional_text(&self, key: &str) -> Option<String> {
        self.positional
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn into_recipe(self) -> Result<RawRecipe> {
        let ingredients = (1..=MAX_INGREDIENTS)
            .map(|n| IngredientSlot {
                name: self.positional_text(&format!("strIngredient{}", n)),
                measure: self.positional_text(&format!("strMeasure{}", n)),
            })
            .collect();

        Ok(RawRecipe {
            id: self.id.value()?,
            name: self.name,
            tags: self.tags,
            video: self.video,
            category: self.category,
            iba: self.iba,
            alcoholic: self.alcoholic,
            glass: self.glass,
            instructions: self.instructions,
            instructions_de: self.instructions_de,
            instructions_es: self.instructions_es,
            instructions_it: self.instructions_it,
            thumbnail: self.thumbnail,
            date_modified: self.date_modified,
            ingredients,
        })
    }
}

/// Parse one `search.php?f=<letter>` response body into its recipes.
/// `{"drinks": null}` is an empty listing.
pub fn parse_listing(body: &str) -> Result<Vec<RawRecipe>> {
    let json: Value = serde_json::from_str(body).context("Failed to parse JSON")?;

    let drinks = match json.get("drinks") {
        None => bail!("Listing has no \"drinks\" field"),
        Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => bail!("Expected \"drinks\" to be an array, found {}", other),
    };

    drinks
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            parse_recipe(item).with_context(|| format!("Malformed recipe at index {}", idx))
        })
        .collect()
}

/// Map a single JSON drink object onto a [`RawRecipe`]
pub fn parse_recipe(json: &Value) -> Result<RawRecipe> {
    if !json.is_object() {
        bail!("Expected a JSON object, found {}", json);
    }

    ApiDrink::deserialize(json)
        .context("Failed to decode drink")?
        .into_recipe()
}
