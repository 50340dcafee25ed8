//! Wire models for catalog search and detail responses.
//!
//! Kept tolerant: the catalog omits fields freely depending on data type, so
//! everything optional is `Option` or defaulted. Missing is never coerced to
//! zero.

use serde::{Deserialize, Serialize};

/// Catalog data type, ordered here roughly by how "generic" the records are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// Lab-analyzed generic foods.
    Foundation,
    /// Legacy standard-reference generic foods.
    SrLegacy,
    /// Survey (FNDDS) prepared/consumed foods ("Tzatziki dip", "Guacamole, NFS").
    Survey,
    /// Branded commercial products.
    Branded,
    /// Anything else the catalog starts returning.
    Other(String),
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Foundation" => DataType::Foundation,
            "SR Legacy" => DataType::SrLegacy,
            "Survey (FNDDS)" => DataType::Survey,
            "Branded" => DataType::Branded,
            _ => DataType::Other(value),
        }
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.as_str().to_string()
    }
}

impl DataType {
    /// The catalog's wire spelling for this data type.
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Foundation => "Foundation",
            DataType::SrLegacy => "SR Legacy",
            DataType::Survey => "Survey (FNDDS)",
            DataType::Branded => "Branded",
            DataType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_data_type")]
    pub data_type: DataType,
    #[serde(default, deserialize_with = "deserialize_food_category")]
    pub food_category: Option<String>,
}

fn default_data_type() -> DataType {
    DataType::Other(String::new())
}

/// Search envelope returned by the catalog.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<SearchHit>,
}

/// Full record from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetail {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_data_type")]
    pub data_type: DataType,
    #[serde(default, deserialize_with = "deserialize_food_category")]
    pub food_category: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrientRow>,
}

/// One nutrient row from the detail endpoint.
///
/// The detail format nests the nutrient definition; the search format
/// flattens it. Both shapes are accepted so mocks and fixtures can use the
/// flat one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrientRow {
    #[serde(default)]
    pub nutrient: Option<NutrientRef>,
    #[serde(default)]
    pub nutrient_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit_name: Option<String>,
}

impl FoodNutrientRow {
    /// Canonical catalog nutrient name, whichever shape carried it.
    pub fn name(&self) -> Option<&str> {
        self.nutrient
            .as_ref()
            .map(|n| n.name.as_str())
            .or(self.nutrient_name.as_deref())
    }

    /// Unit string, whichever shape carried it.
    pub fn unit(&self) -> Option<&str> {
        self.nutrient
            .as_ref()
            .and_then(|n| n.unit_name.as_deref())
            .or(self.unit_name.as_deref())
    }
}

/// Nested nutrient definition used by the detail format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit_name: Option<String>,
}

/// `foodCategory` arrives as a bare string in search responses and as an
/// object with a `description` field in detail responses.
fn deserialize_food_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CategoryShape {
        Text(String),
        Object { description: Option<String> },
    }

    let shape = Option::<CategoryShape>::deserialize(deserializer)?;
    Ok(match shape {
        Some(CategoryShape::Text(s)) => Some(s),
        Some(CategoryShape::Object { description }) => description,
        None => None,
    })
}
