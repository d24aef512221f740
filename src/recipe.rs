//! TOML 배합표 파일 입출력.
//!
//! ```toml
//! [[ingredients]]
//! name = "SLES (70% active)"
//! percent = 12.0
//! active_frac = "0.70"   # 문자열도 허용, 숫자가 아니면 0.0
//! cost_per_kg = 1.85
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::formulation::IngredientRow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub ingredients: Vec<IngredientRow>,
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("recipe parse failed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("recipe serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 문자열에서 배합표를 읽는다.
pub fn parse_recipe(src: &str) -> Result<Vec<IngredientRow>, RecipeError> {
    let recipe: Recipe = toml::from_str(src)?;
    Ok(recipe.ingredients)
}

/// 파일에서 배합표를 읽는다.
pub fn load_recipe(path: &Path) -> Result<Vec<IngredientRow>, RecipeError> {
    let content = fs::read_to_string(path)?;
    let rows = parse_recipe(&content)?;
    info!(path = %path.display(), rows = rows.len(), "recipe loaded");
    Ok(rows)
}

/// 배합표를 파일로 저장한다.
pub fn save_recipe(path: &Path, rows: &[IngredientRow]) -> Result<(), RecipeError> {
    let recipe = Recipe {
        ingredients: rows.to_vec(),
    };
    fs::write(path, toml::to_string_pretty(&recipe)?)?;
    info!(path = %path.display(), rows = rows.len(), "recipe saved");
    Ok(())
}
