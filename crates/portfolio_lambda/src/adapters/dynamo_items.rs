use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use portfolio_core::analysis::{AnalysisRecord, AnalysisStatus};
use portfolio_core::recipe::{Ingredient, Recipe, Step};

pub type Item = HashMap<String, AttributeValue>;

pub fn recipe_to_item(recipe: &Recipe) -> Item {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ingredient| entry_to_attribute(ingredient.id, &ingredient.description))
        .collect();
    let steps = recipe
        .steps
        .iter()
        .map(|step| entry_to_attribute(step.id, &step.description))
        .collect();

    HashMap::from([
        ("id".to_string(), AttributeValue::S(recipe.id.clone())),
        ("title".to_string(), AttributeValue::S(recipe.title.clone())),
        ("ingredients".to_string(), AttributeValue::L(ingredients)),
        ("steps".to_string(), AttributeValue::L(steps)),
        ("likes".to_string(), AttributeValue::N(recipe.likes.to_string())),
    ])
}

pub fn recipe_from_item(item: &Item) -> Result<Recipe, String> {
    let ingredients = list_attr(item, "ingredients")?
        .iter()
        .map(|value| {
            entry_from_attribute(value, "ingredients")
                .map(|(id, description)| Ingredient { id, description })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let steps = list_attr(item, "steps")?
        .iter()
        .map(|value| {
            entry_from_attribute(value, "steps").map(|(id, description)| Step { id, description })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Recipe {
        id: string_attr(item, "id")?,
        title: string_attr(item, "title")?,
        ingredients,
        steps,
        likes: number_attr::<u64>(item, "likes")?,
    })
}

pub fn analysis_to_item(record: &AnalysisRecord) -> Item {
    let issues = record
        .issues
        .iter()
        .map(|issue| AttributeValue::S(issue.clone()))
        .collect();
    let scores = record
        .scores
        .iter()
        .map(|(name, score)| (name.clone(), AttributeValue::N(score.to_string())))
        .collect();

    HashMap::from([
        ("image_id".to_string(), AttributeValue::S(record.image_id.clone())),
        ("record_id".to_string(), AttributeValue::S(record.record_id.clone())),
        ("s3_path".to_string(), AttributeValue::S(record.s3_path.clone())),
        (
            "status".to_string(),
            AttributeValue::S(record.status.as_str().to_string()),
        ),
        ("issues".to_string(), AttributeValue::L(issues)),
        ("scores".to_string(), AttributeValue::M(scores)),
    ])
}

pub fn analysis_from_item(item: &Item) -> Result<AnalysisRecord, String> {
    let raw_status = string_attr(item, "status")?;
    let status = AnalysisStatus::parse(&raw_status)
        .ok_or_else(|| format!("unknown analysis status '{raw_status}'"))?;

    // Older rows stored issues as a string set.
    let issues = match item.get("issues") {
        None => Vec::new(),
        Some(AttributeValue::Ss(values)) => values.clone(),
        Some(AttributeValue::L(values)) => values
            .iter()
            .map(|value| match value {
                AttributeValue::S(text) => Ok(text.clone()),
                _ => Err("issues must contain strings".to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err("issues must be a list of strings".to_string()),
    };

    let mut scores = BTreeMap::new();
    match item.get("scores") {
        None => {}
        Some(AttributeValue::M(entries)) => {
            for (name, value) in entries {
                let AttributeValue::N(raw) = value else {
                    return Err(format!("score '{name}' must be numeric"));
                };
                let score = raw
                    .parse::<f64>()
                    .map_err(|error| format!("score '{name}' is not a number: {error}"))?;
                scores.insert(name.clone(), score);
            }
        }
        Some(_) => return Err("scores must be a map".to_string()),
    }

    Ok(AnalysisRecord {
        image_id: string_attr(item, "image_id")?,
        record_id: string_attr(item, "record_id")?,
        s3_path: string_attr(item, "s3_path")?,
        status,
        issues,
        scores,
    })
}

fn entry_to_attribute(id: i64, description: &str) -> AttributeValue {
    AttributeValue::M(HashMap::from([
        ("id".to_string(), AttributeValue::N(id.to_string())),
        (
            "description".to_string(),
            AttributeValue::S(description.to_string()),
        ),
    ]))
}

fn entry_from_attribute(value: &AttributeValue, field: &str) -> Result<(i64, String), String> {
    let AttributeValue::M(entry) = value else {
        return Err(format!("{field} entries must be maps"));
    };
    Ok((
        number_attr::<i64>(entry, "id")?,
        string_attr(entry, "description")?,
    ))
}

fn string_attr(item: &Item, name: &str) -> Result<String, String> {
    match item.get(name) {
        Some(AttributeValue::S(text)) => Ok(text.clone()),
        Some(_) => Err(format!("attribute '{name}' must be a string")),
        None => Err(format!("attribute '{name}' is missing")),
    }
}

fn number_attr<T: std::str::FromStr>(item: &Item, name: &str) -> Result<T, String> {
    match item.get(name) {
        Some(AttributeValue::N(raw)) => raw
            .parse::<T>()
            .map_err(|_| format!("attribute '{name}' is not a valid number: {raw}")),
        Some(_) => Err(format!("attribute '{name}' must be a number")),
        None => Err(format!("attribute '{name}' is missing")),
    }
}

fn list_attr<'a>(item: &'a Item, name: &str) -> Result<&'a [AttributeValue], String> {
    match item.get(name) {
        Some(AttributeValue::L(values)) => Ok(values),
        Some(_) => Err(format!("attribute '{name}' must be a list")),
        None => Ok(&[]),
    }
}
