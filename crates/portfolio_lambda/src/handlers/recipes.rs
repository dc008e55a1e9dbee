use serde_json::json;

use portfolio_core::recipe::{
    build_recipe, generate_recipe_id, MessageResponse, NewRecipeRequest, Recipe,
};

use crate::adapters::recipe_store::RecipeStore;
use crate::http::{json_response, message_response, ApiGatewayResponse, ProxyRequest};
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "recipe_api";
const RECIPE_ID_PARAM: &str = "recipe_id";

pub fn healthcheck() -> ApiGatewayResponse {
    message_response(200, "Service is healthy")
}

/// Scans every page and merges them into one list.
pub fn list_recipes(store: &impl RecipeStore) -> ApiGatewayResponse {
    match scan_all(store) {
        Ok(recipes) => {
            log_info(COMPONENT, "recipes_listed", json!({ "count": recipes.len() }));
            json_response(200, recipes)
        }
        Err(error) => {
            log_error(COMPONENT, "list_failed", json!({ "error": error.clone() }));
            message_response(500, format!("Error retrieving recipes: {error}"))
        }
    }
}

fn scan_all(store: &impl RecipeStore) -> Result<Vec<Recipe>, String> {
    let mut recipes = Vec::new();
    let mut start_key: Option<String> = None;
    loop {
        let page = store.scan_page(start_key.as_deref())?;
        recipes.extend(page.items);
        match page.next_start_key {
            Some(next) => start_key = Some(next),
            None => return Ok(recipes),
        }
    }
}

pub fn create_recipe(request: &ProxyRequest, store: &impl RecipeStore) -> ApiGatewayResponse {
    let payload = match request.json_body() {
        Ok(value) => value,
        Err(error) => return message_response(400, format!("Error creating recipe: {error}")),
    };

    let new_recipe = match serde_json::from_value::<NewRecipeRequest>(payload) {
        Ok(value) => value,
        Err(error) => {
            return message_response(400, format!("Error creating recipe: {error}"));
        }
    };

    let recipe = match build_recipe(new_recipe, generate_recipe_id()) {
        Ok(value) => value,
        Err(error) => {
            return message_response(400, format!("Error creating recipe: {error}"));
        }
    };

    if let Err(error) = store.put_recipe(&recipe) {
        log_error(
            COMPONENT,
            "create_failed",
            json!({ "recipe_id": recipe.id.clone(), "error": error.clone() }),
        );
        return message_response(500, format!("Error creating recipe: {error}"));
    }

    log_info(
        COMPONENT,
        "recipe_created",
        json!({ "recipe_id": recipe.id.clone() }),
    );
    let mut response = MessageResponse::new("Recipe created successfully");
    response.id = Some(recipe.id);
    json_response(200, response)
}

pub fn like_recipe(request: &ProxyRequest, store: &impl RecipeStore) -> ApiGatewayResponse {
    let Some(recipe_id) = recipe_id_param(request) else {
        return message_response(400, "Error liking recipe: recipe_id is required");
    };

    match store.increment_likes(recipe_id) {
        Ok(Some(likes)) => {
            log_info(
                COMPONENT,
                "recipe_liked",
                json!({ "recipe_id": recipe_id, "likes": likes }),
            );
            let mut response = MessageResponse::new("Recipe liked successfully");
            response.likes = Some(likes);
            json_response(200, response)
        }
        Ok(None) => message_response(
            404,
            format!("Error liking recipe: recipe {recipe_id} not found"),
        ),
        Err(error) => {
            log_error(
                COMPONENT,
                "like_failed",
                json!({ "recipe_id": recipe_id, "error": error.clone() }),
            );
            message_response(500, format!("Error liking recipe: {error}"))
        }
    }
}

pub fn delete_recipe(request: &ProxyRequest, store: &impl RecipeStore) -> ApiGatewayResponse {
    let Some(recipe_id) = recipe_id_param(request) else {
        return message_response(400, "Error deleting recipe: recipe_id is required");
    };

    match store.delete_recipe(recipe_id) {
        Ok(()) => {
            log_info(COMPONENT, "recipe_deleted", json!({ "recipe_id": recipe_id }));
            message_response(200, "Recipe deleted successfully")
        }
        Err(error) => {
            log_error(
                COMPONENT,
                "delete_failed",
                json!({ "recipe_id": recipe_id, "error": error.clone() }),
            );
            message_response(500, format!("Error deleting recipe: {error}"))
        }
    }
}

/// Dispatches a proxy request to the matching recipe operation.
pub fn route_recipe_request(
    mut request: ProxyRequest,
    store: &impl RecipeStore,
) -> ApiGatewayResponse {
    let segments: Vec<String> = request
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => healthcheck(),
        ("GET", ["recipes"]) => list_recipes(store),
        ("POST", ["recipes"]) => create_recipe(&request, store),
        ("POST" | "PUT", ["recipes", recipe_id, "like"]) => {
            request
                .path_parameters
                .entry(RECIPE_ID_PARAM.to_string())
                .or_insert_with(|| (*recipe_id).to_string());
            like_recipe(&request, store)
        }
        ("DELETE", ["recipes", recipe_id]) => {
            request
                .path_parameters
                .entry(RECIPE_ID_PARAM.to_string())
                .or_insert_with(|| (*recipe_id).to_string());
            delete_recipe(&request, store)
        }
        _ => message_response(
            404,
            format!("No route for {} {}", request.method, request.path),
        ),
    }
}

fn recipe_id_param(request: &ProxyRequest) -> Option<&str> {
    request
        .path_parameters
        .get(RECIPE_ID_PARAM)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
