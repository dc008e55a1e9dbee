pub mod aws;
pub mod dynamo_items;
pub mod object_store;
pub mod queue;
pub mod recipe_store;
pub mod result_store;
pub mod vision;
