use axum::{
    response::Html,
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use portfolio_core::roman::{int_to_roman, parse_form_number};

use crate::templates::{roman_form, roman_result};

#[derive(Debug, Default, Deserialize)]
pub struct RomanForm {
    #[serde(default)]
    pub number: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index).post(convert))
        .route("/healthz", get(healthz))
}

async fn index() -> Html<String> {
    Html(roman_form(None))
}

async fn convert(Form(form): Form<RomanForm>) -> Html<String> {
    let converted = parse_form_number(&form.number)
        .and_then(|number| int_to_roman(number).map(|numeral| (number, numeral)));

    match converted {
        Ok((number, numeral)) => {
            info!(number, %numeral, "converted number");
            Html(roman_result(number, &numeral))
        }
        Err(error) => {
            debug!(input = %form.number, %error, "rejected form input");
            Html(roman_form(Some(&error.message())))
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}
