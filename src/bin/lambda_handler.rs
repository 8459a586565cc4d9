//! AWS Lambda handler for solar estimates
//!
//! Served through a Lambda Function URL:
//! - `GET` returns the rate table
//! - `POST` with a JSON `CalculatorInputs` body returns the estimate; inputs are
//!   clamped to the calculator's ranges first and echoed back as used
//! - `OPTIONS` answers CORS preflight
//!
//! Pricing constants come from SOLAR_COST_PER_WATT / SOLAR_TAX_CREDIT_RATE /
//! SOLAR_DERATE_FACTOR, read once per cold start.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use http::HeaderMap;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;
use solar_estimator::presentation::PageMeta;
use solar_estimator::{
    CalculationResult, CalculatorInputs, EstimateConfig, ScenarioRunner, StateRate,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse<'a> {
    /// Inputs after clamping
    pub inputs: &'a CalculatorInputs,
    pub inputs_clamped: bool,
    /// Rate record actually used (after fallback)
    pub state: &'a StateRate,
    pub state_known: bool,
    pub result: &'a CalculationResult,
    pub annual_return: Option<f64>,
    pub meta: PageMeta,
    pub execution_time_us: u64,
}

#[derive(Debug, Serialize)]
struct StatesResponse<'a> {
    states: &'a [StateRate],
    fallback: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn response(status: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    let mut headers = cors_headers();
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    LambdaFunctionUrlResponse {
        status_code: status,
        headers,
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn json_response<T: Serialize>(status: i64, body: &T) -> LambdaFunctionUrlResponse {
    match serde_json::to_string(body) {
        Ok(text) => response(status, Some(text)),
        Err(e) => error_response(500, &format!("Failed to serialize response: {}", e)),
    }
}

fn error_response(status: i64, message: &str) -> LambdaFunctionUrlResponse {
    log::warn!("{} {}", status, message);
    let body = serde_json::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    response(status, Some(body))
}

async fn handler(
    runner: &ScenarioRunner,
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = Instant::now();
    let request = event.payload;
    let method = request
        .request_context
        .http
        .method
        .as_deref()
        .unwrap_or("POST")
        .to_ascii_uppercase();

    match method.as_str() {
        "OPTIONS" => return Ok(response(200, None)),
        "GET" => {
            let rates = runner.rates();
            let states = StatesResponse {
                states: rates.entries(),
                fallback: &rates.fallback().code,
            };
            return Ok(json_response(200, &states));
        }
        "POST" => {}
        other => return Ok(error_response(405, &format!("Method {} not allowed", other))),
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "Expected a JSON text body"));
    }

    Ok(estimate_response(runner, request.body.as_deref().unwrap_or("{}"), start))
}

/// POST body -> estimate response
fn estimate_response(
    runner: &ScenarioRunner,
    body: &str,
    start: Instant,
) -> LambdaFunctionUrlResponse {
    let raw: CalculatorInputs = match serde_json::from_str(body) {
        Ok(inputs) => inputs,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };
    let inputs = raw.clamped();
    let inputs_clamped = inputs != raw;
    if inputs_clamped {
        log::warn!("Clamped out-of-range inputs {:?} -> {:?}", raw, inputs);
    }

    let result = match runner.run(&inputs) {
        Ok(result) => result,
        Err(e) => return error_response(500, &format!("Estimate failed: {}", e)),
    };

    let rates = runner.rates();
    let known = rates.lookup(&inputs.state_code);
    let payload = EstimateResponse {
        inputs: &inputs,
        inputs_clamped,
        state: rates.resolve(&inputs.state_code),
        state_known: known.is_some(),
        result: &result,
        annual_return: result.annual_return(),
        meta: PageMeta::for_state(known),
        execution_time_us: start.elapsed().as_micros() as u64,
    };

    log::info!(
        "{} {:.1} kW payback {:.2} years in {}us",
        payload.state.code,
        result.system_size_kw,
        result.payback_period_years,
        payload.execution_time_us
    );

    json_response(200, &payload)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = EstimateConfig::from_env();
    config.validate()?;
    let runner = Arc::new(match std::env::var("SOLAR_RATES_PATH") {
        Ok(path) => ScenarioRunner::from_csv_path(Path::new(&path), config)?,
        Err(_) => ScenarioRunner::new()?,
    });
    log::info!("Loaded {} state rates", runner.rates().len());

    run(service_fn(move |event: LambdaEvent<LambdaFunctionUrlRequest>| {
        let runner = Arc::clone(&runner);
        async move { handler(&runner, event).await }
    }))
    .await
}
