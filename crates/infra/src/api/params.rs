//! Parameter processing
//!
//! Turns a command's parameters into the wire representation for its verb:
//! structured values become JSON text, percent-encoded once when they end up
//! on a query string.

use std::collections::BTreeMap;

use marketo_domain::{ParamValue, Parameters};
use serde_json::{Map, Value};
use url::form_urlencoded;

use super::errors::ApiError;

/// Parameter value after processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedValue {
    /// Plain value, passed through untouched
    Plain(Value),
    /// Serialized JSON text; percent-encoded when processed for a URL
    Text(String),
}

impl ProcessedValue {
    /// String form used on query strings and form bodies
    pub fn to_wire_string(&self) -> String {
        match self {
            Self::Plain(Value::String(text)) | Self::Text(text) => text.clone(),
            Self::Plain(other) => other.to_string(),
        }
    }
}

/// Processed copy of a command's parameters
pub type ProcessedParameters = BTreeMap<String, ProcessedValue>;

/// Maps parameters to their wire form
pub struct ParameterProcessor;

impl ParameterProcessor {
    /// Process `parameters` into a new map.
    ///
    /// JSON-mapped values are serialized to JSON text and, if `url_encode` is
    /// set, percent-encoded as UTF-8. Plain values pass through.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] without a code if a value cannot be encoded.
    pub fn process(
        parameters: &Parameters,
        url_encode: bool,
    ) -> Result<ProcessedParameters, ApiError> {
        parameters
            .iter()
            .map(|(name, value)| {
                let processed = match value {
                    ParamValue::Plain(plain) => ProcessedValue::Plain(plain.clone()),
                    ParamValue::Json(structured) => {
                        let text =
                            structured.to_value().map_err(ApiError::serialization)?.to_string();
                        if url_encode {
                            ProcessedValue::Text(urlencoding::encode(&text).into_owned())
                        } else {
                            ProcessedValue::Text(text)
                        }
                    }
                };
                Ok((name.clone(), processed))
            })
            .collect()
    }

    /// Percent-encoded query string (without the leading `?`).
    ///
    /// JSON text is encoded by [`Self::process`]; plain values and names are
    /// encoded here, so every component is encoded exactly once.
    pub fn query_string(parameters: &Parameters) -> Result<String, ApiError> {
        let processed = Self::process(parameters, true)?;

        let pairs: Vec<String> = processed
            .iter()
            .map(|(name, value)| {
                let encoded = match value {
                    ProcessedValue::Text(text) => text.clone(),
                    ProcessedValue::Plain(_) => {
                        urlencoding::encode(&value.to_wire_string()).into_owned()
                    }
                };
                format!("{}={}", urlencoding::encode(name), encoded)
            })
            .collect();

        Ok(pairs.join("&"))
    }

    /// Name/value pairs for a form body, every value stringified
    pub fn form_fields(parameters: &Parameters) -> Result<Vec<(String, String)>, ApiError> {
        let processed = Self::process(parameters, false)?;
        Ok(processed.into_iter().map(|(name, value)| (name, value.to_wire_string())).collect())
    }

    /// `application/x-www-form-urlencoded` body built from [`Self::form_fields`]
    pub fn form_body(parameters: &Parameters) -> Result<String, ApiError> {
        let fields = Self::form_fields(parameters)?;
        Ok(form_urlencoded::Serializer::new(String::new()).extend_pairs(fields).finish())
    }

    /// JSON object body with the raw values; structured values stay nested
    pub fn json_body(parameters: &Parameters) -> Result<Value, ApiError> {
        let body = parameters
            .iter()
            .map(|(name, value)| {
                value.to_value().map(|value| (name.clone(), value)).map_err(ApiError::serialization)
            })
            .collect::<Result<Map<String, Value>, ApiError>>()?;
        Ok(Value::Object(body))
    }
}
