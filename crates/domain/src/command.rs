//! REST commands
//!
//! A [`Command`] describes one call against the REST API: verb, path,
//! parameters, body content type, and the type its `result` decodes into.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::params::{ParamValue, Parameters};

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body encoding for POST commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// `application/json`, parameters sent as a JSON object
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

/// One API call whose `result` decodes into `T`.
///
/// `T` is only a type witness: the command never holds a `T`, it tells the
/// executor what to decode the envelope's `result` field as.
pub struct Command<T> {
    method: HttpMethod,
    path: String,
    parameters: Parameters,
    content_type: ContentType,
    result_type: PhantomData<fn() -> T>,
}

impl<T> Command<T> {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            parameters: Parameters::new(),
            content_type: ContentType::default(),
            result_type: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Add a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// Replace all parameters
    #[must_use]
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Send POST parameters as a form body instead of JSON
    #[must_use]
    pub fn form(mut self) -> Self {
        self.content_type = ContentType::Form;
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &Parameters {
        &self.parameters
    }

    pub fn body_content_type(&self) -> ContentType {
        self.content_type
    }

    /// Name of the declared result type, for diagnostics
    pub fn result_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl<T> Clone for Command<T> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            path: self.path.clone(),
            parameters: self.parameters.clone(),
            content_type: self.content_type,
            result_type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("parameters", &self.parameters)
            .field("content_type", &self.content_type)
            .field("result_type", &self.result_type_name())
            .finish()
    }
}
