//! # Application Descriptors
//!
//! An application is declared by a descriptor file (`appspec.yaml` by
//! default) placed in the application's directory. The descriptor is a YAML
//! mapping with at least a `name`:
//!
//! ```yaml
//! name: billing
//! owner: payments-team
//! deploy:
//!   replicas: 3
//! ```
//!
//! Only `name` is interpreted. Every other top-level field is kept verbatim
//! in [`Application::spec`] for consumers of the manifest; its schema is not
//! validated here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A deployable application discovered in a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Human-readable identifier taken from the descriptor.
    pub name: String,
    /// Directory holding the descriptor, relative to the repository root,
    /// without a trailing separator.
    pub path: String,
    /// Remaining descriptor fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spec: BTreeMap<String, serde_yaml::Value>,
}

/// On-disk shape of a descriptor.
#[derive(Debug, Deserialize)]
struct Descriptor {
    name: String,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_yaml::Value>,
}

impl Application {
    /// Build an application from raw descriptor content found at `path`.
    ///
    /// `path` is used verbatim; callers normalize it first.
    pub fn build(path: &str, content: &[u8]) -> Result<Self> {
        let parse_error = |message: String| Error::DescriptorParse {
            path: path.to_string(),
            message,
        };

        let descriptor: Descriptor =
            serde_yaml::from_slice(content).map_err(|e| parse_error(e.to_string()))?;

        let name = descriptor.name.trim();
        if name.is_empty() {
            return Err(parse_error("field `name` must not be empty".to_string()));
        }

        Ok(Application {
            name: name.to_string(),
            path: path.to_string(),
            spec: descriptor.rest,
        })
    }
}
