//! Static backend descriptors
//!
//! A descriptor carries everything discovery needs to know about a backend
//! type (capabilities, cloud flag, cost model, defaults, configuration
//! schema) without constructing an instance.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vpm_domain::constants::CATEGORY_UTILITY;
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::{ConfigMap, CostInfo};

/// Kind of value a configuration key accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigValueKind {
    String,
    Integer,
    Float,
    Bool,
    Array,
    Object,
    Any,
}

impl ConfigValueKind {
    /// Whether `value` is acceptable for this kind
    ///
    /// Integers are accepted where floats are expected.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }
}

impl fmt::Display for ConfigValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// One key of a configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    /// Configuration key
    pub key: String,
    /// Accepted value kind
    pub kind: ConfigValueKind,
    /// Key must be present after defaults are merged
    pub required: bool,
}

impl ConfigField {
    /// Required key
    pub fn required(key: impl Into<String>, kind: ConfigValueKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: true,
        }
    }

    /// Optional key, type-checked when present
    pub fn optional(key: impl Into<String>, kind: ConfigValueKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: false,
        }
    }
}

/// Declared configuration shape of a backend type
///
/// Keys not listed in the schema pass through unchecked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSchema {
    /// Declared keys
    pub fields: Vec<ConfigField>,
}

impl ConfigSchema {
    /// Check `config` against the declared fields
    pub fn validate(&self, provider_type: &str, config: &ConfigMap) -> Result<()> {
        for field in &self.fields {
            match config.get(&field.key) {
                None | Some(Value::Null) if field.required => {
                    return Err(Error::configuration_invalid(
                        provider_type,
                        format!("missing required key '{}'", field.key),
                    ));
                }
                Some(value) if !value.is_null() && !field.kind.accepts(value) => {
                    return Err(Error::configuration_invalid(
                        provider_type,
                        format!("key '{}' expects {}, got {value}", field.key, field.kind),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Static metadata of a backend type
///
/// ## Example
///
/// ```rust
/// use vpm_application::ports::registry::{ConfigField, ConfigValueKind, ProviderDescriptor};
///
/// let descriptor = ProviderDescriptor::new("qdrant")
///     .with_description("Qdrant vector database")
///     .with_category("vector_database")
///     .with_capabilities(["vector_storage", "similarity_search"])
///     .cloud(true)
///     .with_default("port", 6333)
///     .with_field(ConfigField::required("host", ConfigValueKind::String));
///
/// assert!(descriptor.has_capability("similarity_search"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Type identifier
    pub provider_type: String,
    /// Human-readable description
    pub description: String,
    /// Registry category (`vector_database`, `ai_memory`, `utility`)
    pub category: String,
    /// Capability tags
    pub capabilities: Vec<String>,
    /// Remote/cloud backend
    pub is_cloud: bool,
    /// Declared cost model
    pub cost: CostInfo,
    /// Canned default configuration
    pub default_config: ConfigMap,
    /// Declared configuration schema
    pub schema: ConfigSchema,
    /// Free-form tags used by compatibility queries
    pub tags: Vec<String>,
}

impl ProviderDescriptor {
    /// Descriptor with no capabilities, local, free
    pub fn new(provider_type: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            description: String::new(),
            category: CATEGORY_UTILITY.to_string(),
            capabilities: Vec::new(),
            is_cloud: false,
            cost: CostInfo::free(),
            default_config: ConfigMap::new(),
            schema: ConfigSchema::default(),
            tags: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the capability tags
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cloud flag
    pub fn cloud(mut self, is_cloud: bool) -> Self {
        self.is_cloud = is_cloud;
        self
    }

    /// Set the cost model
    pub fn with_cost(mut self, cost: CostInfo) -> Self {
        self.cost = cost;
        self
    }

    /// Add a default configuration entry
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_config.insert(key.into(), value.into());
        self
    }

    /// Add a schema field
    pub fn with_field(mut self, field: ConfigField) -> Self {
        self.schema.fields.push(field);
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether the descriptor advertises `capability`
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Whether the descriptor satisfies `requirements`
    pub fn satisfies(&self, requirements: &ProviderRequirements) -> bool {
        if !requirements
            .capabilities
            .iter()
            .all(|capability| self.has_capability(capability))
        {
            return false;
        }
        if requirements
            .is_cloud
            .is_some_and(|is_cloud| is_cloud != self.is_cloud)
        {
            return false;
        }
        if requirements.max_cost > 0.0 && self.cost.total_cost > requirements.max_cost {
            return false;
        }
        let tags: HashSet<&str> = self.tags.iter().map(String::as_str).collect();
        requirements.tags.iter().all(|tag| tags.contains(tag.as_str()))
    }
}

/// Filter for [`ProviderRegistry::compatible_types`](super::ProviderRegistry::compatible_types)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequirements {
    /// Capability tags that must all be advertised
    pub capabilities: Vec<String>,
    /// Required cloud flag, when set
    pub is_cloud: Option<bool>,
    /// Cost ceiling; ignored when zero
    pub max_cost: f64,
    /// Tags that must all be present
    pub tags: Vec<String>,
}

impl ProviderRequirements {
    /// Empty requirements, matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a capability
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Require cloud or local backends
    pub fn cloud(mut self, is_cloud: bool) -> Self {
        self.is_cloud = Some(is_cloud);
        self
    }

    /// Set the cost ceiling
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = max_cost;
        self
    }

    /// Require a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
