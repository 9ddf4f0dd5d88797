//! Kernel functions exposed to a host agent framework
//!
//! This module handles:
//! - Describing the callable functions (name, description, parameters)
//! - Dispatching a call by function name to the brand registry
//! - Running a JSON-lines session for hosts that drive us over stdio

use eyre::{Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};

pub mod session;

use crate::brand::registry::BrandRegistry;

/// A named, text-returning function a host can invoke
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterSpec],
}

/// A single string parameter of a kernel function
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Functions provided by [`BrandPlugin`]
pub const BRAND_FUNCTIONS: &[FunctionSpec] = &[
    FunctionSpec {
        name: "get_brand_personality",
        description: "Get brand personality instructions",
        parameters: &[],
    },
    FunctionSpec {
        name: "get_brand_name",
        description: "Get current brand name",
        parameters: &[],
    },
    FunctionSpec {
        name: "set_brand",
        description: "Set current brand",
        parameters: &[ParameterSpec {
            name: "brand_key",
            description: "Key of the brand to switch to",
            required: true,
        }],
    },
    FunctionSpec {
        name: "list_brands",
        description: "List available brands",
        parameters: &[],
    },
];

/// A plugin a host can enumerate and call into
pub trait KernelPlugin {
    /// Plugin name used by hosts to namespace its functions
    fn name(&self) -> &str;

    fn functions(&self) -> &[FunctionSpec];

    /// Call `function` with named string arguments
    fn invoke(&mut self, function: &str, arguments: &Map<String, Value>) -> Result<String>;

    fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions().iter().find(|f| f.name == name)
    }
}

/// Brand registry wrapped as a kernel plugin
pub struct BrandPlugin {
    registry: BrandRegistry,
}

impl BrandPlugin {
    pub fn new(registry: BrandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BrandRegistry {
        &self.registry
    }

    /// Bind positional values to the declared parameters of `function`, in order
    pub fn bind_positional(&self, function: &str, args: &[String]) -> Result<Map<String, Value>> {
        let Some(spec) = self.function(function) else {
            bail!("Unknown function: {}", function);
        };

        if args.len() > spec.parameters.len() {
            bail!(
                "Function '{}' takes {} argument(s), got {}",
                function,
                spec.parameters.len(),
                args.len()
            );
        }

        Ok(spec
            .parameters
            .iter()
            .zip(args)
            .map(|(param, value)| (param.name.to_string(), Value::String(value.clone())))
            .collect())
    }
}

impl KernelPlugin for BrandPlugin {
    fn name(&self) -> &str {
        "brand"
    }

    fn functions(&self) -> &[FunctionSpec] {
        BRAND_FUNCTIONS
    }

    fn invoke(&mut self, function: &str, arguments: &Map<String, Value>) -> Result<String> {
        log::debug!("Invoking {}.{} with {:?}", self.name(), function, arguments);

        match function {
            "get_brand_personality" => Ok(self.registry.get_brand_personality()),
            "get_brand_name" => Ok(self.registry.get_brand_name()),
            "set_brand" => {
                let brand_key = string_arg(function, arguments, "brand_key")?;
                Ok(self.registry.set_brand(brand_key))
            }
            "list_brands" => Ok(self.registry.list_brands()),
            _ => bail!("Unknown function: {}", function),
        }
    }
}

fn string_arg<'a>(function: &str, arguments: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match arguments.get(name) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => bail!("Argument '{}' of '{}' must be a string, got {}", name, function, other),
        None => bail!("Missing required argument '{}' for '{}'", name, function),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{BrandConfig, BrandTable};
    use serde_json::json;

    fn plugin() -> BrandPlugin {
        let table: BrandTable = [(
            "contoso".to_string(),
            BrandConfig {
                name: "Contoso Grill".to_string(),
                tone: "Friendly".to_string(),
                style: "Relaxed".to_string(),
                key_phrases: vec!["Howdy".to_string()],
                values: vec!["Freshness".to_string()],
            },
        )]
        .into_iter()
        .collect();
        BrandPlugin::new(BrandRegistry::new(table, "none"))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_functions_table() {
        let plugin = plugin();
        let names: Vec<&str> = plugin.functions().iter().map(|f| f.name).collect();

        assert_eq!(
            names,
            vec!["get_brand_personality", "get_brand_name", "set_brand", "list_brands"]
        );
        assert_eq!(plugin.function("set_brand").unwrap().parameters[0].name, "brand_key");
        assert!(plugin.function("delete_brand").is_none());
    }

    #[test]
    fn test_invoke_set_brand_then_name() {
        let mut plugin = plugin();
        assert_eq!(plugin.invoke("get_brand_name", &Map::new()).unwrap(), "Restaurant");

        let message = plugin
            .invoke("set_brand", &args(json!({"brand_key": "contoso"})))
            .unwrap();

        assert_eq!(message, "Brand set to Contoso Grill");
        assert_eq!(plugin.invoke("get_brand_name", &Map::new()).unwrap(), "Contoso Grill");
        assert_eq!(plugin.registry().get_current_brand_key(), "contoso");
    }

    #[test]
    fn test_invoke_unknown_brand_is_not_an_error() {
        let mut plugin = plugin();

        let message = plugin
            .invoke("set_brand", &args(json!({"brand_key": "unknown"})))
            .unwrap();

        assert!(message.contains("not found"));
    }

    #[test]
    fn test_invoke_rejects_misuse() {
        let mut plugin = plugin();

        assert!(plugin.invoke("drop_tables", &Map::new()).is_err());
        assert!(plugin.invoke("set_brand", &Map::new()).is_err());
        assert!(plugin.invoke("set_brand", &args(json!({"brand_key": 7}))).is_err());
    }

    #[test]
    fn test_bind_positional() {
        let plugin = plugin();

        let bound = plugin.bind_positional("set_brand", &["contoso".to_string()]).unwrap();
        assert_eq!(bound.get("brand_key"), Some(&json!("contoso")));

        assert!(plugin.bind_positional("list_brands", &["extra".to_string()]).is_err());
        assert!(plugin.bind_positional("nope", &[]).is_err());
    }
}
