use std::collections::HashMap;

use serde_json::{json, Value};

use openwebui_mcp_core::OperationDescriptor;

use super::catalog::OPERATIONS;

// ---------------------------------------------------------------------------
// ToolRegistry
// ---------------------------------------------------------------------------

/// Name-indexed view over a static operation catalog.
///
/// Listing preserves catalog order so `tools/list` output is stable. Built
/// once at startup and shared read-only by every transport.
#[derive(Debug)]
pub struct ToolRegistry {
    by_name: HashMap<&'static str, &'static OperationDescriptor>,
    order: &'static [OperationDescriptor],
}

impl ToolRegistry {
    /// Registry over the full Open WebUI catalog.
    #[must_use]
    pub fn open_webui() -> Self {
        Self::from_catalog(OPERATIONS)
    }

    /// Registry over an arbitrary catalog. On duplicate names the first
    /// entry wins.
    #[must_use]
    pub fn from_catalog(catalog: &'static [OperationDescriptor]) -> Self {
        let mut by_name = HashMap::with_capacity(catalog.len());
        for descriptor in catalog {
            by_name.entry(descriptor.name).or_insert(descriptor);
        }
        Self {
            by_name,
            order: catalog,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static OperationDescriptor> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static OperationDescriptor> {
        self.order.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// MCP tool definitions (`name`, `description`, `inputSchema`).
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<Value> {
        self.iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "description": op.description,
                    "inputSchema": op.input_schema(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use openwebui_mcp_core::{BodyRule, HttpMethod};

    use super::*;

    static DUPLICATES: &[OperationDescriptor] = &[
        OperationDescriptor {
            name: "ping_backend",
            description: "first",
            method: HttpMethod::Get,
            path: "/health",
            params: &[],
            body: BodyRule::Empty,
        },
        OperationDescriptor {
            name: "ping_backend",
            description: "second",
            method: HttpMethod::Get,
            path: "/health",
            params: &[],
            body: BodyRule::Empty,
        },
    ];

    #[test]
    fn lookup_by_name() {
        let registry = ToolRegistry::open_webui();
        let op = registry.get("get_user").unwrap();
        assert_eq!(op.path, "/api/v1/users/{user_id}");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn listing_preserves_catalog_order() {
        let registry = ToolRegistry::open_webui();
        let names: Vec<_> = registry.iter().map(|op| op.name).collect();
        assert_eq!(names.first(), Some(&"get_current_user"));
        assert_eq!(names.last(), Some(&"get_system_config"));
        assert_eq!(registry.len(), names.len());
    }

    #[test]
    fn tool_definitions_carry_schema() {
        let registry = ToolRegistry::open_webui();
        let defs = registry.tool_definitions();
        let get_user = defs.iter().find(|d| d["name"] == "get_user").unwrap();
        assert_eq!(get_user["inputSchema"]["type"], "object");
        assert_eq!(get_user["inputSchema"]["required"], json!(["user_id"]));
    }

    #[test]
    fn first_duplicate_wins() {
        let registry = ToolRegistry::from_catalog(DUPLICATES);
        assert_eq!(registry.get("ping_backend").unwrap().description, "first");
        assert_eq!(registry.len(), 1);
    }
}
