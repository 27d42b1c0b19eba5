//! The Open WebUI operation catalog.
//!
//! Each entry is a static [`OperationDescriptor`]; adding a tool means adding
//! one entry here. Operations are grouped by backend resource.

use serde_json::{json, Map, Value};

use openwebui_mcp_core::{
    BodyRule, DefaultValue, HttpMethod, OperationDescriptor, ParamDef,
};

macro_rules! operation {
    (@method GET) => { HttpMethod::Get };
    (@method POST) => { HttpMethod::Post };
    (@method DELETE) => { HttpMethod::Delete };
    (@body) => { BodyRule::Empty };
    (@body $body:expr) => { $body };
    (
        $method:ident $path:literal => $name:literal,
        $description:expr,
        [$($param:expr),* $(,)?]
        $(, $body:expr)? $(,)?
    ) => {
        OperationDescriptor {
            name: $name,
            description: $description,
            method: operation!(@method $method),
            path: $path,
            params: &[$($param),*],
            body: operation!(@body $($body)?),
        }
    };
}

const USER_ID: ParamDef = ParamDef::path("user_id", "User ID");
const GROUP_ID: ParamDef = ParamDef::path("group_id", "Group ID");
const MODEL_ID: ParamDef = ParamDef::path("model_id", "Model ID");
const KNOWLEDGE_ID: ParamDef = ParamDef::path("knowledge_id", "Knowledge base ID");
const CHAT_ID: ParamDef = ParamDef::path("chat_id", "Chat ID");
const TOOL_ID: ParamDef = ParamDef::path("tool_id", "Tool ID");
const FUNCTION_ID: ParamDef = ParamDef::path("function_id", "Function ID");
const PAGE: ParamDef = ParamDef::query_int("page", "Page number (backend default when omitted)");

const TEMPERATURE: ParamDef =
    ParamDef::number("temperature", "Temperature (0.0-2.0)").between(0.0, 2.0);
const MAX_TOKENS: ParamDef = ParamDef::integer("max_tokens", "Max tokens for responses");

/// Every operation exposed as an MCP tool, in listing order.
pub static OPERATIONS: &[OperationDescriptor] = &[
    // -- users ---------------------------------------------------------------
    operation!(GET "/api/v1/auths/" => "get_current_user",
        "Get the currently authenticated user's profile.\n\n\
         Returns information about the user making the request, including their ID, \
         name, email, role, and permissions.",
        []),
    operation!(GET "/api/v1/users/" => "list_users",
        "List all users in Open WebUI.\n\nADMIN ONLY: Requires admin permissions. \
         Returns a list of all users with their IDs, names, emails, and roles.",
        [PAGE]),
    operation!(GET "/api/v1/users/{user_id}" => "get_user",
        "Get details for a specific user.\n\nADMIN ONLY: Requires admin permissions to view other users.",
        [USER_ID]),
    operation!(POST "/api/v1/users/{user_id}/update/role" => "update_user_role",
        "Update a user's role.\n\nADMIN ONLY: Requires admin permissions.\n\n\
         Roles:\n- 'admin': Full access to all features\n- 'user': Standard user access\n\
         - 'pending': Awaiting approval",
        [
            USER_ID,
            ParamDef::string("role", "New role: 'admin', 'user', or 'pending'")
                .required()
                .one_of(&["admin", "user", "pending"]),
        ],
        BodyRule::Fields),
    operation!(DELETE "/api/v1/users/{user_id}" => "delete_user",
        "Delete a user from Open WebUI.\n\nADMIN ONLY: Requires admin permissions.\n\
         WARNING: This action cannot be undone!",
        [USER_ID]),
    // -- groups --------------------------------------------------------------
    operation!(GET "/api/v1/groups/" => "list_groups",
        "List all groups in Open WebUI.\n\nReturns groups with their members and permissions.",
        []),
    operation!(POST "/api/v1/groups/create" => "create_group",
        "Create a new group.\n\nADMIN ONLY: Requires admin permissions.",
        [
            ParamDef::string("name", "Group name").required(),
            ParamDef::string("description", "Group description")
                .with_default(DefaultValue::Str("")),
        ],
        BodyRule::Fields),
    operation!(GET "/api/v1/groups/id/{group_id}" => "get_group",
        "Get details for a specific group.\n\nReturns group info including members and permissions.",
        [GROUP_ID]),
    operation!(POST "/api/v1/groups/id/{group_id}/update" => "update_group",
        "Update a group's name or description.\n\nADMIN ONLY: Requires admin permissions.",
        [
            GROUP_ID,
            ParamDef::string("name", "New group name"),
            ParamDef::string("description", "New group description"),
        ],
        BodyRule::Fields),
    operation!(POST "/api/v1/groups/id/{group_id}/users/add" => "add_user_to_group",
        "Add a user to a group.\n\nADMIN ONLY: Requires admin permissions.",
        [GROUP_ID, ParamDef::string("user_id", "User ID to add").required()],
        BodyRule::Fields),
    operation!(POST "/api/v1/groups/id/{group_id}/users/remove" => "remove_user_from_group",
        "Remove a user from a group.\n\nADMIN ONLY: Requires admin permissions.",
        [GROUP_ID, ParamDef::string("user_id", "User ID to remove").required()],
        BodyRule::Fields),
    operation!(DELETE "/api/v1/groups/id/{group_id}" => "delete_group",
        "Delete a group.\n\nADMIN ONLY: Requires admin permissions.\n\
         WARNING: This action cannot be undone!",
        [GROUP_ID]),
    // -- models --------------------------------------------------------------
    operation!(GET "/api/v1/models/" => "list_models",
        "List all models in Open WebUI.\n\n\
         Returns both base models and custom models with their configurations.",
        []),
    operation!(GET "/api/v1/models/{model_id}" => "get_model",
        "Get details for a specific model.\n\n\
         Returns model configuration including system prompt, parameters, and metadata.",
        [MODEL_ID]),
    operation!(POST "/api/v1/models/create" => "create_model",
        "Create a new custom model.\n\nADMIN ONLY: Requires admin permissions.\n\n\
         Creates a model wrapper with custom system prompt and parameters based on an \
         existing base model.",
        [
            ParamDef::string("id", "Model ID (slug-format, e.g., 'my-custom-model')").required(),
            ParamDef::string("name", "Display name for the model").required(),
            ParamDef::string("base_model_id", "Base model ID (e.g., 'gpt-4', 'claude-3-opus')")
                .required(),
            ParamDef::string("system_prompt", "System prompt for the model"),
            TEMPERATURE,
            MAX_TOKENS,
        ],
        BodyRule::Custom(create_model_body)),
    operation!(POST "/api/v1/models/{model_id}/update" => "update_model",
        "Update a model's configuration.\n\nUpdates the model's name, system prompt, or parameters.",
        [
            MODEL_ID,
            ParamDef::string("name", "New display name"),
            ParamDef::string("system_prompt", "New system prompt"),
            TEMPERATURE,
            MAX_TOKENS,
        ],
        BodyRule::Custom(update_model_body)),
    operation!(DELETE "/api/v1/models/{model_id}" => "delete_model",
        "Delete a custom model.\n\nADMIN ONLY: Requires admin permissions.\n\
         WARNING: This action cannot be undone!",
        [MODEL_ID]),
    // -- knowledge -----------------------------------------------------------
    operation!(GET "/api/v1/knowledge/" => "list_knowledge_bases",
        "List all knowledge bases.\n\nReturns knowledge bases the user has access to.",
        []),
    operation!(GET "/api/v1/knowledge/{knowledge_id}" => "get_knowledge_base",
        "Get details for a specific knowledge base.\n\nReturns knowledge base info including files.",
        [KNOWLEDGE_ID]),
    operation!(POST "/api/v1/knowledge/create" => "create_knowledge_base",
        "Create a new knowledge base.\n\nKnowledge bases store documents for RAG retrieval.",
        [
            ParamDef::string("name", "Knowledge base name").required(),
            ParamDef::string("description", "Knowledge base description")
                .with_default(DefaultValue::Str("")),
        ],
        BodyRule::Fields),
    operation!(DELETE "/api/v1/knowledge/{knowledge_id}" => "delete_knowledge_base",
        "Delete a knowledge base.\n\nWARNING: This will delete all documents in the knowledge base!",
        [KNOWLEDGE_ID]),
    // -- chats ---------------------------------------------------------------
    operation!(GET "/api/v1/chats/" => "list_chats",
        "List the current user's chats.\n\nReturns chat IDs, titles, and timestamps.",
        [PAGE]),
    operation!(GET "/api/v1/chats/{chat_id}" => "get_chat",
        "Get a specific chat's details and messages.\n\nReturns the full chat history.",
        [CHAT_ID]),
    operation!(DELETE "/api/v1/chats/{chat_id}" => "delete_chat",
        "Delete a chat.\n\nWARNING: This action cannot be undone!",
        [CHAT_ID]),
    operation!(DELETE "/api/v1/chats/" => "delete_all_chats",
        "Delete all of the current user's chats.\n\nWARNING: This action cannot be undone!",
        []),
    // -- tools and functions -------------------------------------------------
    operation!(GET "/api/v1/tools/" => "list_tools",
        "List all available tools in Open WebUI.\n\nReturns tools with their IDs, names, and descriptions.",
        []),
    operation!(GET "/api/v1/tools/id/{tool_id}" => "get_tool",
        "Get details for a specific tool, including its source and manifest.",
        [TOOL_ID]),
    operation!(GET "/api/v1/functions/" => "list_functions",
        "List all functions (filters/pipes) in Open WebUI.\n\n\
         ADMIN ONLY: Requires admin permissions.",
        []),
    operation!(GET "/api/v1/functions/id/{function_id}" => "get_function",
        "Get details for a specific function (filter/pipe).\n\nADMIN ONLY: Requires admin permissions.",
        [FUNCTION_ID]),
    // -- system --------------------------------------------------------------
    operation!(GET "/api/v1/configs/" => "get_system_config",
        "Get Open WebUI system configuration.\n\nADMIN ONLY: Requires admin permissions.",
        []),
];

/// `{id, name, base_model_id, meta, params}`; `meta` and `params` are always
/// present, empty when nothing was supplied. An empty system prompt is
/// treated as absent.
fn create_model_body(args: &Map<String, Value>) -> Value {
    let mut meta = Map::new();
    if let Some(prompt) = args.get("system_prompt").and_then(Value::as_str) {
        if !prompt.is_empty() {
            meta.insert("system".to_string(), json!(prompt));
        }
    }

    json!({
        "id": args.get("id"),
        "name": args.get("name"),
        "base_model_id": args.get("base_model_id"),
        "meta": meta,
        "params": model_params(args).unwrap_or_default(),
    })
}

/// Only the supplied parts: `name`, `meta.system`, and `params` when either
/// sampling setting is given.
fn update_model_body(args: &Map<String, Value>) -> Value {
    let mut body = Map::new();
    if let Some(name) = args.get("name") {
        body.insert("name".to_string(), name.clone());
    }
    if let Some(prompt) = args.get("system_prompt") {
        body.insert("meta".to_string(), json!({ "system": prompt }));
    }
    if let Some(params) = model_params(args) {
        body.insert("params".to_string(), Value::Object(params));
    }
    Value::Object(body)
}

fn model_params(args: &Map<String, Value>) -> Option<Map<String, Value>> {
    let params: Map<String, Value> = ["temperature", "max_tokens"]
        .into_iter()
        .filter_map(|key| args.get(key).map(|v| (key.to_string(), v.clone())))
        .collect();
    (!params.is_empty()).then_some(params)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use openwebui_mcp_core::{GatewayError, ParamLocation};

    use super::*;

    fn find(name: &str) -> &'static OperationDescriptor {
        OPERATIONS.iter().find(|op| op.name == name).unwrap()
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for op in OPERATIONS {
            assert!(seen.insert(op.name), "duplicate operation {}", op.name);
        }
        assert_eq!(OPERATIONS.len(), 30);
    }

    #[test]
    fn path_placeholders_match_path_params() {
        for op in OPERATIONS {
            let placeholders: HashSet<_> = op.path_placeholders().into_iter().collect();
            let path_params: HashSet<_> = op
                .params
                .iter()
                .filter(|p| p.location == ParamLocation::Path)
                .map(|p| p.name)
                .collect();
            assert_eq!(placeholders, path_params, "{}", op.name);
            assert!(op.path.starts_with("/api/v1/"), "{}", op.name);
        }
    }

    #[test]
    fn bodies_only_on_writes() {
        for op in OPERATIONS {
            if matches!(op.method, HttpMethod::Get | HttpMethod::Delete) {
                assert!(matches!(op.body, BodyRule::Empty), "{}", op.name);
            }
        }
    }

    #[test]
    fn delete_ids_cannot_reach_collection_endpoints() {
        for (tool, key) in [
            ("delete_chat", "chat_id"),
            ("delete_user", "user_id"),
            ("delete_group", "group_id"),
            ("delete_model", "model_id"),
            ("delete_knowledge_base", "knowledge_id"),
        ] {
            for bad in [".", "..", "%2e", "%2E%2E", "x\\.."] {
                let err = find(tool).bind(&args(json!({ key: bad }))).unwrap_err();
                assert!(matches!(err, GatewayError::Validation { .. }), "{tool} {bad}");
            }
        }

        let binding = find("delete_chat")
            .bind(&args(json!({"chat_id": "c.1"})))
            .unwrap();
        assert_eq!(binding.request.path, "/api/v1/chats/c.1");
        assert_eq!(binding.request.method, HttpMethod::Delete);
    }

    #[test]
    fn every_schema_accepts_api_key() {
        for op in OPERATIONS {
            let schema = op.input_schema();
            assert!(schema["properties"]["api_key"].is_object(), "{}", op.name);
        }
    }

    #[test]
    fn create_model_body_always_has_meta_and_params() {
        let binding = find("create_model")
            .bind(&args(json!({
                "id": "my-model",
                "name": "My Model",
                "base_model_id": "gpt-4",
            })))
            .unwrap();
        assert_eq!(
            binding.request.body,
            Some(json!({
                "id": "my-model",
                "name": "My Model",
                "base_model_id": "gpt-4",
                "meta": {},
                "params": {},
            }))
        );
    }

    #[test]
    fn create_model_body_with_settings() {
        let binding = find("create_model")
            .bind(&args(json!({
                "id": "m",
                "name": "M",
                "base_model_id": "base",
                "system_prompt": "Be brief.",
                "temperature": 0.3,
                "max_tokens": 512,
            })))
            .unwrap();
        let body = binding.request.body.unwrap();
        assert_eq!(body["meta"], json!({"system": "Be brief."}));
        assert_eq!(body["params"], json!({"temperature": 0.3, "max_tokens": 512}));
    }

    #[test]
    fn update_model_body_has_only_supplied_parts() {
        let op = find("update_model");

        let name_only = op
            .bind(&args(json!({"model_id": "m", "name": "Renamed"})))
            .unwrap();
        assert_eq!(name_only.request.path, "/api/v1/models/m/update");
        assert_eq!(name_only.request.body, Some(json!({"name": "Renamed"})));

        let tokens_only = op
            .bind(&args(json!({"model_id": "m", "max_tokens": 100})))
            .unwrap();
        assert_eq!(
            tokens_only.request.body,
            Some(json!({"params": {"max_tokens": 100}}))
        );

        let prompt = op
            .bind(&args(json!({"model_id": "m", "system_prompt": ""})))
            .unwrap();
        assert_eq!(prompt.request.body, Some(json!({"meta": {"system": ""}})));
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let err = find("update_model")
            .bind(&args(json!({"model_id": "m", "temperature": 2.5})))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation { .. }));
    }

    #[test]
    fn role_must_be_known() {
        let op = find("update_user_role");
        assert!(op
            .bind(&args(json!({"user_id": "u", "role": "superuser"})))
            .is_err());

        let binding = op
            .bind(&args(json!({"user_id": "u", "role": "admin"})))
            .unwrap();
        assert_eq!(binding.request.path, "/api/v1/users/u/update/role");
        assert_eq!(binding.request.body, Some(json!({"role": "admin"})));
    }

    #[test]
    fn group_membership_splits_path_and_body() {
        let binding = find("add_user_to_group")
            .bind(&args(json!({"group_id": "g1", "user_id": "u1"})))
            .unwrap();
        assert_eq!(binding.request.path, "/api/v1/groups/id/g1/users/add");
        assert_eq!(binding.request.body, Some(json!({"user_id": "u1"})));
    }

    #[test]
    fn update_group_sends_only_provided_fields() {
        let binding = find("update_group")
            .bind(&args(json!({"group_id": "g1", "description": "new"})))
            .unwrap();
        assert_eq!(binding.request.body, Some(json!({"description": "new"})));
    }
}
