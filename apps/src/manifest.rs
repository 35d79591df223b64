use serde_json::{json, Value};

use crate::config::AgentConfig;

const INSTRUCTIONS: &str = "You create EVM transactions and signature requests using the generate-evm-tx primitive. \
Specifically, the success responses for tool sendTransaction, eth_sign, personal_sign and eth_signTypedData should trigger generate-evm-tx. \
After a message or typed data is signed, pass the message, evmAddress and signature back into the validate tool. \
To validate a signature, you must provide three pieces of information: \
1) REQUIRED: the original message/data that was signed, \
2) REQUIRED: the Ethereum address that allegedly created the signature, and \
3) REQUIRED: the signature itself (65-byte hex string starting with 0x). \
Only validate signatures once unless explicitly requested to try again.";

/// OpenAPI document advertising the tool routes to the agent runtime.
pub fn plugin_manifest(config: &AgentConfig) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Test EVM Signature Schemes Agent",
            "description": "API producing EVM signature request payloads",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "servers": [{ "url": config.plugin_url }],
        "x-mb": {
            "account-id": config.account_id,
            "assistant": {
                "name": "Test EVM Transaction Agent",
                "description": "An agent that constructs EVM signature requests and validates cryptographic signatures. \
Use the generate-evm-tx primitive to create signature requests for transactions, personal messages, or EIP-712 typed data. \
After a user signs a request, offer to validate the signature using the validate tool to verify authenticity.",
                "instructions": INSTRUCTIONS,
                "tools": [{ "type": "generate-evm-tx" }],
                "chainIds": [config.chain_id],
            },
        },
        "paths": tool_paths(),
        "components": components(),
    })
}

fn tool_paths() -> Value {
    let sign_request_response = json!({ "$ref": "#/components/responses/SignRequestResponse200" });
    let param = |name: &str| json!({ "$ref": format!("#/components/parameters/{name}") });

    json!({
        "/api/tools/sendTransaction": {
            "get": {
                "summary": "returns non-trivial sendTransaction payloads",
                "description": "Constructs non-trivial transactions to self, some zero-valued (succeeding) and some unfundable (failing)",
                "operationId": "sendTransaction",
                "parameters": [param("numSuccess"), param("numFail"), param("callData"), param("evmAddress")],
                "responses": { "200": sign_request_response },
            },
        },
        "/api/tools/eth_sign": {
            "get": {
                "summary": "returns non-trivial eth_sign request",
                "description": "Constructs eth_sign payload based on user's input message (to sign).",
                "operationId": "eth_sign",
                "parameters": [param("message"), param("evmAddress")],
                "responses": { "200": sign_request_response },
            },
        },
        "/api/tools/personal_sign": {
            "get": {
                "summary": "returns non-trivial personal_sign request",
                "description": "Constructs personal_sign payload based on user's input message (to sign).",
                "operationId": "personal_sign",
                "parameters": [param("message"), param("evmAddress")],
                "responses": { "200": sign_request_response },
            },
        },
        "/api/tools/eth_signTypedData": {
            "get": {
                "summary": "returns non-trivial eth_signTypedData request.",
                "description": "Constructs signable (expired) eth_signTypedData payload.",
                "operationId": "eth_signTypedData",
                "parameters": [param("evmAddress")],
                "responses": { "200": sign_request_response },
            },
        },
        "/api/tools/validate": {
            "get": {
                "summary": "Validates EVM signature authenticity",
                "description": "Verifies that a cryptographic signature was created by the specified Ethereum address for the given message or typed data. \
Returns true if the signature is valid and was created by the provided address, false otherwise. \
This endpoint supports both plain text messages and EIP-712 structured data.",
                "operationId": "validate",
                "parameters": [
                    {
                        "name": "message",
                        "in": "query",
                        "required": true,
                        "description": "The original message or data that was signed. For EIP-712 typed data, provide its JSON encoding.",
                        "schema": {
                            "oneOf": [
                                { "type": "string" },
                                { "$ref": "#/components/schemas/TypedData" },
                            ],
                        },
                    },
                    param("evmAddress"),
                    {
                        "name": "signature",
                        "in": "query",
                        "required": true,
                        "description": "65-byte hex signature starting with '0x'.",
                        "schema": { "type": "string", "pattern": "^0x[a-fA-F0-9]{130}$" },
                    },
                ],
                "responses": {
                    "200": {
                        "description": "Validation result",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": { "valid": { "type": "boolean" } },
                                },
                            },
                        },
                    },
                },
            },
        },
    })
}

fn components() -> Value {
    json!({
        "parameters": {
            "numSuccess": count_param("numSuccess", "Number of successful transactions", true),
            "numFail": count_param("numFail", "Number of failing transactions", false),
            "message": {
                "name": "message",
                "in": "query",
                "required": false,
                "description": "any text message",
                "schema": { "type": "string" },
                "example": "Hello Bitte",
            },
            "callData": {
                "name": "callData",
                "in": "query",
                "required": false,
                "description": "Hex String with even length representing transaction call data.",
                "schema": { "type": "string" },
                "example": "0x80081E05",
            },
            "evmAddress": {
                "name": "evmAddress",
                "in": "query",
                "required": true,
                "description": "20 byte Ethereum address with 0x prefix",
                "schema": { "type": "string" },
            },
        },
        "responses": {
            "SignRequestResponse200": {
                "description": "Sign request for the wallet and a human-readable summary",
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "required": ["transaction", "meta"],
                            "properties": {
                                "transaction": { "$ref": "#/components/schemas/SignRequest" },
                                "meta": { "type": "string" },
                            },
                        },
                    },
                },
            },
        },
        "schemas": {
            "SignRequest": {
                "type": "object",
                "required": ["chainId", "method", "params"],
                "properties": {
                    "chainId": { "type": "integer" },
                    "method": {
                        "type": "string",
                        "enum": [
                            "eth_sign",
                            "personal_sign",
                            "eth_sendTransaction",
                            "eth_signTypedData",
                            "eth_signTypedData_v4",
                        ],
                    },
                    "params": { "type": "array" },
                },
            },
            "TypedData": {
                "type": "object",
                "description": "EIP-712 TypedData object",
                "required": ["types", "primaryType", "domain", "message"],
                "properties": {
                    "types": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["name", "type"],
                                "properties": {
                                    "name": { "type": "string" },
                                    "type": { "type": "string" },
                                },
                            },
                        },
                    },
                    "primaryType": { "type": "string" },
                    "domain": { "type": "object" },
                    "message": { "type": "object" },
                },
            },
        },
    })
}

fn count_param(name: &str, description: &str, required: bool) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": required,
        "description": description,
        "schema": { "type": "number" },
        "example": 1,
    })
}
