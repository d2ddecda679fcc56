// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({"description": description, "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}})
}

fn admin_header() -> Value {
    json!({"name": "x-admin-passcode", "in": "header", "required": true, "schema": {"type": "string"}})
}

fn project_header() -> Value {
    json!({"name": "x-project-passcode", "in": "header", "required": true, "schema": {"type": "string"}, "description": "project passcode or the admin passcode"})
}

fn path_param(name: &str) -> Value {
    json!({"name": name, "in": "path", "required": true, "schema": {"type": "string"}})
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    json!({
      "openapi": "3.0.3",
      "info": {"title": "flowkeep API", "version": "v1"},
      "paths": {
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/v1/openapi.json": {"get": {"responses": {"200": {"description": "this document"}}}},
        "/api/validate-font": {
          "post": {
            "requestBody": {"required": true, "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ValidateFontRequest"}}}},
            "responses": {
              "200": {"description": "font coverage verdict", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ValidateFontResponse"}}}},
              "400": {"description": "missing or empty text", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/LegacyErrorBody"}}}},
              "500": {"description": "validator failure", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/LegacyErrorBody"}}}}
            }
          }
        },
        "/v1/admin/verify": {
          "post": {"responses": {"200": {"description": "passcode accepted"}, "401": error_response("wrong passcode"), "503": error_response("admin passcode not configured")}}
        },
        "/v1/admin/passcode": {
          "post": {"parameters": [admin_header()], "responses": {"200": {"description": "passcode changed"}, "400": error_response("rejected change"), "401": error_response("wrong passcode")}}
        },
        "/v1/projects": {
          "get": {"parameters": [admin_header()], "responses": {"200": {"description": "projects with passcodes"}, "401": error_response("wrong passcode")}},
          "post": {"parameters": [admin_header()], "responses": {"201": {"description": "project created"}, "400": error_response("invalid fields"), "409": error_response("duplicate name or passcode")}}
        },
        "/v1/projects/directory": {"get": {"responses": {"200": {"description": "public project listing"}}}},
        "/v1/projects/{project_id}": {
          "get": {"parameters": [path_param("project_id"), project_header()], "responses": {"200": {"description": "project detail"}, "401": error_response("wrong passcode"), "404": error_response("unknown project")}},
          "put": {"parameters": [path_param("project_id"), admin_header()], "responses": {"200": {"description": "project updated"}, "409": error_response("duplicate name or passcode")}},
          "delete": {"parameters": [path_param("project_id"), admin_header()], "responses": {"200": {"description": "project and its transactions deleted"}, "401": error_response("confirmation passcode mismatch")}}
        },
        "/v1/projects/{project_id}/unlock": {
          "post": {"parameters": [path_param("project_id")], "responses": {"200": {"description": "passcode accepted"}, "401": error_response("wrong passcode")}}
        },
        "/v1/projects/{project_id}/statistics": {
          "get": {"parameters": [path_param("project_id"), project_header()], "responses": {"200": {"description": "totals and per-item breakdown"}}}
        },
        "/v1/projects/{project_id}/export.xlsx": {
          "get": {"parameters": [path_param("project_id"), project_header()], "responses": {"200": {"description": "xlsx workbook"}}}
        },
        "/v1/projects/{project_id}/transactions": {
          "post": {"parameters": [path_param("project_id"), project_header()], "responses": {"201": {"description": "transaction created"}, "400": error_response("invalid transaction")}}
        },
        "/v1/projects/{project_id}/transactions/{transaction_id}": {
          "put": {"parameters": [path_param("project_id"), path_param("transaction_id"), project_header()], "responses": {"200": {"description": "transaction updated"}, "404": error_response("unknown transaction")}},
          "delete": {"parameters": [path_param("project_id"), path_param("transaction_id"), project_header()], "responses": {"200": {"description": "transaction deleted"}, "404": error_response("unknown transaction")}}
        },
        "/v1/projects/{project_id}/common-items/{kind}": {
          "delete": {"parameters": [path_param("project_id"), path_param("kind"), project_header()], "responses": {"200": {"description": "common items cleared"}}}
        },
        "/v1/projects/{project_id}/common-items/{kind}/{item}": {
          "delete": {"parameters": [path_param("project_id"), path_param("kind"), path_param("item"), project_header()], "responses": {"200": {"description": "common item removed"}}}
        },
        "/v1/fonts/unsupported": {
          "get": {"parameters": [admin_header()], "responses": {"200": {"description": "cached unsupported characters"}}},
          "post": {"parameters": [admin_header()], "responses": {"200": {"description": "characters added to the in-memory list"}}}
        },
        "/v1/fonts/unsupported/reload": {
          "post": {"parameters": [admin_header()], "responses": {"200": {"description": "unsupported list re-read from its source"}}}
        },
        "/v1/fonts/cache/invalidate": {
          "post": {"parameters": [admin_header()], "responses": {"200": {"description": "character lists dropped"}}}
        }
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "request_id"],
            "properties": {
              "code": {"type": "string"},
              "message": {"type": "string"},
              "details": {"type": "object"},
              "request_id": {"type": "string"}
            },
            "additionalProperties": false
          },
          "LegacyErrorBody": {
            "type": "object",
            "required": ["error"],
            "properties": {"error": {"type": "string"}}
          },
          "ValidateFontRequest": {
            "type": "object",
            "required": ["text"],
            "properties": {"text": {"type": "string", "minLength": 1}}
          },
          "ValidateFontResponse": {
            "type": "object",
            "required": ["isSupported", "unsupportedChars"],
            "properties": {
              "isSupported": {"type": "boolean"},
              "unsupportedChars": {"type": "array", "items": {"type": "string"}},
              "reason": {"type": "string", "enum": ["found_in_unsupported_list"]}
            }
          }
        }
      }
    })
}
