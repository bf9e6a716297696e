//! Realtime session configuration and the built-in agent preset.

// crates.io
use serde_json::{Value, json};
// self
use crate::_prelude::*;

/// Model requested by the default preset.
pub const DEFAULT_MODEL: &str = "gpt-4o-realtime-preview-2024-12-17";
/// Voice requested by the default preset.
pub const DEFAULT_VOICE: &str = "alloy";

const ECOMMERCE_INSTRUCTIONS: &str = "You are an E-commerce agent. Your main task is to help users find products by filtering them based on their voice commands. Use the 'filter_products' tool when the user asks to find specific products. If you cannot fulfill the request with the available tools, respond naturally and explain what you can do.";

/// Interaction channels the realtime session should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
	/// Spoken responses.
	Audio,
	/// Text transcripts and chat.
	Text,
}

/// Tool kinds accepted by the realtime API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
	#[default]
	/// JSON-schema described function call.
	Function,
}

/// Function declaration the model may call during the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
	/// Tool kind; always `function` today.
	#[serde(rename = "type")]
	pub kind: ToolKind,
	/// Function name the model emits when calling the tool.
	pub name: String,
	/// Natural-language description shown to the model.
	pub description: String,
	/// JSON schema of the function arguments.
	pub parameters: Value,
}
impl ToolDefinition {
	/// Creates a function tool with the provided argument schema.
	pub fn function(
		name: impl Into<String>,
		description: impl Into<String>,
		parameters: Value,
	) -> Self {
		Self {
			kind: ToolKind::Function,
			name: name.into(),
			description: description.into(),
			parameters,
		}
	}

	/// Product filter used by the e-commerce preset.
	pub fn filter_products() -> Self {
		Self::function(
			"filter_products",
			"Filters products in an online store based on user criteria.",
			json!({
				"type": "object",
				"properties": {
					"category": { "type": "string", "description": "e.g., shoes, shirts, etc." },
					"color": { "type": "string", "description": "e.g., red, blue, etc." },
					"max_price": { "type": "number", "description": "Maximum price in USD" }
				},
				"required": ["category"]
			}),
		)
	}
}

/// Fixed configuration sent with every session request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
	/// Realtime model identifier.
	pub model: String,
	/// System instructions for the agent.
	pub instructions: String,
	/// Output voice.
	pub voice: String,
	/// Enabled response modalities.
	pub modalities: Vec<Modality>,
	/// Function declarations available to the model.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tools: Vec<ToolDefinition>,
}
impl SessionConfig {
	/// Creates a session for `model` with the default voice, both modalities, and no tools.
	pub fn new(model: impl Into<String>, instructions: impl Into<String>) -> Self {
		Self {
			model: model.into(),
			instructions: instructions.into(),
			voice: DEFAULT_VOICE.into(),
			modalities: vec![Modality::Audio, Modality::Text],
			tools: Vec::new(),
		}
	}

	/// Voice-driven shop assistant that filters products through `filter_products`.
	pub fn ecommerce_agent() -> Self {
		Self::new(DEFAULT_MODEL, ECOMMERCE_INSTRUCTIONS)
			.with_tool(ToolDefinition::filter_products())
	}

	/// Overrides the output voice.
	pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
		self.voice = voice.into();

		self
	}

	/// Replaces the enabled modalities.
	pub fn with_modalities(mut self, modalities: impl IntoIterator<Item = Modality>) -> Self {
		self.modalities = modalities.into_iter().collect();

		self
	}

	/// Appends a tool declaration.
	pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
		self.tools.push(tool);

		self
	}
}
impl Default for SessionConfig {
	fn default() -> Self {
		Self::ecommerce_agent()
	}
}
