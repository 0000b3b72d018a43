//! Mapping between abstraction types and Ollama-specific types

use crate::llm::core::{
    error::LlmError,
    types::{GenerateRequest, Generation, UsageMetadata},
};

use super::types::{OllamaErrorResponse, OllamaGenerateRequest, OllamaGenerateResponse};

/// Convert our abstraction request to Ollama's request format
pub fn to_ollama_request(model: &str, request: GenerateRequest) -> OllamaGenerateRequest {
    OllamaGenerateRequest {
        model: model.to_string(),
        prompt: request.prompt,
        stream: false,
        options: request.config,
    }
}

/// Convert Ollama's response to a generation, rejecting empty output
pub fn from_ollama_response(
    requested_model: &str,
    response: OllamaGenerateResponse,
) -> Result<Generation, LlmError> {
    if response.response.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let usage = match (response.prompt_eval_count, response.eval_count) {
        (None, None) => None,
        (input, output) => Some(UsageMetadata::new(input.unwrap_or(0), output.unwrap_or(0))),
    };

    let model = if response.model.is_empty() {
        requested_model.to_string()
    } else {
        response.model
    };

    Ok(Generation {
        text: response.response,
        model,
        usage,
    })
}

/// Pull the human readable message out of an Ollama error body
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<OllamaErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;

    fn response(text: &str) -> OllamaGenerateResponse {
        OllamaGenerateResponse {
            model: String::new(),
            response: text.to_string(),
            done: true,
            prompt_eval_count: Some(10),
            eval_count: Some(5),
        }
    }

    #[test]
    fn test_to_ollama_request() {
        let request = GenerateRequest::new("prompt").with_config(GenerationConfig::new(42));
        let ollama = to_ollama_request("mistral", request);
        assert_eq!(ollama.model, "mistral");
        assert_eq!(ollama.prompt, "prompt");
        assert!(!ollama.stream);
        assert_eq!(ollama.options.num_predict, 42);
    }

    #[test]
    fn test_from_response_keeps_text_verbatim() {
        let generation = from_ollama_response("mistral", response("  Use job stories.\n")).unwrap();
        assert_eq!(generation.text, "  Use job stories.\n");
        assert_eq!(generation.model, "mistral");
        assert_eq!(generation.usage, Some(UsageMetadata::new(10, 5)));
    }

    #[test]
    fn test_from_response_rejects_blank_text() {
        let err = from_ollama_response("mistral", response("   ")).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"error":"model not found"}"#), "model not found");
        assert_eq!(error_message("bad gateway"), "bad gateway");
    }
}
