//! Error taxonomy for provider resolution and requests.

use reqwest::StatusCode;
use thiserror::Error;

/// A failed backend call. Raised by `send_request` and rendered into the
/// transcript by `Conversation::converse`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} rejected the API key ({status}): {body}")]
    Authentication {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response from {provider}: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },

    #[error("invalid request for {provider}: {reason}")]
    InvalidRequest {
        provider: &'static str,
        reason: String,
    },
}

impl ProviderError {
    pub(crate) fn malformed(provider: &'static str, reason: impl Into<String>) -> Self {
        ProviderError::MalformedResponse {
            provider,
            reason: reason.into(),
        }
    }
}

/// Errors surfaced to the shell by the registry and the conversation helper.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(
        "API key required for {provider}. Set the {env_var} environment variable, \
         run `chatcli --setup`, or provide an API key."
    )]
    MissingCredential {
        provider: String,
        env_var: &'static str,
    },

    #[error("Unknown provider: {name}. Available: {}", .available.join(", "))]
    UnknownProvider {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Model {model} not available. Available models: {}", .available.join(", "))]
    InvalidModel {
        model: String,
        available: Vec<&'static str>,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_env_var() {
        let err = ChatError::MissingCredential {
            provider: "openai".to_string(),
            env_var: "OPENAI_API_KEY",
        };
        let msg = err.to_string();
        assert!(msg.contains("openai"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_invalid_model_lists_valid_set() {
        let err = ChatError::InvalidModel {
            model: "gpt-9".to_string(),
            available: vec!["gpt-4o", "gpt-4o-mini"],
        };
        assert_eq!(
            err.to_string(),
            "Model gpt-9 not available. Available models: gpt-4o, gpt-4o-mini"
        );
    }

    #[test]
    fn test_unknown_provider_message() {
        let err = ChatError::UnknownProvider {
            name: "unknownxyz".to_string(),
            available: vec!["openai", "claude"],
        };
        assert_eq!(
            err.to_string(),
            "Unknown provider: unknownxyz. Available: openai, claude"
        );
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: ChatError = ProviderError::malformed("OpenAI", "no choices in response").into();
        assert_eq!(
            err.to_string(),
            "malformed response from OpenAI: no choices in response"
        );
    }
}
