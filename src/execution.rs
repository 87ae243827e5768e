//! Typed execution framework every exposed operation goes through.
//!
//! `execute` is the one place where failures of any kind, panics included,
//! become an `Err`. Layers below return errors and never catch them.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::{ScraperError, ScraperResult};

/// Raw arguments of a tool, as declared to the protocol server.
pub trait ToolInput: DeserializeOwned + JsonSchema {
    type Validated;

    /// Checks every rule and reports all violations, not just the first.
    ///
    /// Each violation reads `field: rule`.
    fn validate(self) -> Result<Self::Validated, Vec<String>>;
}

/// Static description of an exposed operation.
pub trait Tool {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    type Input: ToolInput;
    type Output: Serialize;

    fn input_schema() -> RootSchema {
        schemars::schema_for!(Self::Input)
    }
}

/// Cancellation check, validation, invocation and error capture for one call.
///
/// A cancelled token fails the call before the arguments are even looked at.
pub async fn execute<I, T>(
    operation_name: &str,
    raw_args: Value,
    token: Option<&CancellationToken>,
    operation: impl AsyncFnOnce(I::Validated, &CancellationToken) -> ScraperResult<T>,
) -> ScraperResult<T>
where
    I: ToolInput,
{
    let fallback_token;
    let token = match token {
        Some(token) => token,
        None => {
            fallback_token = CancellationToken::new();
            &fallback_token
        }
    };

    if token.is_cancelled() {
        return Err(ScraperError::Cancelled);
    }

    let args = validate_args::<I>(raw_args)?;

    match AssertUnwindSafe(operation(args, token)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("{operation_name} panicked: {message}");
            Err(ScraperError::internal(operation_name, message))
        }
    }
}

/// Deserializes and validates raw arguments.
///
/// # Errors
///
/// [`ScraperError::Validation`] carrying either the shape error or every rule
/// violation.
pub fn validate_args<I: ToolInput>(raw_args: Value) -> ScraperResult<I::Validated> {
    let input: I = serde_json::from_value(raw_args).map_err(|e| ScraperError::Validation {
        violations: vec![format!("arguments: {e}")],
    })?;
    input
        .validate()
        .map_err(|violations| ScraperError::Validation { violations })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Deserialize, JsonSchema)]
    struct EchoArgs {
        word: Option<String>,
        times: Option<i64>,
    }

    impl ToolInput for EchoArgs {
        type Validated = (String, usize);

        fn validate(self) -> Result<Self::Validated, Vec<String>> {
            let mut violations = Vec::new();
            let word = self.word.unwrap_or_default();
            if word.is_empty() {
                violations.push("word: is required".to_string());
            }
            let times = self.times.unwrap_or(1);
            if !(1..=3).contains(&times) {
                violations.push("times: must be between 1 and 3".to_string());
            }
            if violations.is_empty() {
                Ok((word, usize::try_from(times).unwrap_or(1)))
            } else {
                Err(violations)
            }
        }
    }

    #[tokio::test]
    async fn returns_the_operation_value() {
        let result = execute::<EchoArgs, _>(
            "echo",
            json!({ "word": "hej", "times": 2 }),
            None,
            async |(word, times), _token| Ok(word.repeat(times)),
        )
        .await;
        assert_eq!(result.unwrap(), "hejhej");
    }

    #[tokio::test]
    async fn cancelled_token_wins_over_invalid_args() {
        let token = CancellationToken::new();
        token.cancel();
        let ran = AtomicBool::new(false);
        let result = execute::<EchoArgs, ()>("echo", json!({ "times": 9 }), Some(&token), async |_, _| {
            ran.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ScraperError::Cancelled)));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn every_violation_is_reported() {
        let err = execute::<EchoArgs, ()>("echo", json!({ "times": 9 }), None, async |_, _| Ok(()))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("word: is required"), "{message}");
        assert!(message.contains("times: must be between 1 and 3"), "{message}");
    }

    #[tokio::test]
    async fn wrong_shape_is_a_validation_error() {
        let err = execute::<EchoArgs, ()>("echo", json!({ "times": "two" }), None, async |_, _| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::Validation { .. }));
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let err = execute::<EchoArgs, ()>("echo", json!({ "word": "x" }), None, async |_, _| {
            panic!("selector table corrupted")
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ScraperError::Internal { .. }));
        assert_eq!(err.to_string(), "echo: selector table corrupted");
    }

    #[tokio::test]
    async fn non_string_panic_payloads_are_stringified() {
        let err = execute::<EchoArgs, ()>("echo", json!({ "word": "x" }), None, async |_, _| {
            std::panic::panic_any(42_u8)
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("non-string payload"));
    }

    #[test]
    fn schema_is_generated_from_the_input_type() {
        struct Echo;
        impl Tool for Echo {
            const NAME: &'static str = "echo";
            const DESCRIPTION: &'static str = "Repeats a word";
            type Input = EchoArgs;
            type Output = String;
        }
        let schema = serde_json::to_value(Echo::input_schema()).unwrap();
        assert!(schema["properties"]["word"].is_object());
    }
}
