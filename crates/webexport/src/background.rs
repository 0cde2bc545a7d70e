//! The privileged side of screenshot capture.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::HostError;
use crate::messages::{CaptureResponse, CAPTURE_VISIBLE_TAB};

/// `tabs.captureVisibleTab`
#[async_trait(?Send)]
pub trait TabCapturer {
    /// PNG data URL of the visible area of the tab's window
    async fn capture_visible_tab(&self, window_id: Option<u64>) -> Result<String, HostError>;
}

/// Answer a capture request. Messages of any other type are not ours to answer and
/// yield `None`.
pub async fn handle_capture_request(
    capturer: Option<&dyn TabCapturer>,
    message: &Value,
    window_id: Option<u64>,
) -> Option<CaptureResponse> {
    if message.get("type").and_then(Value::as_str) != Some(CAPTURE_VISIBLE_TAB) {
        return None;
    }
    let result = match capturer {
        Some(capturer) => capturer.capture_visible_tab(window_id).await,
        None => Err(HostError::Unavailable("Tabs capture API".to_string())),
    };
    Some(match result {
        Ok(data_url) => CaptureResponse::success(data_url),
        Err(err) => {
            warn!(error = %err, "tab capture failed");
            CaptureResponse::failure(err.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::capture_request;
    use serde_json::json;

    struct Capturer;

    #[async_trait(?Send)]
    impl TabCapturer for Capturer {
        async fn capture_visible_tab(&self, window_id: Option<u64>) -> Result<String, HostError> {
            match window_id {
                Some(_) => Ok("data:image/png;base64,AA==".to_string()),
                None => Err(HostError::Failed("No window".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_capture_success_and_failure() {
        let capturer = Capturer;
        let response = handle_capture_request(Some(&capturer), &capture_request(), Some(1)).await;
        assert_eq!(response, Some(CaptureResponse::success("data:image/png;base64,AA==")));

        let response = handle_capture_request(Some(&capturer), &capture_request(), None).await;
        assert_eq!(response, Some(CaptureResponse::failure("No window")));
    }

    #[tokio::test]
    async fn test_missing_capture_api() {
        let response = handle_capture_request(None, &capture_request(), Some(1)).await;
        assert_eq!(response, Some(CaptureResponse::failure("Tabs capture API unavailable")));
    }

    #[tokio::test]
    async fn test_other_messages_ignored() {
        let response =
            handle_capture_request(None, &json!({"type": "START_SELECTION"}), None).await;
        assert_eq!(response, None);
    }
}
