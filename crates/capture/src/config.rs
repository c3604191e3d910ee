//! Capture defaults.

use serde::{Deserialize, Serialize};

/// Default streaming target host.
pub const DEFAULT_TARGET_IP: &str = "192.168.1.10";

/// Default streaming target port.
pub const DEFAULT_TARGET_PORT: u16 = 7777;

/// Request code tagging our consent prompt, so foreign results can be told apart.
pub const CAPTURE_REQUEST_CODE: i32 = 1337;

/// Where captured audio will be streamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTarget {
    pub ip: String,
    pub port: u16,
}

impl Default for CaptureTarget {
    fn default() -> Self {
        Self {
            ip: DEFAULT_TARGET_IP.to_string(),
            port: DEFAULT_TARGET_PORT,
        }
    }
}

/// Arguments of the `start` command. Omitted fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StartArgs {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl CaptureTarget {
    pub fn merge(&mut self, args: &StartArgs) {
        if let Some(ip) = &args.ip {
            self.ip = ip.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
    }
}

/// Ongoing notification shown while the capture service runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundNotice {
    pub channel_id: String,
    pub channel_name: String,
    pub notification_id: i32,
    pub title: String,
    pub text: String,
}

impl Default for ForegroundNotice {
    fn default() -> Self {
        Self {
            channel_id: "viz_capture".to_string(),
            channel_name: "Visualizer Capture".to_string(),
            notification_id: 1001,
            title: "Visualizer".to_string(),
            text: "Capturing audio…".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub request_code: i32,
    /// Target used until a `start` call overrides it.
    pub initial_target: CaptureTarget,
    pub notice: ForegroundNotice,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            request_code: CAPTURE_REQUEST_CODE,
            initial_target: CaptureTarget::default(),
            notice: ForegroundNotice::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_previous_values() {
        let mut target = CaptureTarget::default();

        target.merge(&StartArgs {
            ip: Some("10.0.0.2".to_string()),
            port: None,
        });
        assert_eq!(target.ip, "10.0.0.2");
        assert_eq!(target.port, DEFAULT_TARGET_PORT);

        target.merge(&StartArgs {
            ip: None,
            port: Some(9000),
        });
        assert_eq!(target.ip, "10.0.0.2");
        assert_eq!(target.port, 9000);
    }

    #[test]
    fn test_start_args_fields_are_optional() {
        let args: StartArgs = serde_json::from_str("{}").unwrap();
        assert_eq!(args, StartArgs::default());

        let args: StartArgs = serde_json::from_str(r#"{"ip": "1.2.3.4", "port": 1}"#).unwrap();
        assert_eq!(args.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(args.port, Some(1));
    }
}
