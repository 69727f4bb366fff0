// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use chaos_meter_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_series() {
        let err = CoreError::InvalidSeries("expected a JSON array".into());
        assert_eq!(err.to_string(), "Invalid series payload: expected a JSON array");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "HTTP".into(),
            message: "404 Not Found".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP): 404 Not Found");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("Unknown range window: \"5d\"".into());
        assert_eq!(err.to_string(), "Validation failed: Unknown range window: \"5d\"");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("no such file")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn parse() -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str("[1,")?)
        }
        assert!(parse().is_err());
    }

    #[test]
    fn error_is_debug_and_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        let err = CoreError::Network("x".into());
        assert_error(&err);
        assert!(format!("{err:?}").contains("Network"));
    }
}
