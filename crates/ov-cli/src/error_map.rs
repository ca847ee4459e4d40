use ov_core::OdeError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> OdeError {
    OdeError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: OdeError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    1
}

pub(crate) fn map_package_path(error: std::io::Error) -> OdeError {
    map_error("PACKAGE_READ", error)
}

pub(crate) fn map_cli_output(error: serde_json::Error) -> OdeError {
    map_error("CLI_OUTPUT", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(OdeError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_package_path(std::io::Error::other("path")).code,
            "PACKAGE_READ"
        );

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let error = map_cli_output(invalid);
        assert_eq!(error.code, "CLI_OUTPUT");
        assert!(!error.message.is_empty());
    }
}
