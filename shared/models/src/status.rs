//! Operating status codes shared by facilities, units, processes, release points and controls.

/// Operating
pub const STATUS_OPERATING: &str = "OP";
/// Temporarily shutdown
pub const STATUS_TEMPORARILY_SHUTDOWN: &str = "TS";
/// Permanently shutdown
pub const STATUS_PERMANENTLY_SHUTDOWN: &str = "PS";
/// Operating but not reporting
pub const STATUS_OPERATING_NOT_REPORTING: &str = "ONRE";
/// Operating, not permitted
pub const STATUS_OPERATING_NOT_PERMITTED: &str = "ONP";

/// Facility source type for landfills. Units at landfills keep reporting
/// processes after the unit itself shuts down.
pub const FACILITY_SOURCE_LANDFILL: &str = "104";

pub fn is_operating(code: Option<&str>) -> bool {
    code == Some(STATUS_OPERATING)
}

pub fn is_shutdown(code: Option<&str>) -> bool {
    matches!(code, Some(STATUS_TEMPORARILY_SHUTDOWN) | Some(STATUS_PERMANENTLY_SHUTDOWN))
}

pub fn is_permanently_shutdown(code: Option<&str>) -> bool {
    code == Some(STATUS_PERMANENTLY_SHUTDOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_codes() {
        assert!(is_shutdown(Some("TS")));
        assert!(is_shutdown(Some("PS")));
        assert!(!is_shutdown(Some("OP")));
        assert!(!is_shutdown(None));
        assert!(is_operating(Some("OP")));
        assert!(!is_operating(Some("ONRE")));
    }
}
