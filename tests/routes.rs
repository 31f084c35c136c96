use actix_web_flash_messages::Level;

use buscrm::routes::{alert_level_to_str, check_role};

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[test]
fn test_check_role() {
    let roles = vec!["crm".to_string(), "crm_admin".to_string()];
    assert!(check_role("crm", &roles));
    assert!(check_role("crm_admin", &roles));
    assert!(!check_role("other", &roles));
    assert!(!check_role("crm", &[]));
}
