use crate::integration::support::{CONFIG_YAML, VULNERABLE};
use codeaudit::fixtures::{ConfigFixture, VulnerabilityMarkers};

#[test]
fn vulnerable_fixture_carries_all_three_markers() {
    let markers = VulnerabilityMarkers::scan(VULNERABLE);
    assert!(markers.command_injection);
    assert!(markers.sql_injection);
    assert!(markers.xss);
    assert!(markers.all_present());
}

#[test]
fn config_fixture_has_insecure_settings_to_find() {
    let fixture = ConfigFixture::parse(CONFIG_YAML).unwrap();
    assert_eq!(fixture.application_name(), Some("inventory-service"));
    assert!(!fixture.database.is_empty());
    assert_eq!(
        fixture.security_setting("enable_csrf"),
        Some(&serde_yaml::Value::Bool(false))
    );
}
