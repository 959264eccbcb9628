use serde::{Deserialize, Serialize};

/// Feature flags reported to the dashboard in reply to `config/get`.
///
/// Deserialized from snake_case configuration keys; serialized with the
/// camelCase names the dashboard expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AppConfiguration {
    #[serde(default = "default_true")]
    pub has_settings_screen: bool,
    #[serde(default)]
    pub can_write_tag: bool,
    #[serde(default)]
    pub can_commission_matter: bool,
    #[serde(default)]
    pub can_import_thread_credentials: bool,
    #[serde(default = "default_true", rename(serialize = "hasBarCodeScanner"))]
    pub has_barcode_scanner: bool,
    #[serde(default)]
    pub can_transfer_thread_credentials_to_keychain: bool,
    #[serde(default = "default_true")]
    pub has_assist: bool,
    #[serde(default = "default_true")]
    pub can_setup_improv: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            has_settings_screen: true,
            can_write_tag: false,
            can_commission_matter: false,
            can_import_thread_credentials: false,
            has_barcode_scanner: true,
            can_transfer_thread_credentials_to_keychain: false,
            has_assist: true,
            can_setup_improv: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_dashboard_keys() {
        let encoded = serde_json::to_value(AppConfiguration::default()).unwrap();
        assert_eq!(
            encoded,
            json!({
                "hasSettingsScreen": true,
                "canWriteTag": false,
                "canCommissionMatter": false,
                "canImportThreadCredentials": false,
                "hasBarCodeScanner": true,
                "canTransferThreadCredentialsToKeychain": false,
                "hasAssist": true,
                "canSetupImprov": true,
            })
        );
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: AppConfiguration =
            serde_json::from_value(json!({ "can_write_tag": true })).unwrap();
        assert!(config.can_write_tag);
        assert!(config.has_settings_screen);
        assert!(!config.can_commission_matter);
    }
}
