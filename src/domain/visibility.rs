// Published/unpublished state of the dashboard data
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub is_public_data_enabled: bool,
}

impl PublicSettings {
    pub fn public() -> Self {
        Self {
            is_public_data_enabled: true,
        }
    }

    pub fn private() -> Self {
        Self {
            is_public_data_enabled: false,
        }
    }
}
