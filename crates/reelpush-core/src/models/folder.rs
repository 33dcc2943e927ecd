use serde::{Deserialize, Serialize};

/// Opaque folder identity assigned by the remote service.
pub type FolderId = String;

/// Asset folder inside a site. The display name is treated as the folder's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFolder {
    pub id: FolderId,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl RemoteFolder {
    /// Exact, case-sensitive display name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.display_name.as_deref() == Some(name)
    }
}
