use serde::{Deserialize, Serialize};

/// A hyperlink. `href` is always the normalized form, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResource {
    pub text: String,
    pub href: String,
}
