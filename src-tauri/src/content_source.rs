use std::path::PathBuf;

use tauri::WebviewUrl;
use url::Url;

/// Where the main window loads its UI from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContentSource {
    DevServer(Url),
    /// Path relative to the bundled frontend assets.
    Packaged(PathBuf),
}

impl ContentSource {
    pub(crate) fn to_webview_url(&self) -> WebviewUrl {
        match self {
            Self::DevServer(url) => WebviewUrl::External(url.clone()),
            Self::Packaged(path) => WebviewUrl::App(path.clone()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::DevServer(url) => url.to_string(),
            Self::Packaged(path) => format!("app://{}", path.display()),
        }
    }
}
