//! Output file naming.
//!
//! Each exported visual produces a pair of files named after its page,
//! its position on the page and its visual type:
//!
//! ```text
//! config_<page>_<index>_<type>.json   raw object set
//! theme_<page>_<index>_<type>.json    theme document
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\-]+").expect("unsafe-run pattern is valid"));

/// Replace each run of characters other than word characters and `-` with `_`.
///
/// ```
/// use pbip_theme::naming::sanitize;
///
/// assert_eq!(sanitize("Sales Overview (2024)"), "Sales_Overview_2024_");
/// assert_eq!(sanitize("clusteredBarChart"), "clusteredBarChart");
/// ```
pub fn sanitize(name: &str) -> String {
    UNSAFE_RUN.replace_all(name, "_").into_owned()
}

/// File names for one exported visual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Raw object set dump.
    pub config: String,
    /// Theme document.
    pub theme: String,
}

impl OutputNames {
    pub fn for_visual(page_name: &str, container_index: usize, visual_type: &str) -> Self {
        let stem = format!(
            "{}_{}_{}",
            sanitize(page_name),
            container_index,
            sanitize(visual_type)
        );
        Self {
            config: format!("config_{stem}.json"),
            theme: format!("theme_{stem}.json"),
        }
    }
}
