//! Keyword smartlinking for markdown articles.
//!
//! The [`linkify`] engine wraps configured keywords in markdown links while
//! leaving existing links, images, code and URLs alone. [`SmartlinkSettings`]
//! reads the site's keyword configuration, and [`slugify`] builds article
//! slugs from titles.
//!
//! ```
//! let out = smartlinker::linkify("MAINFRAME uses AI daily", &["AI"], "https://x.test");
//! assert_eq!(out, "MAINFRAME uses [AI](https://x.test) daily");
//! ```

pub mod linkify;
pub mod report;
pub mod settings;
pub mod slug;

pub use linkify::{
    apply, linkify, linkify_rules, parse_keywords, plan, rules_for, LinkRule, LinkifyOptions,
    Match, Occurrences,
};
pub use settings::{SettingsError, SmartlinkSettings};
pub use slug::slugify;
