//! Reactive state for the Madeen site: locale, text direction, theme and
//! section content, wired together by [`Site`].

pub mod data;
pub mod fetch;
pub mod host;
pub mod locale;
pub mod observable;
pub mod rtl;
pub mod site;
pub mod theme;

pub use data::{DataStore, PageDataSet};
pub use fetch::{DirFetcher, Fetcher, HttpFetcher};
pub use host::{Host, MemoryHost};
pub use locale::LocaleStore;
pub use observable::{Subscription, Writable};
pub use rtl::RtlFlag;
pub use site::Site;
pub use theme::ThemeStore;
