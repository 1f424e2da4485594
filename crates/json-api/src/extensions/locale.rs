//! Locale query parsing helpers.

use salvo::oapi::extract::QueryParam;
use tracing::debug;

use auvea_app::locale::Locale;

pub(crate) trait LocaleExt {
    /// Requested locale, falling back to the default for missing or unknown values.
    fn into_locale(self) -> Locale;
}

impl LocaleExt for QueryParam<String, false> {
    fn into_locale(self) -> Locale {
        let Some(raw) = self.into_inner() else {
            return Locale::default();
        };

        raw.parse().unwrap_or_else(|error| {
            debug!("falling back to default locale: {error}");

            Locale::default()
        })
    }
}
