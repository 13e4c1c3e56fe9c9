//! Display language commands.

use bazaar_storefront::AppState;

/// Print the current language.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let locale = state.locale().locale();
    println!(
        "{}",
        state.i18n().t("locale.current", &[("locale", locale.as_str())])
    );
}

/// Switch language. Unsupported tags select Russian.
#[allow(clippy::print_stdout)]
pub fn set(state: &AppState, tag: &str) {
    let locale = state.locale().set_locale(tag);
    println!(
        "{}",
        state.i18n().t("locale.changed", &[("locale", locale.as_str())])
    );
}
