//! Navigation guard evaluation.

use bazaar_storefront::AppState;
use bazaar_storefront::router::{self, Navigation};

/// Resolve `path` and report where the guards would send the user.
#[allow(clippy::print_stdout)]
pub async fn evaluate(state: &AppState, path: &str) {
    let i18n = state.i18n();
    let Some(resolved) = router::resolve(path) else {
        println!("{}", i18n.t("navigation.not_found", &[("path", path)]));
        return;
    };

    match state.router().before_each(&resolved).await {
        Navigation::Allow => {
            println!("{}", i18n.t(resolved.route.title_key, &[]));
            println!(
                "{}",
                i18n.t("navigation.allowed", &[("path", resolved.full_path.as_str())])
            );
        }
        Navigation::Redirect(location) => println!(
            "{}",
            i18n.t(
                "navigation.redirected",
                &[
                    ("path", resolved.full_path.as_str()),
                    ("target", location.to_path().as_str()),
                ],
            )
        ),
    }
}
