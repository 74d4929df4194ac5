//! Logging setup utilities for the cowatch binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the cowatch library crates and the binary itself.
/// It can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "cowatch-server", "cowatch-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use cowatch_shared::logger::setup_logger;
///
/// setup_logger("cowatch-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

const LIBRARY_TARGETS: [&str; 3] = ["cowatch_shared", "cowatch_server", "cowatch_client"];

/// Build the default `EnvFilter` directive string.
///
/// Binary targets share their crate name with the library of the same package,
/// so a binary target is only appended when it is not one of the libraries.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<&str> = LIBRARY_TARGETS.to_vec();
    if !targets.contains(&binary_target.as_str()) {
        targets.push(&binary_target);
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_for_package_binary() {
        // テスト項目: パッケージ名と同じバイナリはライブラリのターゲットと重複しない
        // given (前提条件):
        let binary = "cowatch-server";

        // when (操作):
        let filter = default_filter(binary, "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "cowatch_shared=debug,cowatch_server=debug,cowatch_client=debug"
        );
    }

    #[test]
    fn test_default_filter_for_extra_binary() {
        // テスト項目: ライブラリ以外のバイナリ名はターゲットとして追加される
        // given (前提条件):
        let binary = "load-tester";

        // when (操作):
        let filter = default_filter(binary, "info");

        // then (期待する結果):
        assert!(filter.ends_with(",load_tester=info"));
        assert!(filter.starts_with("cowatch_shared=info"));
    }
}
