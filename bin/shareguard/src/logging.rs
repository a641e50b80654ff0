//! Logging setup.

use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogArgs;

/// Crates whose level follows `-v`. Everything else stays at `warn`.
const SHAREGUARD_TARGETS: [&str; 2] = ["shareguard", "shareguard_classifier"];

/// Default directives for a verbosity count, e.g. `warn,shareguard=info,...`.
fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut directives = String::from("warn");
    for target in SHAREGUARD_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Initialize logging from the command line.
///
/// `--quiet` shows errors only. Otherwise `RUST_LOG` wins over the
/// verbosity-derived defaults, and `--log.filter` directives are added last.
pub(crate) fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(args.verbosity)));

        for directive in args.filter.iter().flat_map(|f| f.split(',')) {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("ignoring log filter {directive:?}: {e}"),
            }
        }
        filter
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let init = if args.json {
        builder.json().try_init()
    } else {
        builder.without_time().try_init()
    };
    init.map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_follow_verbosity() {
        assert_eq!(
            default_directives(0),
            "warn,shareguard=info,shareguard_classifier=info"
        );
        assert_eq!(
            default_directives(1),
            "warn,shareguard=debug,shareguard_classifier=debug"
        );
        assert_eq!(
            default_directives(5),
            "warn,shareguard=trace,shareguard_classifier=trace"
        );
    }

    #[test]
    fn test_default_directives_parse() {
        for verbosity in 0..3 {
            assert!(EnvFilter::try_new(default_directives(verbosity)).is_ok());
        }
    }
}
