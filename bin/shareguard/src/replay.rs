//! Event log replay.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use eyre::{Result, WrapErr};
use shareguard_classifier::{
    Classifier, FileIpBlockList, FileLeecherStore, HostEvent, LeecherRegistry, UserStats,
};
use tracing::{debug, info, warn};

use crate::cli::ReplayArgs;
use crate::config::ShareguardConfig;
use crate::host::ReplayHost;

/// Counts of processed event log lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReplayStats {
    pub(crate) applied: usize,
    pub(crate) skipped: usize,
}

pub(crate) fn run(args: &ReplayArgs) -> Result<()> {
    let config = ShareguardConfig::load(args.config.as_deref())?;
    let mut classifier = build_classifier(&config)?;
    classifier.on_loaded();

    let reader: Box<dyn BufRead> = if args.events == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.events)
            .wrap_err_with(|| format!("failed to open event log: {}", args.events.display()))?;
        Box::new(BufReader::new(file))
    };

    let stats = replay(&mut classifier, reader)?;
    info!(applied = stats.applied, skipped = stats.skipped, "replay finished");

    print!("{}", summary(&classifier));
    Ok(())
}

/// Classifier over file-backed stores at the configured locations.
pub(crate) fn build_classifier(config: &ShareguardConfig) -> Result<Classifier<ReplayHost>> {
    let leechers_file = &config.storage.leechers_file;
    let store = FileLeecherStore::new_with_create_dir(leechers_file)?;
    let leechers = LeecherRegistry::load(store)
        .wrap_err_with(|| format!("failed to load leechers: {}", leechers_file.display()))?;

    let ip_block_file = &config.storage.ip_block_file;
    let ip_blocks = FileIpBlockList::new_with_create_dir(ip_block_file)
        .wrap_err_with(|| format!("failed to load IP block list: {}", ip_block_file.display()))?;

    let host = ReplayHost::new(config.buddies.clone());
    Ok(Classifier::with_stores(
        config.classifier.clone(),
        host,
        leechers,
        ip_blocks,
    ))
}

/// Feed every event line to the classifier. Blank lines and `#` comments are
/// ignored, malformed lines are logged and skipped.
pub(crate) fn replay<R: BufRead>(
    classifier: &mut Classifier<ReplayHost>,
    reader: R,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.wrap_err("failed to read event log")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event = match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping malformed event");
                stats.skipped += 1;
                continue;
            }
        };

        debug!(line = index + 1, user = event.user(), ?event, "applying event");
        if let HostEvent::UserStats {
            user,
            files,
            folders,
        } = &event
        {
            classifier.host().watch(
                user,
                UserStats {
                    files: *files,
                    folders: *folders,
                },
            );
        }
        classifier.handle(event);
        stats.applied += 1;
    }

    Ok(stats)
}

/// Human-readable end state: one line per tracked user, then leechers and IP blocks.
pub(crate) fn summary(classifier: &Classifier<ReplayHost>) -> String {
    let host = classifier.host();
    let mut out = String::new();

    for (user, state) in classifier.registry().probes() {
        let mut flags = Vec::new();
        if host.is_banned(&user) {
            flags.push("banned");
        }
        if host.is_ignored(&user) {
            flags.push("ignored");
        }
        out.push_str(&format!("{user}\t{state}\t{}\n", flags.join(",")));
    }

    out.push_str(&format!(
        "leechers: {}\n",
        classifier.leechers().users().join(", ")
    ));
    for (ip, user) in classifier.blocked_ips() {
        out.push_str(&format!("blocked: {ip} ({user})\n"));
    }
    out.push_str(&format!("messages sent: {}\n", host.messages_sent()));
    out
}
