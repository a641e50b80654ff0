//! Classifier metrics

use metrics::Counter;

/// Classifier metrics
#[derive(Clone, Debug)]
pub(crate) struct ClassifierMetrics {
    /// Number of users that started a probe
    users_tracked_total: Counter,
    /// Number of users accepted
    users_accepted_total: Counter,
    /// Number of leechers banned
    leechers_banned_total: Counter,
    /// Number of share browse requests issued
    share_requests_total: Counter,
    /// Number of warning messages sent
    warnings_sent_total: Counter,
    /// Number of IP addresses blocked
    ips_blocked_total: Counter,
}

impl Default for ClassifierMetrics {
    fn default() -> Self {
        Self {
            users_tracked_total: metrics::counter!("shareguard.users_tracked_total"),
            users_accepted_total: metrics::counter!("shareguard.users_accepted_total"),
            leechers_banned_total: metrics::counter!("shareguard.leechers_banned_total"),
            share_requests_total: metrics::counter!("shareguard.share_requests_total"),
            warnings_sent_total: metrics::counter!("shareguard.warnings_sent_total"),
            ips_blocked_total: metrics::counter!("shareguard.ips_blocked_total"),
        }
    }
}

impl ClassifierMetrics {
    pub(crate) fn inc_tracked(&self) {
        self.users_tracked_total.increment(1);
    }

    pub(crate) fn inc_accepted(&self) {
        self.users_accepted_total.increment(1);
    }

    pub(crate) fn inc_banned(&self) {
        self.leechers_banned_total.increment(1);
    }

    pub(crate) fn inc_share_requests(&self) {
        self.share_requests_total.increment(1);
    }

    pub(crate) fn inc_warnings(&self) {
        self.warnings_sent_total.increment(1);
    }

    pub(crate) fn inc_ips_blocked(&self) {
        self.ips_blocked_total.increment(1);
    }
}
