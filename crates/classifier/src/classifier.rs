//! Leecher classification and enforcement.
//!
//! The [`Classifier`] is fed by four host notifications: upload queued,
//! upload finished, stats received and address resolved. They may arrive in
//! any order and may be replayed; every path funnels into [`Classifier::check_user`],
//! which converges each user to a single outcome per probing episode.
//!
//! All handlers take `&mut self` and run to completion, so per-user state
//! needs no locking. Nothing here waits on the network: share browses are
//! requested from the host and come back later as a separate stats event.

use std::net::IpAddr;

use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::address::ResolvedAddress;
use crate::config::ClassifierConfig;
use crate::events::{ClassifierEvent, EventEmitter, HostEvent};
use crate::leechers::LeecherRegistry;
use crate::metrics::ClassifierMetrics;
use crate::registry::ProbeRegistry;
use crate::state::ProbeState;
use crate::store::{IpBlockList, MemoryStore};
use crate::template::MessageTemplate;
use crate::traits::{ClassifierHost, MessageOptions, UserStats};

/// Outcome of a single [`Classifier::check_user`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Buddy with bypass enabled; state is left untouched.
    BuddyBypass,
    /// Nothing to decide: untracked, already accepted, or not probing.
    Skip,
    /// User meets the requirement (or is a buddy) and is now `Okay`.
    Accept,
    /// Previously confirmed leecher; marked processed without new enforcement.
    KnownLeecher,
    /// Counts were empty, a share browse was requested.
    RequestShares,
    /// User is banned and pending the warning message.
    Ban,
}

/// Per-user leecher classifier driving the host's enforcement services.
pub struct Classifier<H: ClassifierHost> {
    config: ClassifierConfig,
    host: H,
    registry: ProbeRegistry,
    leechers: LeecherRegistry,
    ip_blocks: Box<dyn IpBlockList>,
    events: EventEmitter,
    metrics: ClassifierMetrics,
}

impl<H: ClassifierHost> std::fmt::Debug for Classifier<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("leechers", &self.leechers)
            .finish_non_exhaustive()
    }
}

impl<H: ClassifierHost> Classifier<H> {
    /// Classifier with in-memory leecher and IP block storage.
    pub fn new(config: ClassifierConfig, host: H) -> Self {
        Self::with_stores(config, host, LeecherRegistry::ephemeral(), MemoryStore::new())
    }

    pub fn with_stores(
        config: ClassifierConfig,
        host: H,
        leechers: LeecherRegistry,
        ip_blocks: impl IpBlockList + 'static,
    ) -> Self {
        Self {
            config,
            host,
            registry: ProbeRegistry::new(),
            leechers,
            ip_blocks: Box::new(ip_blocks),
            events: EventEmitter::default(),
            metrics: ClassifierMetrics::default(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Mutable access for live configuration edits.
    pub fn config_mut(&mut self) -> &mut ClassifierConfig {
        &mut self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self, user: &str) -> Option<ProbeState> {
        self.registry.state(user)
    }

    pub fn address(&self, user: &str) -> Option<&ResolvedAddress> {
        self.registry.address(user)
    }

    pub fn upload_count(&self, user: &str) -> u64 {
        self.registry.upload_count(user)
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    pub fn leechers(&self) -> &LeecherRegistry {
        &self.leechers
    }

    pub fn blocked_ips(&self) -> Vec<(IpAddr, String)> {
        self.ip_blocks.entries()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClassifierEvent> {
        self.events.subscribe()
    }

    /// Dispatch a host notification to its handler.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Loaded => self.on_loaded(),
            HostEvent::UploadQueued { user, path } => self.on_upload_queued(&user, &path),
            HostEvent::UploadFinished { user } => self.on_upload_finished(&user),
            HostEvent::UserStats {
                user,
                files,
                folders,
            } => self.on_user_stats(&user, UserStats { files, folders }),
            HostEvent::AddressResolved {
                user,
                ip,
                port,
                country,
            } => self.on_address_resolved(&user, ip, port, country.as_deref()),
        }
    }

    /// Normalize thresholds once the host has loaded the configuration.
    pub fn on_loaded(&mut self) {
        self.config.normalize();

        if self.config.log.general() {
            info!(
                min_files = self.config.min_files,
                min_folders = self.config.min_folders,
                "users need at least {} files and {} folders",
                self.config.min_files,
                self.config.min_folders
            );
        }
    }

    /// A peer queued a download from us.
    ///
    /// The first upload starts a probe; later ones count towards the recheck
    /// interval.
    pub fn on_upload_queued(&mut self, user: &str, path: &str) {
        if self.registry.is_tracked(user) {
            let uploads = self.registry.record_upload(user);
            if let Some(every) = self.config.recheck_every() {
                if uploads % every == 0 {
                    self.recheck(user, uploads);
                }
            }
            return;
        }

        self.registry.begin_probe(user);
        self.metrics.inc_tracked();
        self.events.emit(ClassifierEvent::Tracked {
            user: user.to_owned(),
        });
        debug!(user, path, "tracking user");

        if let Some((files, folders)) = self.cached_counts(user) {
            self.check_user(user, files, folders);
        }
    }

    /// Share statistics arrived. Always classifies, whatever the user's state.
    pub fn on_user_stats(&mut self, user: &str, stats: UserStats) {
        let files = stats.files.unwrap_or(0);
        let folders = stats.folders.unwrap_or(0);
        self.check_user(user, files, folders);
    }

    /// An upload to the user completed. Finishes enforcement for pending leechers.
    pub fn on_upload_finished(&mut self, user: &str) {
        if self.registry.state(user) != Some(ProbeState::PendingLeecher) {
            return;
        }

        if !self.transition(user, ProbeState::ProcessedLeecher) {
            return;
        }

        if self.config.sends_message() {
            if self.config.log.general() {
                info!(user, "sending message to banned user");
            }
            self.send_warning(user);
            self.leechers.insert(user);
        }

        self.ban_user(user);
        if self.config.block_ip_on_ban {
            self.block_ip(user);
        }

        if self.config.log.general() {
            info!(user, "user banned");
        }
    }

    /// Record or merge the user's resolved address.
    pub fn on_address_resolved(&mut self, user: &str, ip: IpAddr, port: u16, country: Option<&str>) {
        self.registry.merge_address(user, ip, port, country);
    }

    /// Classify `user` from reported share counts and act on the result.
    pub fn check_user(&mut self, user: &str, files: u64, folders: u64) -> Verdict {
        self.registry.refresh_buddies(self.host.buddy_list());

        let verdict = self.evaluate(user, files, folders);
        match verdict {
            Verdict::BuddyBypass => {
                if self.config.log.general() {
                    info!(user, "buddy bypasses share limit");
                }
            }
            Verdict::Skip => {
                trace!(user, state = ?self.registry.state(user), "nothing to decide");
            }
            Verdict::Accept => self.accept(user, files, folders),
            Verdict::KnownLeecher => {
                if self.transition(user, ProbeState::ProcessedLeecher) {
                    debug!(user, "known leecher returned, enforcement already done");
                }
            }
            Verdict::RequestShares => self.request_shares(user),
            Verdict::Ban => self.ban_leecher(user, files, folders),
        }
        verdict
    }

    /// Pure decision for `check_user`, given a fresh buddy snapshot.
    fn evaluate(&self, user: &str, files: u64, folders: u64) -> Verdict {
        let is_buddy = self.registry.is_buddy(user);
        if is_buddy && self.config.bypass_buddies {
            return Verdict::BuddyBypass;
        }

        let Some(state) = self.registry.state(user) else {
            return Verdict::Skip;
        };
        if state == ProbeState::Okay {
            return Verdict::Skip;
        }

        if self.meets_requirement(files, folders) || is_buddy {
            return Verdict::Accept;
        }

        if !state.is_requesting() {
            return Verdict::Skip;
        }

        if self.leechers.contains(user) {
            return Verdict::KnownLeecher;
        }

        if (files == 0 || folders == 0) && state != ProbeState::RequestingShares {
            return Verdict::RequestShares;
        }

        Verdict::Ban
    }

    pub fn meets_requirement(&self, files: u64, folders: u64) -> bool {
        files >= self.config.min_files && folders >= self.config.min_folders
    }

    fn accept(&mut self, user: &str, files: u64, folders: u64) {
        self.leechers.remove(user);

        if !self.transition(user, ProbeState::Okay) {
            return;
        }

        if self.config.log.accepted() {
            info!(user, files, folders, "user meets criteria");
        }

        self.host.unban_user(user);
        self.host.unignore_user(user);

        self.metrics.inc_accepted();
        self.events.emit(ClassifierEvent::Accepted {
            user: user.to_owned(),
            files,
            folders,
        });
    }

    fn request_shares(&mut self, user: &str) {
        if !self.transition(user, ProbeState::RequestingShares) {
            return;
        }

        if self.config.log.share_request() {
            info!(user, "requesting shares to verify whether user is a leecher");
        }

        self.host.request_user_shares(user);

        self.metrics.inc_share_requests();
        self.events.emit(ClassifierEvent::ShareRequested {
            user: user.to_owned(),
        });
    }

    fn ban_leecher(&mut self, user: &str, files: u64, folders: u64) {
        if !self.transition(user, ProbeState::PendingLeecher) {
            return;
        }

        if self.config.log.general() {
            info!(user, files, folders, "leecher detected");
        }

        if self.config.ignore_on_ban {
            self.host.ignore_user(user);
        }

        self.ban_user(user);
        if self.config.block_ip_on_ban {
            self.block_ip(user);
        }

        self.metrics.inc_banned();
        self.events.emit(ClassifierEvent::Banned {
            user: user.to_owned(),
            files,
            folders,
        });
    }

    /// Re-evaluate a tracked user from cached stats.
    ///
    /// An accepted user who no longer meets the requirement starts a new
    /// episode from `RequestingStats`. Bypassing buddies stay accepted.
    fn recheck(&mut self, user: &str, uploads: u64) {
        let Some((files, folders)) = self.cached_counts(user) else {
            debug!(user, uploads, "no cached stats for recheck");
            return;
        };

        debug!(user, uploads, files, folders, "rechecking user");
        self.events.emit(ClassifierEvent::Rechecked {
            user: user.to_owned(),
            uploads,
        });

        if self.registry.state(user) == Some(ProbeState::Okay) {
            self.registry.refresh_buddies(self.host.buddy_list());
            let bypass = self.config.bypass_buddies && self.registry.is_buddy(user);
            if bypass || self.meets_requirement(files, folders) {
                return;
            }
            if !self.transition(user, ProbeState::RequestingStats) {
                return;
            }
        }

        self.check_user(user, files, folders);
    }

    fn cached_counts(&self, user: &str) -> Option<(u64, u64)> {
        self.host.watched_stats(user).and_then(|stats| stats.counts())
    }

    fn transition(&mut self, user: &str, next: ProbeState) -> bool {
        match self.registry.advance(user, next) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "rejected probe state change");
                false
            }
        }
    }

    /// Ban through the host's network filter. Safe to repeat.
    pub fn ban_user(&self, user: &str) {
        if user.is_empty() {
            return;
        }

        self.host.ban_user(user);
        if self.config.log.banned() {
            info!(user, "banned user");
        }
    }

    /// Block the user's resolved IP address.
    ///
    /// Returns the address if a new block entry was written. A missing or
    /// unspecified address is reported and skipped.
    pub fn block_ip(&self, user: &str) -> Option<IpAddr> {
        let log = self.config.log.ip_ban();

        let Some(address) = self.registry.address(user) else {
            if log {
                info!(user, "IP address was not resolved");
            }
            return None;
        };

        let Some(ip) = address.blockable_ip() else {
            if log {
                info!(user, "no IP found for user");
            }
            return None;
        };

        if log {
            info!(user, %ip, "blocking IP");
        }

        if self.ip_blocks.contains(&ip) {
            if log {
                info!(user, %ip, "IP already blocked");
            }
            return None;
        }

        if let Err(e) = self.ip_blocks.append(ip, user) {
            warn!(user, %ip, error = %e, "failed to persist IP block");
            return None;
        }

        if log {
            info!(user, %ip, "blocked IP");
        }
        self.metrics.inc_ips_blocked();
        self.events.emit(ClassifierEvent::IpBlocked {
            user: user.to_owned(),
            ip,
        });
        Some(ip)
    }

    /// Send the warning template, one message per line.
    ///
    /// Returns the number of lines sent.
    pub fn send_warning(&self, user: &str) -> usize {
        let options = MessageOptions {
            show_ui: self.config.open_private_chat,
            switch_page: false,
        };

        let lines = MessageTemplate::new(&self.config.message).render(&self.config);
        for line in &lines {
            self.host.send_private_message(user, line, options);
        }

        if !lines.is_empty() {
            self.metrics.inc_warnings();
            self.events.emit(ClassifierEvent::Messaged {
                user: user.to_owned(),
                lines: lines.len(),
            });
        }
        lines.len()
    }
}
