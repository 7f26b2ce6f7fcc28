// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Command output parsing
//!
//! Each device source is described by a [`SourcePattern`]: the shell command to run
//! and the line pattern that extracts fields from its output. Patterns use named
//! capture groups (`ip`, `mac`, `host`, `interface`, `status`); any group a pattern
//! does not define stays empty in the resulting [`RawTuple`].

use regex::Regex;
use std::sync::OnceLock;

use super::types::RawTuple;

const MAC: &str = r"(?P<mac>(?:[0-9a-fA-F]{2}[:-]){5}[0-9a-fA-F]{2})";
const IPV4: &str = r"(?P<ip>(?:[0-9]{1,3}\.){3}[0-9]{1,3})";

/// `cat /proc/net/arp`: ip, hw type, flags, mac, mask, device
fn arp_pattern() -> &'static Regex {
    static ARP: OnceLock<Regex> = OnceLock::new();
    ARP.get_or_init(|| {
        Regex::new(&format!(r"{IPV4}\s+\S+\s+\S+\s+{MAC}\s+\S+\s+\S+"))
            .expect("ARP pattern is valid")
    })
}

/// dnsmasq lease line: expiry, mac, ip, hostname, client id
fn leases_pattern() -> &'static Regex {
    static LEASES: OnceLock<Regex> = OnceLock::new();
    LEASES.get_or_init(|| {
        Regex::new(&format!(r"\w+\s+{MAC}\s+{IPV4}\s+(?P<host>\S+)\s*.*"))
            .expect("lease pattern is valid")
    })
}

/// `ip neigh`: ip, `dev`, interface, `lladdr`, mac, optional `router` flag, state
fn neigh_pattern() -> &'static Regex {
    static NEIGH: OnceLock<Regex> = OnceLock::new();
    NEIGH.get_or_init(|| {
        Regex::new(&format!(
            r"{IPV4}\s+\w+\s+(?P<interface>\S+)\s+\w+\s+{MAC}(?:\s+router)?\s+(?P<status>\w+)"
        ))
        .expect("neighbor pattern is valid")
    })
}

/// Command plus line pattern for one device source
#[derive(Debug, Clone)]
pub struct SourcePattern {
    pub command: String,
    pub pattern: Regex,
}

impl SourcePattern {
    pub fn new(command: impl Into<String>, pattern: Regex) -> Self {
        Self {
            command: command.into(),
            pattern,
        }
    }

    /// Lazily parse `text` line by line with this source's pattern
    pub fn parse<'a>(&'a self, text: &'a str) -> impl Iterator<Item = RawTuple> + 'a {
        parse_lines(&self.pattern, text)
    }
}

/// Commands and patterns for one firmware family
///
/// The lease command carries a `{}` placeholder replaced by the leases directory.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub name: &'static str,
    pub arp: SourcePattern,
    pub neigh: SourcePattern,
    pub leases: SourcePattern,
}

impl Dialect {
    /// Stock OpenWrt with dnsmasq/odhcpd lease files
    #[must_use]
    pub fn openwrt() -> Self {
        Self {
            name: "openwrt",
            arp: SourcePattern::new("cat /proc/net/arp", arp_pattern().clone()),
            neigh: SourcePattern::new("ip neigh", neigh_pattern().clone()),
            leases: SourcePattern::new("cat {}/d[hn][cs][pm]*.leases", leases_pattern().clone()),
        }
    }

    /// Lease command with the leases directory filled in
    #[must_use]
    pub fn leases_command(&self, leases_path: &str) -> String {
        self.leases
            .command
            .replace("{}", leases_path.trim_end_matches('/'))
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::openwrt()
    }
}

/// Normalize a MAC address to upper-case, colon-separated form
///
/// Returns `None` unless the input is six two-digit hex groups separated by `:` or `-`.
#[must_use]
pub fn canonical_mac(mac: &str) -> Option<String> {
    let groups: Vec<&str> = mac.trim().split([':', '-']).collect();
    if groups.len() != 6
        || !groups
            .iter()
            .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()))
    {
        return None;
    }
    Some(groups.join(":").to_ascii_uppercase())
}

/// Apply `pattern` to each line of `text`, skipping lines that do not match
fn parse_lines<'a>(pattern: &'a Regex, text: &'a str) -> impl Iterator<Item = RawTuple> + 'a {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(move |line| {
            let caps = pattern.captures(line)?;
            let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
            Some(RawTuple {
                mac: field("mac")?,
                ip: field("ip"),
                hostname: field("host"),
                interface: field("interface"),
                status: field("status"),
            })
        })
}

/// Parse kernel ARP table contents
pub fn parse_arp(text: &str) -> impl Iterator<Item = RawTuple> + '_ {
    parse_lines(arp_pattern(), text)
}

/// Parse concatenated DHCP lease files
///
/// A hostname of `*` means the client did not send one.
pub fn parse_leases(text: &str) -> impl Iterator<Item = RawTuple> + '_ {
    parse_lease_lines(leases_pattern(), text)
}

pub(crate) fn parse_lease_lines<'a>(
    pattern: &'a Regex,
    text: &'a str,
) -> impl Iterator<Item = RawTuple> + 'a {
    // dnsmasq writes its IPv6 server DUID as `duid <id>`
    let lines = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("duid "));
    lines.flat_map(move |line| parse_lines(pattern, line)).map(|mut tuple| {
        if tuple.hostname.as_deref() == Some("*") {
            tuple.hostname = None;
        }
        tuple
    })
}

/// Parse `ip neigh` output
pub fn parse_neigh(text: &str) -> impl Iterator<Item = RawTuple> + '_ {
    parse_lines(neigh_pattern(), text)
}
