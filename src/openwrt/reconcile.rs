// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Merging of per-source device tuples into one mapping

use super::parse::canonical_mac;
use super::types::{DeviceMapping, DeviceRecord, RawTuple};

/// Placeholder the kernel reports for unresolved (incomplete) neighbor entries
const INCOMPLETE_MAC: &str = "00:00:00:00:00:00";

/// Fold `incoming` tuples into `existing`
///
/// Fields already known are never overwritten; an incoming value only fills a gap.
/// Tuples whose MAC cannot be canonicalized, or is the all-zero placeholder, are dropped.
pub fn reconcile<I>(mut existing: DeviceMapping, incoming: I) -> DeviceMapping
where
    I: IntoIterator<Item = RawTuple>,
{
    for tuple in incoming {
        let Some(mac) = canonical_mac(&tuple.mac) else {
            tracing::trace!("Dropping tuple with invalid MAC: {}", tuple.mac);
            continue;
        };
        if mac == INCOMPLETE_MAC {
            tracing::trace!("Skipping incomplete entry for {:?}", tuple.ip);
            continue;
        }
        match existing.get_mut(&mac) {
            Some(record) => {
                fill(&mut record.ip_address, tuple.ip);
                fill(&mut record.hostname, tuple.hostname);
                fill(&mut record.interface, tuple.interface);
                fill(&mut record.status, tuple.status);
            }
            None => {
                existing.insert(
                    mac.clone(),
                    DeviceRecord {
                        mac_address: mac,
                        ip_address: tuple.ip,
                        hostname: tuple.hostname,
                        interface: tuple.interface,
                        status: tuple.status,
                    },
                );
            }
        }
    }
    existing
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Drop devices that fail the inclusion policy
#[must_use]
pub fn filter(mut mapping: DeviceMapping, require_ip: bool) -> DeviceMapping {
    if require_ip {
        mapping.retain(|_, record| record.ip_address.is_some());
    }
    mapping
}
