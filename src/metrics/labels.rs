// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RouterLabels {
    pub router: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SensorLabels {
    pub router: String,
    pub sensor: String,
    pub unit: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RouterInfoLabels {
    pub router: String,
    pub model: String,
    pub firmware: String,
    pub build: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_sensor_labels_equality() {
        let labels1 = SensorLabels {
            router: "router1".to_string(),
            sensor: "load_avg_1m".to_string(),
            unit: String::new(),
        };
        let labels2 = labels1.clone();
        assert_eq!(labels1, labels2);

        let labels3 = SensorLabels {
            sensor: "load_avg_5m".to_string(),
            ..labels1.clone()
        };
        assert_ne!(labels1, labels3);
    }

    #[test]
    fn test_router_labels_hash() {
        let labels1 = RouterLabels {
            router: "router1".to_string(),
        };
        let labels2 = RouterLabels {
            router: "router1".to_string(),
        };

        let mut map = HashMap::new();
        map.insert(labels1, 100);

        assert_eq!(map.get(&labels2), Some(&100));
    }

    #[test]
    fn test_router_info_labels_in_set() {
        let labels = RouterInfoLabels {
            router: "router1".to_string(),
            model: "Archer C7".to_string(),
            firmware: "OpenWrt".to_string(),
            build: "23.05.2".to_string(),
        };
        let mut set = HashSet::new();
        set.insert(labels.clone());
        assert!(set.contains(&labels));
    }
}
