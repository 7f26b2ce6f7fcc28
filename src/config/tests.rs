// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Unit tests for configuration module

#[cfg(test)]
mod test {
    use super::super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_addr, "0.0.0.0:9100");
        assert_eq!(config.collection_interval_secs, 30);
        assert!(config.routers.is_empty());
    }

    #[test]
    fn test_router_config_deserialize_with_defaults() {
        let json = r#"{
            "name": "test-router",
            "host": "192.168.1.1"
        }"#;

        let router: RouterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(router.name, "test-router");
        assert_eq!(router.host, "192.168.1.1");
        assert_eq!(router.port, 22);
        assert_eq!(router.username, "root");
        assert!(router.ssh_key.is_none());
        assert_eq!(router.options, RouterOptions::default());
        assert!(router.validate().is_ok());
    }

    #[test]
    fn test_router_config_deserialize_options() {
        let json = r#"{
            "name": "ap-upstairs",
            "host": "ap.lan",
            "port": 2222,
            "username": "admin",
            "ssh_key": "/keys/ap",
            "ttl_seconds": 30,
            "require_ip": false,
            "mode": "ap",
            "leases_path": "/var/lib/misc",
            "interface": "wan"
        }"#;

        let router: RouterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(router.port, 2222);
        assert_eq!(router.ssh_key.as_deref(), Some("/keys/ap"));
        assert_eq!(router.options.ttl_seconds, 30);
        assert!(!router.options.require_ip);
        assert_eq!(router.options.mode, RouterMode::AccessPoint);
        assert_eq!(router.options.leases_path, "/var/lib/misc");
        assert_eq!(router.options.interface, "wan");
    }

    #[test]
    fn test_unsupported_mode_is_config_error() {
        let json = r#"[{"name": "r1", "host": "10.0.0.1", "mode": "mesh"}]"#;
        let err = Config::parse_routers(json).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_multiple_routers_deserialize() {
        let json = r#"[
            { "name": "router1", "host": "192.168.1.1" },
            { "name": "router2", "host": "192.168.2.1", "mode": "access-point" }
        ]"#;

        let routers = Config::parse_routers(json).unwrap();
        assert_eq!(routers.len(), 2);
        assert_eq!(routers[0].name, "router1");
        assert_eq!(routers[1].options.mode, RouterMode::AccessPoint);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut router: RouterConfig =
            serde_json::from_str(r#"{"name": "r", "host": "10.0.0.1"}"#).unwrap();
        router.name = " ".to_string();
        assert!(router.validate().is_err());

        router.name = "r".to_string();
        router.host = "bad host".to_string();
        assert!(router.validate().is_err());

        router.host = "10.0.0.1".to_string();
        router.options.interface = "../eth0".to_string();
        assert!(router.validate().is_err());

        router.options.interface = "eth0".to_string();
        router.options.command_timeout_secs = 0;
        assert!(router.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_shell_metacharacters() {
        for interface in ["eth0$(reboot)", "eth0;reboot", "eth0`id`", "eth 0", "../eth0", "..", ""] {
            let opts = RouterOptions {
                interface: interface.to_string(),
                ..RouterOptions::default()
            };
            assert!(opts.validate().is_err(), "interface {interface:?} accepted");
        }

        for path in ["/tmp$(reboot)", "/tmp;rm", "/tmp/`id`", "tmp", "/tmp/../etc", "/tmp dir"] {
            let opts = RouterOptions {
                leases_path: path.to_string(),
                ..RouterOptions::default()
            };
            assert!(opts.validate().is_err(), "leases path {path:?} accepted");
        }
    }

    #[test]
    fn test_validate_accepts_common_names() {
        for interface in ["eth0", "br-lan", "eth0.2", "wan@eth0", "pppoe-wan"] {
            let opts = RouterOptions {
                interface: interface.to_string(),
                ..RouterOptions::default()
            };
            assert!(opts.validate().is_ok(), "interface {interface:?} rejected");
        }

        for path in ["/tmp", "/tmp/", "/var/lib/misc", "/tmp/dhcp.d"] {
            let opts = RouterOptions {
                leases_path: path.to_string(),
                ..RouterOptions::default()
            };
            assert!(opts.validate().is_ok(), "leases path {path:?} rejected");
        }
    }

    #[test]
    fn test_requires_reload() {
        let current = RouterOptions::default();
        assert!(!current.requires_reload(&current.clone()));

        let changed_ttl = RouterOptions {
            ttl_seconds: 60,
            ..current.clone()
        };
        assert!(current.requires_reload(&changed_ttl));

        let changed_policy = RouterOptions {
            require_ip: false,
            ..current.clone()
        };
        assert!(current.requires_reload(&changed_policy));
    }
}
