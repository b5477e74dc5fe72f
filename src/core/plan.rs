//! The built-in plan: an Apache CloudStack KVM agent host on Rocky Linux.
//!
//! Phases, in order: packages, repository, network, firewall, selinux.
//! Templates are written byte-for-byte, including the leading newline and
//! the backslash before `$releasever`.
//! `HWADDR` is a placeholder and is written as-is.

use super::types::{Phase, ProvisionPlan, Step};

pub const REPO_PATH: &str = "/etc/yum.repos.d/cloudstack.repo";
pub const ETH0_PATH: &str = "/etc/sysconfig/network-scripts/ifcfg-eth0";
pub const BRIDGE_PATH: &str = "/etc/sysconfig/network-scripts/ifcfg-cloudbr0";
pub const IPTABLES_PATH: &str = "/etc/sysconfig/iptables";
pub const SELINUX_PATH: &str = "/etc/selinux/config";

pub const SELINUX_ENFORCING: &str = "SELINUX=enforcing";
pub const SELINUX_PERMISSIVE: &str = "SELINUX=permissive";

pub const CLOUDSTACK_REPO: &str = "
[cloudstack]
name=CloudStack
baseurl=http://download.cloudstack.org/centos/\\$releasever/4.19/
enabled=1
gpgcheck=0
";

pub const IFCFG_ETH0: &str = "
DEVICE=eth0
HWADDR=00:04:xx:xx:xx:xx
ONBOOT=yes
HOTPLUG=no
BOOTPROTO=none
TYPE=Ethernet
BRIDGE=cloudbr0
";

pub const IFCFG_CLOUDBR0: &str = "
DEVICE=cloudbr0
TYPE=Bridge
ONBOOT=yes
BOOTPROTO=none
IPV6INIT=no
IPV6_AUTOCONF=no
DELAY=5
IPADDR=192.168.42.11
GATEWAY=192.168.42.1
NETMASK=255.255.255.0
STP=yes
";

/// TCP ports (or `lo:hi` ranges) the agent needs: ssh, agent, libvirt TLS,
/// VNC consoles, live migration.
pub const AGENT_PORTS: [&str; 5] = ["22", "1798", "16514", "5900:6100", "49152:49216"];

/// The full plan.
pub fn cloudstack_kvm_host() -> ProvisionPlan {
    ProvisionPlan {
        version: "1.0".to_string(),
        name: "cloudstack-kvm-host".to_string(),
        description: Some(
            "Apache CloudStack KVM host installation on Rocky Linux".to_string(),
        ),
        phases: vec![
            install_packages(),
            configure_repository(),
            configure_network(),
            configure_firewall(),
            relax_selinux(),
        ],
    }
}

/// EPEL, chrony, the KVM stack, and their services.
pub fn install_packages() -> Phase {
    Phase {
        name: "packages".to_string(),
        description: Some("hypervisor and time-sync packages".to_string()),
        steps: vec![
            Step::command("yum install -y epel-release"),
            Step::command("yum install -y chrony qemu-kvm libvirt"),
            Step::command("systemctl enable chronyd"),
            Step::command("systemctl start chronyd"),
            Step::command("systemctl enable libvirtd"),
            Step::command("systemctl start libvirtd"),
        ],
    }
}

pub fn configure_repository() -> Phase {
    Phase {
        name: "repository".to_string(),
        description: Some("CloudStack repository and agent".to_string()),
        steps: vec![
            Step::write_file(REPO_PATH, CLOUDSTACK_REPO),
            Step::command("yum install -y cloudstack-agent"),
        ],
    }
}

/// eth0 enslaved to the cloudbr0 bridge, which carries the static address.
pub fn configure_network() -> Phase {
    Phase {
        name: "network".to_string(),
        description: Some("cloudbr0 bridge over eth0".to_string()),
        steps: vec![
            Step::write_file(ETH0_PATH, IFCFG_ETH0),
            Step::write_file(BRIDGE_PATH, IFCFG_CLOUDBR0),
            Step::command("systemctl restart network"),
        ],
    }
}

/// Rules are inserted at the head of INPUT, so the last port listed ends up first.
pub fn configure_firewall() -> Phase {
    let mut steps: Vec<Step> = AGENT_PORTS
        .iter()
        .map(|port| {
            Step::command(format!(
                "iptables -I INPUT -p tcp -m tcp --dport {} -j ACCEPT",
                port
            ))
        })
        .collect();
    steps.push(Step::command(format!("iptables-save > {}", IPTABLES_PATH)));
    // firewalld may be absent
    steps.push(Step::tolerant("systemctl stop firewalld"));
    steps.push(Step::tolerant("systemctl disable firewalld"));

    Phase {
        name: "firewall".to_string(),
        description: Some("iptables rules for agent traffic".to_string()),
        steps,
    }
}

/// `setenforce` fails when SELinux is already disabled; the config rewrite must not.
pub fn relax_selinux() -> Phase {
    Phase {
        name: "selinux".to_string(),
        description: Some("SELinux to permissive".to_string()),
        steps: vec![
            Step::tolerant("setenforce 0"),
            Step::replace_in_file(SELINUX_PATH, SELINUX_ENFORCING, SELINUX_PERMISSIVE),
        ],
    }
}
