use std::{
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::Duration,
};

use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub(crate) enum HelperReadiness {
    /// No helper was launched for this build.
    Disabled,
    Pending,
    #[serde(rename_all = "camelCase")]
    Ready { attempts: u32 },
    #[serde(rename_all = "camelCase")]
    Exited { reason: String },
    #[serde(rename_all = "camelCase")]
    TimedOut { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HelperLiveness {
    Running,
    Exited,
}

#[derive(Debug, Clone)]
pub(crate) struct ReadinessProbe {
    pub(crate) url: Url,
    pub(crate) attempts: u32,
    pub(crate) interval: Duration,
    pub(crate) ping_timeout: Duration,
}

pub(crate) fn ping_helper(url: &Url, timeout: Duration) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let port = url.port_or_known_default().unwrap_or(80);
    let timeout = timeout.max(Duration::from_millis(50));

    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

/// Blocks until the helper accepts connections, exits, or the attempt budget runs out.
pub(crate) fn wait_for_helper<L, F>(probe: &ReadinessProbe, liveness: L, log: F) -> HelperReadiness
where
    L: Fn() -> HelperLiveness,
    F: Fn(&str),
{
    let attempts = probe.attempts.max(1);
    for attempt in 1..=attempts {
        if ping_helper(&probe.url, probe.ping_timeout) {
            log(&format!(
                "helper reachable at {} after {} attempt(s)",
                probe.url, attempt
            ));
            return HelperReadiness::Ready { attempts: attempt };
        }

        if liveness() == HelperLiveness::Exited {
            let reason = format!("helper exited before accepting connections on {}", probe.url);
            log(&reason);
            return HelperReadiness::Exited { reason };
        }

        if attempt < attempts {
            thread::sleep(probe.interval);
        }
    }

    log(&format!(
        "helper not reachable at {} after {} attempt(s)",
        probe.url, attempts
    ));
    HelperReadiness::TimedOut { attempts }
}
